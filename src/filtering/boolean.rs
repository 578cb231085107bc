use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use sea_orm::{Condition, EntityTrait, sea_query::Expr};

use super::criterion::{FilterCriterion, Predicate, accept_all};
use super::source::FieldSource;

/// Yes / no / any filter for a boolean column.
#[derive(Debug, Clone, Default)]
pub struct BooleanFilter<E: EntityTrait> {
    value: Option<bool>,
    source: FieldSource<E>,
}

impl<E: EntityTrait> BooleanFilter<E> {
    #[must_use]
    pub const fn new(source: FieldSource<E>) -> Self {
        Self {
            value: None,
            source,
        }
    }

    #[must_use]
    pub const fn with_value(mut self, value: Option<bool>) -> Self {
        self.value = value;
        self
    }

    pub const fn value(&self) -> Option<bool> {
        self.value
    }

    pub fn set_value(&mut self, value: Option<bool>) {
        self.value = value;
    }

    pub fn source_mut(&mut self) -> &mut FieldSource<E> {
        &mut self.source
    }
}

impl<E: EntityTrait> FilterCriterion<E> for BooleanFilter<E> {
    type Value = bool;

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    fn predicate(&self) -> Predicate<bool> {
        match self.value {
            Some(expected) => Arc::new(move |value: &bool| *value == expected),
            None => accept_all(),
        }
    }

    fn condition(&self) -> Option<Condition> {
        let expected = self.value?;
        self.source.constrain(|expr| Expr::expr(expr).eq(expected))
    }

    fn clear(&mut self) {
        self.value = None;
    }

    fn source(&self) -> &FieldSource<E> {
        &self.source
    }
}

impl<E: EntityTrait> PartialEq for BooleanFilter<E> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<E: EntityTrait> Eq for BooleanFilter<E> {}

impl<E: EntityTrait> Hash for BooleanFilter<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}
