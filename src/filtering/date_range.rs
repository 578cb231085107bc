use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use chrono::NaiveDate;
use sea_orm::{
    Condition, EntityTrait,
    sea_query::{Expr, SimpleExpr},
};

use super::criterion::{FilterCriterion, Predicate};
use super::source::FieldSource;

/// Inclusive day range. Either bound may be open.
///
/// Remotely a closed range is a `BETWEEN`, an open one a single `>=` or `<=`.
/// A range whose end precedes its start is accepted as is and matches nothing.
#[derive(Debug, Clone, Default)]
pub struct DateRangeFilter<E: EntityTrait> {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    source: FieldSource<E>,
}

impl<E: EntityTrait> DateRangeFilter<E> {
    #[must_use]
    pub const fn new(source: FieldSource<E>) -> Self {
        Self {
            start: None,
            end: None,
            source,
        }
    }

    #[must_use]
    pub const fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub const fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn set_start(&mut self, start: Option<NaiveDate>) {
        self.start = start;
    }

    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn set_end(&mut self, end: Option<NaiveDate>) {
        self.end = end;
    }

    pub fn source_mut(&mut self) -> &mut FieldSource<E> {
        &mut self.source
    }
}

impl<E: EntityTrait> FilterCriterion<E> for DateRangeFilter<E> {
    type Value = NaiveDate;

    fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    fn predicate(&self) -> Predicate<NaiveDate> {
        let (start, end) = (self.start, self.end);
        // After the day before start, before the day after end
        Arc::new(move |day: &NaiveDate| {
            start.is_none_or(|start| *day >= start) && end.is_none_or(|end| *day <= end)
        })
    }

    fn condition(&self) -> Option<Condition> {
        if self.is_empty() {
            return None;
        }
        self.source
            .constrain(|expr| within(expr, self.start, self.end))
    }

    fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }

    fn source(&self) -> &FieldSource<E> {
        &self.source
    }
}

/// Inclusive bounds on `expr`. With both bounds open any non-null value passes.
pub(super) fn within<V>(expr: SimpleExpr, start: Option<V>, end: Option<V>) -> SimpleExpr
where
    V: Into<SimpleExpr>,
{
    match (start, end) {
        (Some(start), Some(end)) => Expr::expr(expr).between(start, end),
        (Some(start), None) => Expr::expr(expr).gte(start),
        (None, Some(end)) => Expr::expr(expr).lte(end),
        (None, None) => Expr::expr(expr).is_not_null(),
    }
}

impl<E: EntityTrait> PartialEq for DateRangeFilter<E> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl<E: EntityTrait> Eq for DateRangeFilter<E> {}

impl<E: EntityTrait> Hash for DateRangeFilter<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}
