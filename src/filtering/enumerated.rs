use std::{
    collections::{BTreeMap, BTreeSet},
    hash::{Hash, Hasher},
    sync::Arc,
};

use sea_orm::{Condition, EntityTrait, Value, sea_query::Expr};

use super::criterion::{FilterCriterion, Predicate, accept_all};
use super::source::FieldSource;

/// Enum usable as a member of an [`EnumFilter`].
///
/// `name` identifies the member in memory and must be unique within the enum.
/// `to_value` is what the database stores for it.
///
/// ```rust,ignore
/// impl FilterEnum for Priority {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Low => "Low",
///             Self::High => "High",
///         }
///     }
///
///     fn to_value(&self) -> Value {
///         self.name().into()
///     }
/// }
/// ```
pub trait FilterEnum {
    fn name(&self) -> &'static str;
    fn to_value(&self) -> Value;
}

/// Membership filter over a set of enum members.
///
/// An unset selection and an empty selection both mean "no constraint" and
/// compare equal.
#[derive(Debug, Clone, Default)]
pub struct EnumFilter<E: EntityTrait> {
    members: Option<BTreeMap<&'static str, Value>>,
    source: FieldSource<E>,
}

impl<E: EntityTrait> EnumFilter<E> {
    #[must_use]
    pub const fn new(source: FieldSource<E>) -> Self {
        Self {
            members: None,
            source,
        }
    }

    #[must_use]
    pub fn with_members<M: FilterEnum>(mut self, members: impl IntoIterator<Item = M>) -> Self {
        self.set_members(members);
        self
    }

    /// Replace the selection.
    pub fn set_members<M: FilterEnum>(&mut self, members: impl IntoIterator<Item = M>) {
        self.members = Some(
            members
                .into_iter()
                .map(|member| (member.name(), member.to_value()))
                .collect(),
        );
    }

    /// Drop the selection entirely, as opposed to selecting nothing.
    pub fn unset_members(&mut self) {
        self.members = None;
    }

    /// Whether a selection exists at all, even an empty one.
    pub const fn has_selection(&self) -> bool {
        self.members.is_some()
    }

    pub fn contains<M: FilterEnum>(&self, member: &M) -> bool {
        self.members
            .as_ref()
            .is_some_and(|members| members.contains_key(member.name()))
    }

    /// Selected member names, sorted.
    pub fn member_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.iter().flat_map(|members| members.keys().copied())
    }

    pub fn source_mut(&mut self) -> &mut FieldSource<E> {
        &mut self.source
    }
}

impl<E: EntityTrait> FilterCriterion<E> for EnumFilter<E> {
    /// Member name, as returned by [`FilterEnum::name`].
    type Value = &'static str;

    fn is_empty(&self) -> bool {
        self.members.as_ref().is_none_or(BTreeMap::is_empty)
    }

    fn predicate(&self) -> Predicate<&'static str> {
        if self.is_empty() {
            return accept_all();
        }
        let names: BTreeSet<&'static str> = self.member_names().collect();
        Arc::new(move |name: &&'static str| names.contains(name))
    }

    fn condition(&self) -> Option<Condition> {
        if self.is_empty() {
            return None;
        }
        let values: Vec<Value> = self.members.iter().flat_map(|m| m.values().cloned()).collect();
        self.source
            .constrain(|expr| Expr::expr(expr).is_in(values.iter().cloned()))
    }

    fn clear(&mut self) {
        self.members = None;
    }

    fn source(&self) -> &FieldSource<E> {
        &self.source
    }
}

impl<E: EntityTrait> PartialEq for EnumFilter<E> {
    fn eq(&self, other: &Self) -> bool {
        self.member_names().eq(other.member_names())
    }
}

impl<E: EntityTrait> Eq for EnumFilter<E> {}

impl<E: EntityTrait> Hash for EnumFilter<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash the normalized selection so unset and empty collide.
        let names: Vec<&'static str> = self.member_names().collect();
        names.hash(state);
    }
}
