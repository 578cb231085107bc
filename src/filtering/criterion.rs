use std::sync::Arc;

use sea_orm::{Condition, EntityTrait};

use super::source::FieldSource;

/// In-memory test over a single column value.
pub type Predicate<V> = Arc<dyn Fn(&V) -> bool + Send + Sync>;

/// Predicate that lets every value through.
#[must_use]
pub fn accept_all<V: 'static>() -> Predicate<V> {
    Arc::new(|_: &V| true)
}

/// One column's filter state and the two forms it compiles to.
///
/// Implementations are pure over their state: calling [`predicate`](Self::predicate)
/// or [`condition`](Self::condition) never mutates anything, and equal criteria
/// compile to equivalent filters.
pub trait FilterCriterion<E: EntityTrait> {
    /// Type of the column value the predicate tests.
    type Value: 'static;

    /// True when the current value constrains nothing.
    fn is_empty(&self) -> bool;

    /// Predicate over the column value. Accepts everything when [`is_empty`](Self::is_empty).
    fn predicate(&self) -> Predicate<Self::Value>;

    /// Remote fragment for this column.
    ///
    /// `None` when the criterion is empty or has no [`FieldSource`] configured.
    /// An empty criterion never yields an always-true condition.
    fn condition(&self) -> Option<Condition>;

    /// Reset the value to its empty representation, keeping the field source.
    fn clear(&mut self);

    /// Where the remote expression comes from.
    fn source(&self) -> &FieldSource<E>;
}
