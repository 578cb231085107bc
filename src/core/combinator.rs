use std::{fmt, sync::Arc};

use sea_orm::{Condition, EntityTrait};

use super::column::{Column, RowPredicate};
use crate::settings::FilterMode;

/// Every column's criterion folded into one filter for the active mode.
pub enum CombinedFilter<R> {
    InMemory {
        /// At least one criterion is non-empty
        active: bool,
        predicate: RowPredicate<R>,
    },
    Remote {
        /// At least one column contributed a fragment
        active: bool,
        /// `None` exactly when inactive
        condition: Option<Condition>,
    },
}

impl<R> CombinedFilter<R> {
    pub const fn mode(&self) -> FilterMode {
        match self {
            Self::InMemory { .. } => FilterMode::InMemory,
            Self::Remote { .. } => FilterMode::Remote,
        }
    }

    pub const fn is_active(&self) -> bool {
        match self {
            Self::InMemory { active, .. } | Self::Remote { active, .. } => *active,
        }
    }

    pub const fn condition(&self) -> Option<&Condition> {
        match self {
            Self::Remote { condition, .. } => condition.as_ref(),
            Self::InMemory { .. } => None,
        }
    }

    pub const fn predicate(&self) -> Option<&RowPredicate<R>> {
        match self {
            Self::InMemory { predicate, .. } => Some(predicate),
            Self::Remote { .. } => None,
        }
    }
}

impl<R> fmt::Debug for CombinedFilter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InMemory { active, .. } => f
                .debug_struct("InMemory")
                .field("active", active)
                .finish_non_exhaustive(),
            Self::Remote { active, condition } => f
                .debug_struct("Remote")
                .field("active", active)
                .field("condition", condition)
                .finish(),
        }
    }
}

/// Outcome of one combination pass.
#[derive(Debug)]
pub struct Combination<R> {
    pub filter: CombinedFilter<R>,
    /// Whether listeners must hear about it
    pub notify: bool,
}

/// Folds column criteria into a [`CombinedFilter`] and remembers the last remote
/// aggregate.
#[derive(Debug, Default, Clone)]
pub struct CriterionCombinator {
    current: Option<Condition>,
}

impl CriterionCombinator {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Last remote aggregate that was active, `None` once inactive
    pub const fn current(&self) -> Option<&Condition> {
        self.current.as_ref()
    }

    /// Combine `columns` for `mode`.
    ///
    /// In remote mode this replaces the current aggregate and asks for a
    /// notification whenever the new aggregate is active, or the previous one was.
    /// Active to active notifies on every call even when nothing changed.
    /// In-memory combination never notifies and keeps the current aggregate.
    pub fn combine<R: 'static, E: EntityTrait>(
        &mut self,
        mode: FilterMode,
        columns: &[Column<R, E>],
    ) -> Combination<R> {
        match mode {
            FilterMode::InMemory => Combination {
                filter: Self::in_memory(columns),
                notify: false,
            },
            FilterMode::Remote => {
                let was_active = self.current.is_some();
                let filter = Self::remote(columns);
                let notify = was_active || filter.is_active();
                self.current = filter.condition().cloned();
                Combination { filter, notify }
            }
        }
    }

    /// `AND` of every non-empty column predicate, short-circuiting.
    ///
    /// A grid without filterable columns, or with only empty criteria, lets
    /// every row through.
    pub fn in_memory<R: 'static, E: EntityTrait>(columns: &[Column<R, E>]) -> CombinedFilter<R> {
        let clauses: Vec<RowPredicate<R>> = columns
            .iter()
            .filter_map(Column::filter)
            .filter(|filter| !filter.is_empty())
            .map(|filter| filter.row_predicate())
            .collect();
        let active = !clauses.is_empty();
        let predicate: RowPredicate<R> =
            Arc::new(move |row: &R| clauses.iter().all(|clause| clause(row)));
        CombinedFilter::InMemory { active, predicate }
    }

    /// `AND` of every column fragment that exists.
    pub fn remote<R: 'static, E: EntityTrait>(columns: &[Column<R, E>]) -> CombinedFilter<R> {
        let mut condition = Condition::all();
        let mut active = false;
        for column in columns {
            let Some(filter) = column.filter() else {
                continue;
            };
            match filter.condition() {
                Some(fragment) => {
                    condition = condition.add(fragment);
                    active = true;
                }
                None => {
                    tracing::trace!(
                        column = column.key(),
                        kind = filter.kind(),
                        "No remote fragment"
                    );
                }
            }
        }
        CombinedFilter::Remote {
            active,
            condition: active.then_some(condition),
        }
    }
}
