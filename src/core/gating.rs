use std::{fmt, sync::Arc};

use super::column::RowPredicate;

/// Per-row permission checks consumed by the grid: may a row be selected, may an
/// edit session start on it. Both default to allowing every row.
pub struct RowGate<R> {
    selection: RowPredicate<R>,
    edit: RowPredicate<R>,
}

impl<R: 'static> Default for RowGate<R> {
    fn default() -> Self {
        Self {
            selection: Arc::new(|_: &R| true),
            edit: Arc::new(|_: &R| true),
        }
    }
}

impl<R: 'static> RowGate<R> {
    pub fn can_select(&self, row: &R) -> bool {
        (self.selection)(row)
    }

    pub fn can_edit(&self, row: &R) -> bool {
        (self.edit)(row)
    }

    pub fn set_selection_predicate(
        &mut self,
        predicate: impl Fn(&R) -> bool + Send + Sync + 'static,
    ) {
        self.selection = Arc::new(predicate);
    }

    pub fn set_edit_predicate(
        &mut self,
        predicate: impl Fn(&R) -> bool + Send + Sync + 'static,
    ) {
        self.edit = Arc::new(predicate);
    }

    /// Rows that may be selected, used for "select all"
    pub fn selectable<'a>(&self, rows: &'a [R]) -> Vec<&'a R> {
        rows.iter().filter(|&row| self.can_select(row)).collect()
    }
}

impl<R> fmt::Debug for RowGate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowGate").finish_non_exhaustive()
    }
}
