use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use sea_orm::Condition;

/// Fired after `apply_filter` when the remote filter is active, or has just
/// stopped being active.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChangeEvent {
    source: String,
    from_user_interaction: bool,
    criterion: Option<Condition>,
}

impl FilterChangeEvent {
    pub fn new(
        source: impl Into<String>,
        from_user_interaction: bool,
        criterion: Option<Condition>,
    ) -> Self {
        Self {
            source: source.into(),
            from_user_interaction,
            criterion,
        }
    }

    /// Label of the grid that fired the event
    pub fn source(&self) -> &str {
        &self.source
    }

    pub const fn is_from_user_interaction(&self) -> bool {
        self.from_user_interaction
    }

    /// The newly combined remote filter, `None` once every filter is cleared
    pub const fn criterion(&self) -> Option<&Condition> {
        self.criterion.as_ref()
    }
}

type Listener = Rc<RefCell<dyn FnMut(&FilterChangeEvent)>>;

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Listeners registered on one grid.
#[derive(Default)]
pub(crate) struct Listeners {
    table: Rc<RefCell<ListenerTable>>,
}

impl Listeners {
    pub(crate) fn add(&self, listener: impl FnMut(&FilterChangeEvent) + 'static) -> Registration {
        let mut table = self.table.borrow_mut();
        let id = table.next_id;
        table.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        table.entries.push((id, listener));
        Registration {
            id,
            table: Rc::downgrade(&self.table),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.table.borrow().entries.len()
    }

    /// Call every listener registered when dispatch starts.
    ///
    /// Listeners may add or remove registrations while being called.
    pub(crate) fn fire(&self, event: &FilterChangeEvent) {
        let snapshot: Vec<Listener> = self
            .table
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            let mut listener = listener.borrow_mut();
            (&mut *listener)(event);
        }
    }
}

/// Handle returned by listener registration.
///
/// Dropping the handle keeps the listener; call [`remove`](Self::remove) to
/// unregister it.
#[derive(Debug)]
pub struct Registration {
    id: u64,
    table: Weak<RefCell<ListenerTable>>,
}

impl Registration {
    /// Unregister the listener. Returns false if it was already gone.
    pub fn remove(self) -> bool {
        let Some(table) = self.table.upgrade() else {
            return false;
        };
        let mut table = table.borrow_mut();
        let before = table.entries.len();
        table.entries.retain(|(id, _)| *id != self.id);
        table.entries.len() != before
    }
}
