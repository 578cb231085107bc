//! Data sources a combined filter can be pushed to.
//!
//! A grid is backed either by rows it holds itself, which take a predicate
//! directly, or by a provider with a configurable filter channel. A channel
//! accepts exactly one filter kind: a predicate wrapped in a [`FilterEnvelope`]
//! or a Sea-ORM [`Condition`].

use std::{cell::RefCell, fmt, marker::PhantomData, rc::Rc};

use sea_orm::{Condition, EntityTrait, QueryFilter, Select};

use super::column::RowPredicate;
use crate::errors::FilterError;

/// Filter kind a channel accepts or a mode produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Predicate,
    Condition,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate => write!(f, "predicate"),
            Self::Condition => write!(f, "condition"),
        }
    }
}

/// Row predicate in the shape a channel expects.
pub struct FilterEnvelope<R> {
    predicate: RowPredicate<R>,
}

impl<R> FilterEnvelope<R> {
    pub const fn new(predicate: RowPredicate<R>) -> Self {
        Self { predicate }
    }

    pub fn test(&self, row: &R) -> bool {
        (self.predicate)(row)
    }

    pub const fn predicate(&self) -> &RowPredicate<R> {
        &self.predicate
    }
}

impl<R> Clone for FilterEnvelope<R> {
    fn clone(&self) -> Self {
        Self {
            predicate: RowPredicate::clone(&self.predicate),
        }
    }
}

/// What travels through a filter channel. `Condition(None)` means "no filter".
pub enum ChannelFilter<R> {
    Predicate(FilterEnvelope<R>),
    Condition(Option<Condition>),
}

impl<R> ChannelFilter<R> {
    pub const fn kind(&self) -> ChannelKind {
        match self {
            Self::Predicate(_) => ChannelKind::Predicate,
            Self::Condition(_) => ChannelKind::Condition,
        }
    }
}

/// Source that filters its own rows with a predicate.
pub trait PredicateDataSource<R> {
    fn set_filter(&mut self, predicate: Option<RowPredicate<R>>);
}

/// Source with a configurable filter channel.
pub trait FilterChannel<R> {
    /// The only kind this channel can take.
    fn accepts(&self) -> ChannelKind;

    /// Called only with a filter of kind [`accepts`](Self::accepts).
    fn set_filter(&mut self, filter: ChannelFilter<R>);
}

/// Data source attached to a grid.
pub enum DataSource<R> {
    Direct(Box<dyn PredicateDataSource<R>>),
    Channel(Box<dyn FilterChannel<R>>),
}

impl<R> DataSource<R> {
    pub fn direct(source: impl PredicateDataSource<R> + 'static) -> Self {
        Self::Direct(Box::new(source))
    }

    pub fn channel(channel: impl FilterChannel<R> + 'static) -> Self {
        Self::Channel(Box::new(channel))
    }

    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Direct(_) => "direct",
            Self::Channel(_) => "channel",
        }
    }
}

/// Hand `filter` to `channel` if it accepts that kind.
///
/// # Errors
///
/// Returns [`FilterError::ChannelMismatch`] and leaves the channel untouched
/// when the kinds differ.
pub fn deliver<R, C: FilterChannel<R> + ?Sized>(
    channel: &mut C,
    filter: ChannelFilter<R>,
) -> Result<(), FilterError> {
    let expected = channel.accepts();
    let found = filter.kind();
    if expected != found {
        return Err(FilterError::channel_mismatch(expected, found));
    }
    channel.set_filter(filter);
    Ok(())
}

// ============================================================================
// Bundled sources
// ============================================================================

struct ListState<R> {
    items: Vec<R>,
    filter: Option<RowPredicate<R>>,
}

/// In-memory list of rows filtered by predicate.
///
/// Clones share the same list, so a clone kept by the caller sees every filter
/// the grid pushes.
pub struct ListDataSource<R> {
    state: Rc<RefCell<ListState<R>>>,
}

impl<R> ListDataSource<R> {
    pub fn new(items: Vec<R>) -> Self {
        Self {
            state: Rc::new(RefCell::new(ListState {
                items,
                filter: None,
            })),
        }
    }

    pub fn replace_items(&self, items: Vec<R>) {
        self.state.borrow_mut().items = items;
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().items.is_empty()
    }

    pub fn has_filter(&self) -> bool {
        self.state.borrow().filter.is_some()
    }

    /// Number of rows passing the current filter
    pub fn visible_count(&self) -> usize {
        let state = self.state.borrow();
        match &state.filter {
            Some(filter) => state.items.iter().filter(|&row| filter(row)).count(),
            None => state.items.len(),
        }
    }
}

impl<R: Clone> ListDataSource<R> {
    /// Rows passing the current filter, in list order
    pub fn visible_items(&self) -> Vec<R> {
        let state = self.state.borrow();
        state
            .items
            .iter()
            .filter(|&row| state.filter.as_ref().is_none_or(|filter| filter(row)))
            .cloned()
            .collect()
    }
}

impl<R> Clone for ListDataSource<R> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<R> PredicateDataSource<R> for ListDataSource<R> {
    fn set_filter(&mut self, predicate: Option<RowPredicate<R>>) {
        self.state.borrow_mut().filter = predicate;
    }
}

/// Channel feeding a Sea-ORM select.
///
/// Clones share the current condition, so a clone kept by the caller builds
/// queries with whatever the grid pushed last.
///
/// ```rust,ignore
/// let channel = QueryChannel::<task::Entity>::new();
/// grid.attach_data_source(DataSource::channel(channel.clone()));
/// grid.apply_filter();
/// let rows = channel.select().all(&db).await?;
/// ```
pub struct QueryChannel<E: EntityTrait> {
    condition: Rc<RefCell<Option<Condition>>>,
    entity: PhantomData<E>,
}

impl<E: EntityTrait> QueryChannel<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            condition: Rc::new(RefCell::new(None)),
            entity: PhantomData,
        }
    }

    pub fn condition(&self) -> Option<Condition> {
        self.condition.borrow().clone()
    }

    /// `E::find()` restricted by the current condition
    pub fn select(&self) -> Select<E> {
        match self.condition() {
            Some(condition) => E::find().filter(condition),
            None => E::find(),
        }
    }
}

impl<E: EntityTrait> Default for QueryChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> Clone for QueryChannel<E> {
    fn clone(&self) -> Self {
        Self {
            condition: Rc::clone(&self.condition),
            entity: PhantomData,
        }
    }
}

impl<R, E: EntityTrait> FilterChannel<R> for QueryChannel<E> {
    fn accepts(&self) -> ChannelKind {
        ChannelKind::Condition
    }

    fn set_filter(&mut self, filter: ChannelFilter<R>) {
        match filter {
            ChannelFilter::Condition(condition) => *self.condition.borrow_mut() = condition,
            ChannelFilter::Predicate(_) => {
                tracing::debug!("Query channel ignored a predicate filter");
            }
        }
    }
}
