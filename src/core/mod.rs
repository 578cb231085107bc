//! # Grid filter composition
//!
//! Columns carry their criterion as a [`ColumnFilter`]. The
//! [`FilterModeController`] folds them with a [`CriterionCombinator`] into one
//! filter for the active mode, hands that filter to the attached [`DataSource`],
//! and fires a [`FilterChangeEvent`] when the remote filter changes.

pub mod column;
pub mod combinator;
pub mod controller;
pub mod data_source;
pub mod events;
pub mod gating;

pub use column::{Column, ColumnFilter, RowPredicate, ValueFn};
pub use combinator::{Combination, CombinedFilter, CriterionCombinator};
pub use controller::FilterModeController;
pub use data_source::{
    ChannelFilter, ChannelKind, DataSource, FilterChannel, FilterEnvelope, ListDataSource,
    PredicateDataSource, QueryChannel, deliver,
};
pub use events::{FilterChangeEvent, Registration};
pub use gating::RowGate;
