//! Per-column grid filters that compile either to in-memory predicates or to
//! Sea-ORM conditions.
//!
//! A grid owns one [`FilterModeController`]. Each filterable column carries a
//! criterion (boolean, enumerated, text, date range or instant range). Calling
//! [`FilterModeController::apply_filter`] combines every criterion with `AND`
//! and pushes the result to the attached data source:
//!
//! - in [`FilterMode::InMemory`] as a row predicate
//! - in [`FilterMode::Remote`] as a [`sea_orm::Condition`], ready for `Select::filter`
//!
//! Listeners hear about every change to the remote filter.

pub mod core;
pub mod errors;
pub mod filtering;
pub mod settings;

pub use crate::core::{
    ChannelFilter, ChannelKind, Column, ColumnFilter, Combination, CombinedFilter,
    CriterionCombinator, DataSource, FilterChangeEvent, FilterChannel, FilterEnvelope,
    FilterModeController, ListDataSource, PredicateDataSource, QueryChannel, Registration,
    RowGate, RowPredicate,
};
pub use errors::FilterError;
pub use filtering::{
    BooleanFilter, DateRangeFilter, EnumFilter, FieldSource, FilterCriterion, FilterEnum,
    InstantRangeFilter, TextFilter,
};
pub use settings::{FilterMode, FilterSettings};
