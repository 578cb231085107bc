//! # Column Filter Criteria
//!
//! Each filterable column carries one criterion. A criterion holds the value the
//! user typed or picked and compiles it two ways:
//!
//! - **In memory**: a [`Predicate`] over the column's value
//! - **Remote**: a Sea-ORM [`Condition`](sea_orm::Condition) constraining the column
//!
//! ## Criteria
//!
//! | Criterion | Value | Remote fragment |
//! |---|---|---|
//! | [`BooleanFilter`] | `Option<bool>` | `col = value` |
//! | [`EnumFilter`] | set of [`FilterEnum`] members | `col IN (...)` |
//! | [`TextFilter`] | text, whole field, case, invert | `=`, `UPPER(col) =`, `LIKE`, `NOT (...)` |
//! | [`DateRangeFilter`] | inclusive `NaiveDate` bounds | `BETWEEN`, `col >= start`, `col <= end` |
//! | [`InstantRangeFilter`] | inclusive `DateTime<FixedOffset>` bounds | same as dates |
//!
//! ## Where the remote expression comes from
//!
//! A [`FieldSource`] names an entity column, supplies an arbitrary expression
//! builder, or both. A criterion without either still filters in memory but never
//! produces a remote fragment.
//!
//! ```rust,ignore
//! let title = TextFilter::new(FieldSource::column(task::Column::Title))
//!     .value("urgent")
//!     .case_sensitive(false);
//!
//! let condition = title.condition(); // Some(UPPER("tasks"."title") LIKE '%URGENT%')
//! let matches = title.predicate();   // |s| s.to_uppercase().contains("URGENT")
//! ```

pub mod boolean;
pub mod criterion;
pub mod date_range;
pub mod enumerated;
pub mod instant_range;
pub mod search;
pub mod source;
pub mod text;

pub use boolean::BooleanFilter;
pub use criterion::{FilterCriterion, Predicate, accept_all};
pub use date_range::DateRangeFilter;
pub use enumerated::{EnumFilter, FilterEnum};
pub use instant_range::InstantRangeFilter;
pub use source::{Extractor, FieldSource};
pub use text::TextFilter;
