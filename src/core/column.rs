use std::{fmt, sync::Arc};

use chrono::{DateTime, FixedOffset, NaiveDate};
use sea_orm::{Condition, EntityTrait};

use crate::filtering::{
    BooleanFilter, DateRangeFilter, EnumFilter, FilterCriterion, FilterEnum, InstantRangeFilter,
    TextFilter,
};

/// Reads one column's value out of a row.
pub type ValueFn<R, V> = Arc<dyn Fn(&R) -> V + Send + Sync>;

/// In-memory test over a whole row.
pub type RowPredicate<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// A column's criterion paired with the function reading its value from a row.
///
/// The set of criterion kinds is closed; the combinator only talks to this type
/// through [`is_empty`](Self::is_empty), [`row_predicate`](Self::row_predicate),
/// [`condition`](Self::condition) and [`clear`](Self::clear).
pub enum ColumnFilter<R, E: EntityTrait> {
    Boolean {
        criterion: BooleanFilter<E>,
        value: ValueFn<R, bool>,
    },
    Enumerated {
        criterion: EnumFilter<E>,
        value: ValueFn<R, &'static str>,
    },
    Text {
        criterion: TextFilter<E>,
        value: ValueFn<R, String>,
    },
    DateRange {
        criterion: DateRangeFilter<E>,
        value: ValueFn<R, NaiveDate>,
    },
    InstantRange {
        criterion: InstantRangeFilter<E>,
        value: ValueFn<R, DateTime<FixedOffset>>,
    },
}

/// Run `$body` with `$criterion` and `$value` bound, whatever the variant
macro_rules! each_variant {
    ($filter:expr, $criterion:ident, $value:ident => $body:expr) => {
        match $filter {
            ColumnFilter::Boolean { criterion: $criterion, value: $value } => $body,
            ColumnFilter::Enumerated { criterion: $criterion, value: $value } => $body,
            ColumnFilter::Text { criterion: $criterion, value: $value } => $body,
            ColumnFilter::DateRange { criterion: $criterion, value: $value } => $body,
            ColumnFilter::InstantRange { criterion: $criterion, value: $value } => $body,
        }
    };
}

impl<R: 'static, E: EntityTrait> ColumnFilter<R, E> {
    // ============================================================================
    // Constructors
    // ============================================================================

    pub fn boolean(
        criterion: BooleanFilter<E>,
        value: impl Fn(&R) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Boolean {
            criterion,
            value: Arc::new(value),
        }
    }

    /// Rows are compared by [`FilterEnum::name`].
    pub fn enumerated<M: FilterEnum + 'static>(
        criterion: EnumFilter<E>,
        value: impl Fn(&R) -> M + Send + Sync + 'static,
    ) -> Self {
        Self::Enumerated {
            criterion,
            value: Arc::new(move |row: &R| value(row).name()),
        }
    }

    pub fn text(
        criterion: TextFilter<E>,
        value: impl Fn(&R) -> String + Send + Sync + 'static,
    ) -> Self {
        Self::Text {
            criterion,
            value: Arc::new(value),
        }
    }

    /// Text filter over any displayable value, matched against its `Display` output.
    pub fn text_display<T: fmt::Display + 'static>(
        criterion: TextFilter<E>,
        value: impl Fn(&R) -> T + Send + Sync + 'static,
    ) -> Self {
        Self::Text {
            criterion,
            value: Arc::new(move |row: &R| value(row).to_string()),
        }
    }

    pub fn date_range(
        criterion: DateRangeFilter<E>,
        value: impl Fn(&R) -> NaiveDate + Send + Sync + 'static,
    ) -> Self {
        Self::DateRange {
            criterion,
            value: Arc::new(value),
        }
    }

    pub fn instant_range(
        criterion: InstantRangeFilter<E>,
        value: impl Fn(&R) -> DateTime<FixedOffset> + Send + Sync + 'static,
    ) -> Self {
        Self::InstantRange {
            criterion,
            value: Arc::new(value),
        }
    }

    // ============================================================================
    // Capabilities used by the combinator
    // ============================================================================

    pub fn is_empty(&self) -> bool {
        each_variant!(self, criterion, _value => criterion.is_empty())
    }

    /// The criterion's predicate applied to this column's value of a row.
    pub fn row_predicate(&self) -> RowPredicate<R> {
        each_variant!(self, criterion, value => {
            let predicate = criterion.predicate();
            let value = Arc::clone(value);
            Arc::new(move |row: &R| predicate(&value(row))) as RowPredicate<R>
        })
    }

    pub fn condition(&self) -> Option<Condition> {
        each_variant!(self, criterion, _value => criterion.condition())
    }

    pub fn clear(&mut self) {
        each_variant!(self, criterion, _value => criterion.clear());
    }

    /// Short name of the criterion kind, for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Boolean { .. } => "boolean",
            Self::Enumerated { .. } => "enumerated",
            Self::Text { .. } => "text",
            Self::DateRange { .. } => "date_range",
            Self::InstantRange { .. } => "instant_range",
        }
    }

    // ============================================================================
    // Typed access for editors
    // ============================================================================

    pub const fn as_boolean(&self) -> Option<&BooleanFilter<E>> {
        match self {
            Self::Boolean { criterion, .. } => Some(criterion),
            _ => None,
        }
    }

    pub fn as_boolean_mut(&mut self) -> Option<&mut BooleanFilter<E>> {
        match self {
            Self::Boolean { criterion, .. } => Some(criterion),
            _ => None,
        }
    }

    pub const fn as_enumerated(&self) -> Option<&EnumFilter<E>> {
        match self {
            Self::Enumerated { criterion, .. } => Some(criterion),
            _ => None,
        }
    }

    pub fn as_enumerated_mut(&mut self) -> Option<&mut EnumFilter<E>> {
        match self {
            Self::Enumerated { criterion, .. } => Some(criterion),
            _ => None,
        }
    }

    pub const fn as_text(&self) -> Option<&TextFilter<E>> {
        match self {
            Self::Text { criterion, .. } => Some(criterion),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextFilter<E>> {
        match self {
            Self::Text { criterion, .. } => Some(criterion),
            _ => None,
        }
    }

    pub const fn as_date_range(&self) -> Option<&DateRangeFilter<E>> {
        match self {
            Self::DateRange { criterion, .. } => Some(criterion),
            _ => None,
        }
    }

    pub fn as_date_range_mut(&mut self) -> Option<&mut DateRangeFilter<E>> {
        match self {
            Self::DateRange { criterion, .. } => Some(criterion),
            _ => None,
        }
    }

    pub const fn as_instant_range(&self) -> Option<&InstantRangeFilter<E>> {
        match self {
            Self::InstantRange { criterion, .. } => Some(criterion),
            _ => None,
        }
    }

    pub fn as_instant_range_mut(&mut self) -> Option<&mut InstantRangeFilter<E>> {
        match self {
            Self::InstantRange { criterion, .. } => Some(criterion),
            _ => None,
        }
    }
}

impl<R, E: EntityTrait> fmt::Debug for ColumnFilter<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        each_variant!(self, criterion, _value => {
            f.debug_tuple("ColumnFilter").field(criterion).finish()
        })
    }
}

/// A grid column as far as filtering is concerned.
#[derive(Debug)]
pub struct Column<R, E: EntityTrait> {
    key: String,
    filter: Option<ColumnFilter<R, E>>,
}

impl<R: 'static, E: EntityTrait> Column<R, E> {
    /// Column without a filter
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            filter: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: ColumnFilter<R, E>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn filter(&self) -> Option<&ColumnFilter<R, E>> {
        self.filter.as_ref()
    }

    pub fn filter_mut(&mut self) -> Option<&mut ColumnFilter<R, E>> {
        self.filter.as_mut()
    }

    pub fn set_filter(&mut self, filter: Option<ColumnFilter<R, E>>) {
        self.filter = filter;
    }

    /// Reset the criterion to empty, keeping the column filterable
    pub fn clear_filter(&mut self) {
        if let Some(filter) = self.filter.as_mut() {
            filter.clear();
        }
    }

    /// True when the column has a non-empty criterion
    pub fn is_filtered(&self) -> bool {
        self.filter.as_ref().is_some_and(|filter| !filter.is_empty())
    }
}
