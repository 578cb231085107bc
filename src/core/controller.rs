use std::fmt;

use chrono::{FixedOffset, Offset, Utc};
use sea_orm::{Condition, EntityTrait};

use super::{
    column::Column,
    combinator::{CombinedFilter, CriterionCombinator},
    data_source::{ChannelFilter, DataSource, FilterEnvelope, deliver},
    events::{FilterChangeEvent, Listeners, Registration},
    gating::RowGate,
};
use crate::{
    errors::FilterError,
    settings::{FilterMode, FilterSettings},
};

/// Filtering state of one grid.
///
/// Owns the columns and their criteria, routes the combined filter to the
/// attached data source for the active [`FilterMode`], and tells listeners when
/// the remote filter changes.
///
/// ```rust,ignore
/// let channel = QueryChannel::<task::Entity>::new();
/// let mut grid = FilterModeController::<Task, task::Entity>::new(&settings)?
///     .with_column(Column::new("done").with_filter(ColumnFilter::boolean(
///         BooleanFilter::new(FieldSource::column(task::Column::Completed)),
///         |t: &Task| t.completed,
///     )));
/// grid.attach_data_source(DataSource::channel(channel.clone()));
///
/// grid.column_mut("done")
///     .and_then(Column::filter_mut)
///     .and_then(ColumnFilter::as_boolean_mut)
///     .map(|done| done.set_value(Some(false)));
/// grid.apply_filter();
/// ```
pub struct FilterModeController<R, E: EntityTrait> {
    columns: Vec<Column<R, E>>,
    combinator: CriterionCombinator,
    mode: FilterMode,
    zone: FixedOffset,
    source: String,
    data_source: Option<DataSource<R>>,
    listeners: Listeners,
    row_gate: RowGate<R>,
}

impl<R: 'static, E: EntityTrait> Default for FilterModeController<R, E> {
    fn default() -> Self {
        let settings = FilterSettings::default();
        Self::with_parts(settings.mode, Utc.fix(), settings.source)
    }
}

impl<R: 'static, E: EntityTrait> FilterModeController<R, E> {
    /// Controller configured from `settings`, without columns or data source.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidTimeZone`] when the configured offset is out
    /// of range.
    pub fn new(settings: &FilterSettings) -> Result<Self, FilterError> {
        let zone = settings.time_zone().inspect_err(FilterError::log_internal)?;
        Ok(Self::with_parts(settings.mode, zone, settings.source.clone()))
    }

    fn with_parts(mode: FilterMode, zone: FixedOffset, source: String) -> Self {
        Self {
            columns: Vec::new(),
            combinator: CriterionCombinator::new(),
            mode,
            zone,
            source,
            data_source: None,
            listeners: Listeners::default(),
            row_gate: RowGate::default(),
        }
    }

    // ============================================================================
    // Columns
    // ============================================================================

    pub fn add_column(&mut self, column: Column<R, E>) {
        self.columns.push(column);
    }

    #[must_use]
    pub fn with_column(mut self, column: Column<R, E>) -> Self {
        self.add_column(column);
        self
    }

    pub fn columns(&self) -> &[Column<R, E>] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&Column<R, E>> {
        self.columns.iter().find(|column| column.key() == key)
    }

    /// Editors change a criterion through this, then call [`apply_filter`](Self::apply_filter).
    pub fn column_mut(&mut self, key: &str) -> Option<&mut Column<R, E>> {
        self.columns.iter_mut().find(|column| column.key() == key)
    }

    // ============================================================================
    // Filtering
    // ============================================================================

    /// Recombine every column criterion, push the result to the attached data
    /// source and notify listeners if the remote filter is, or just stopped
    /// being, active.
    ///
    /// A data source that cannot take the filter for the current mode is
    /// reported through `tracing`; the current criterion and listeners are
    /// updated regardless.
    pub fn apply_filter(&mut self) {
        let combination = self.combinator.combine(self.mode, &self.columns);
        tracing::debug!(
            source = %self.source,
            mode = ?self.mode,
            active = combination.filter.is_active(),
            notify = combination.notify,
            "Applying grid filter"
        );

        let criterion = combination.filter.condition().cloned();
        if let Err(err) = self.push(combination.filter) {
            err.log_internal();
        }

        if combination.notify {
            let event = FilterChangeEvent::new(self.source.clone(), false, criterion);
            self.listeners.fire(&event);
        }
    }

    fn push(&mut self, filter: CombinedFilter<R>) -> Result<(), FilterError> {
        let Some(data_source) = self.data_source.as_mut() else {
            tracing::debug!(source = %self.source, "No data source attached, filter not pushed");
            return Ok(());
        };

        match (filter, data_source) {
            (CombinedFilter::InMemory { predicate, .. }, DataSource::Direct(direct)) => {
                direct.set_filter(Some(predicate));
                Ok(())
            }
            (CombinedFilter::InMemory { predicate, .. }, DataSource::Channel(channel)) => deliver(
                &mut **channel,
                ChannelFilter::Predicate(FilterEnvelope::new(predicate)),
            ),
            (CombinedFilter::Remote { condition, .. }, DataSource::Channel(channel)) => {
                deliver(&mut **channel, ChannelFilter::Condition(condition))
            }
            (CombinedFilter::Remote { .. }, DataSource::Direct(_)) => {
                tracing::debug!(
                    source = %self.source,
                    "Direct data source ignores remote filters"
                );
                Ok(())
            }
        }
    }

    /// Reset every criterion to empty, then [`apply_filter`](Self::apply_filter).
    pub fn clear_all_filters(&mut self) {
        for column in &mut self.columns {
            column.clear_filter();
        }
        self.apply_filter();
    }

    /// True when any column holds a non-empty criterion
    pub fn is_filtered(&self) -> bool {
        self.columns.iter().any(Column::is_filtered)
    }

    /// Remote filter produced by the last remote [`apply_filter`](Self::apply_filter)
    pub const fn current_remote_criterion(&self) -> Option<&Condition> {
        self.combinator.current()
    }

    // ============================================================================
    // Listeners
    // ============================================================================

    /// Register `listener` for every [`FilterChangeEvent`] fired by this grid.
    pub fn add_filter_change_listener(
        &self,
        listener: impl FnMut(&FilterChangeEvent) + 'static,
    ) -> Registration {
        self.listeners.add(listener)
    }

    // ============================================================================
    // Configuration
    // ============================================================================

    pub const fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Switch mode. Criteria are kept; the new mode takes effect on the next
    /// [`apply_filter`](Self::apply_filter).
    pub fn set_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
    }

    /// Fixed zone for day-level instant filters
    pub const fn zone(&self) -> FixedOffset {
        self.zone
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Attach `data_source`, returning the previous one
    pub fn attach_data_source(&mut self, data_source: DataSource<R>) -> Option<DataSource<R>> {
        self.data_source.replace(data_source)
    }

    pub fn detach_data_source(&mut self) -> Option<DataSource<R>> {
        self.data_source.take()
    }

    pub const fn row_gate(&self) -> &RowGate<R> {
        &self.row_gate
    }

    pub fn row_gate_mut(&mut self) -> &mut RowGate<R> {
        &mut self.row_gate
    }
}

impl<R, E: EntityTrait> fmt::Debug for FilterModeController<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterModeController")
            .field("columns", &self.columns.len())
            .field("mode", &self.mode)
            .field("zone", &self.zone)
            .field("source", &self.source)
            .field(
                "data_source",
                &self.data_source.as_ref().map(DataSource::kind_name),
            )
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

