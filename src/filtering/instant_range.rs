use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};
use sea_orm::{Condition, EntityTrait};

use super::criterion::{FilterCriterion, Predicate};
use super::date_range::within;
use super::source::FieldSource;

/// Inclusive range of zoned instants with nanosecond resolution.
///
/// Bounds can also be set a whole day at a time, in which case they are
/// normalized in the filter's fixed zone: the start to midnight, the end to the
/// last nanosecond of the day. Remotely a closed range is a `BETWEEN`, an open
/// one a single `>=` or `<=`.
#[derive(Debug, Clone)]
pub struct InstantRangeFilter<E: EntityTrait> {
    start: Option<DateTime<FixedOffset>>,
    end: Option<DateTime<FixedOffset>>,
    zone: FixedOffset,
    source: FieldSource<E>,
}

impl<E: EntityTrait> Default for InstantRangeFilter<E> {
    fn default() -> Self {
        Self::new(FieldSource::none())
    }
}

impl<E: EntityTrait> InstantRangeFilter<E> {
    /// New open range evaluated in UTC
    #[must_use]
    pub fn new(source: FieldSource<E>) -> Self {
        Self {
            start: None,
            end: None,
            zone: Utc.fix(),
            source,
        }
    }

    /// Zone used for day-level and local bounds
    #[must_use]
    pub const fn in_zone(mut self, zone: FixedOffset) -> Self {
        self.zone = zone;
        self
    }

    #[must_use]
    pub const fn between(
        mut self,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub const fn zone(&self) -> FixedOffset {
        self.zone
    }

    pub const fn start(&self) -> Option<DateTime<FixedOffset>> {
        self.start
    }

    pub fn set_start(&mut self, start: Option<DateTime<FixedOffset>>) {
        self.start = start;
    }

    pub const fn end(&self) -> Option<DateTime<FixedOffset>> {
        self.end
    }

    pub fn set_end(&mut self, end: Option<DateTime<FixedOffset>>) {
        self.end = end;
    }

    // ============================================================================
    // Local date-time bounds
    // ============================================================================

    pub fn start_local(&self) -> Option<NaiveDateTime> {
        self.start.map(|start| start.with_timezone(&self.zone).naive_local())
    }

    pub fn set_start_local(&mut self, start: Option<NaiveDateTime>) {
        self.start = start.and_then(|local| self.localize(local));
    }

    pub fn end_local(&self) -> Option<NaiveDateTime> {
        self.end.map(|end| end.with_timezone(&self.zone).naive_local())
    }

    pub fn set_end_local(&mut self, end: Option<NaiveDateTime>) {
        self.end = end.and_then(|local| self.localize(local));
    }

    // ============================================================================
    // Whole-day bounds
    // ============================================================================

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_local().map(|local| local.date())
    }

    /// Start at midnight of `day`
    pub fn set_start_date(&mut self, day: Option<NaiveDate>) {
        self.start = day.and_then(|day| self.localize(day.and_time(NaiveTime::MIN)));
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_local().map(|local| local.date())
    }

    /// End one nanosecond before the midnight following `day`
    pub fn set_end_date(&mut self, day: Option<NaiveDate>) {
        self.end = day
            .and_then(|day| day.and_hms_nano_opt(23, 59, 59, 999_999_999))
            .and_then(|local| self.localize(local));
    }

    pub fn source_mut(&mut self) -> &mut FieldSource<E> {
        &mut self.source
    }

    fn localize(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        local.and_local_timezone(self.zone).single()
    }
}

impl<E: EntityTrait> FilterCriterion<E> for InstantRangeFilter<E> {
    type Value = DateTime<FixedOffset>;

    fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    fn predicate(&self) -> Predicate<DateTime<FixedOffset>> {
        let (start, end) = (self.start, self.end);
        // After start minus 1ns, before end plus 1ns
        Arc::new(move |instant: &DateTime<FixedOffset>| {
            start.is_none_or(|start| *instant >= start) && end.is_none_or(|end| *instant <= end)
        })
    }

    fn condition(&self) -> Option<Condition> {
        if self.is_empty() {
            return None;
        }
        self.source
            .constrain(|expr| within(expr, self.start, self.end))
    }

    fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }

    fn source(&self) -> &FieldSource<E> {
        &self.source
    }
}

/// Equality compares the instants only, not the zone they were entered in.
impl<E: EntityTrait> PartialEq for InstantRangeFilter<E> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl<E: EntityTrait> Eq for InstantRangeFilter<E> {}

impl<E: EntityTrait> Hash for InstantRangeFilter<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}
