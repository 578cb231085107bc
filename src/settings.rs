use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::errors::FilterError;

/// Where the combined filter is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Rows already loaded are tested against a predicate.
    InMemory,
    /// The filter is handed to the query engine as a `Condition`.
    #[default]
    Remote,
}

/// Settings for a filtered grid.
///
/// Every field is optional when deserializing. For example
/// `{"mode": "in_memory", "utc_offset_seconds": 3600}` keeps the default source label:
///
/// ```json
/// {"mode": "remote", "utc_offset_seconds": 0, "source": "orders"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Execution mode used by the first `apply_filter` call.
    ///
    /// Example: `"remote"`
    pub mode: FilterMode,
    /// Fixed zone for day-level instant filters, seconds east of UTC.
    ///
    /// Example: `3600`
    pub utc_offset_seconds: i32,
    /// Label carried by every `FilterChangeEvent`.
    ///
    /// Example: `"orders"`
    pub source: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            mode: FilterMode::default(),
            utc_offset_seconds: 0,
            source: "grid".to_string(),
        }
    }
}

impl FilterSettings {
    /// Parse settings from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidSettings`] when the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        serde_json::from_str(json).map_err(|e| {
            let err = FilterError::invalid_settings(e.to_string());
            err.log_internal();
            err
        })
    }

    /// The configured fixed time zone.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidTimeZone`] when the offset is a day or more.
    pub fn time_zone(&self) -> Result<FixedOffset, FilterError> {
        FixedOffset::east_opt(self.utc_offset_seconds)
            .ok_or(FilterError::invalid_time_zone(self.utc_offset_seconds))
    }
}
