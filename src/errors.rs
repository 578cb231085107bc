//! # Error Handling for Grid Filtering
//!
//! Filtering itself is total: criteria and the combinator never fail. The errors
//! in this module cover the edges where the engine meets the outside world:
//! - a data source whose filter channel expects a different envelope
//! - settings that cannot be parsed
//! - a configured time zone offset that chrono rejects
//!
//! Channel mismatches are recovered inside [`FilterModeController::apply_filter`]
//! and only logged. The other variants are returned to the caller.
//!
//! ## Logging
//!
//! Errors are logged using the `tracing` crate. The library never installs a
//! subscriber, so nothing is printed unless the application sets one up:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt()
//!     .with_target(false)
//!     .compact()
//!     .init();
//! ```
//!
//! [`FilterModeController::apply_filter`]: crate::core::FilterModeController::apply_filter

use std::fmt;

use crate::core::ChannelKind;

/// Error type for filter configuration and delivery problems
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The attached data source exposes a channel for a different filter type
    ChannelMismatch {
        /// What the channel accepts
        expected: ChannelKind,
        /// What the active mode produced
        found: ChannelKind,
    },

    /// Settings could not be deserialized
    InvalidSettings {
        /// Parser message
        message: String,
    },

    /// UTC offset outside of what a fixed time zone can represent
    InvalidTimeZone {
        /// Offending offset, in seconds east of UTC
        offset_seconds: i32,
    },
}

impl FilterError {
    // ============================================================================
    // Constructors
    // ============================================================================

    /// Create a channel mismatch error
    ///
    /// # Example
    /// ```rust,ignore
    /// return Err(FilterError::channel_mismatch(ChannelKind::Predicate, ChannelKind::Condition));
    /// ```
    #[must_use]
    pub const fn channel_mismatch(expected: ChannelKind, found: ChannelKind) -> Self {
        Self::ChannelMismatch { expected, found }
    }

    /// Create an invalid settings error
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings {
            message: message.into(),
        }
    }

    /// Create an invalid time zone error
    #[must_use]
    pub const fn invalid_time_zone(offset_seconds: i32) -> Self {
        Self::InvalidTimeZone { offset_seconds }
    }

    // ============================================================================
    // Logging
    // ============================================================================

    /// Emit this error through `tracing`
    ///
    /// Configuration mismatches are warnings: the filter application carries on
    /// without pushing to the data source.
    pub fn log_internal(&self) {
        match self {
            Self::ChannelMismatch { expected, found } => {
                tracing::warn!(
                    expected = %expected,
                    found = %found,
                    "Data source channel does not accept the combined filter, skipping push"
                );
            }
            Self::InvalidSettings { message } => {
                tracing::error!(details = %message, "Invalid filter settings");
            }
            Self::InvalidTimeZone { offset_seconds } => {
                tracing::error!(offset_seconds, "Invalid time zone offset");
            }
        }
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelMismatch { expected, found } => write!(
                f,
                "data source channel accepts {expected} filters, got a {found} filter"
            ),
            Self::InvalidSettings { message } => write!(f, "invalid filter settings: {message}"),
            Self::InvalidTimeZone { offset_seconds } => {
                write!(f, "invalid UTC offset: {offset_seconds} seconds")
            }
        }
    }
}

impl std::error::Error for FilterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_mismatch_message_names_both_kinds() {
        let err = FilterError::channel_mismatch(ChannelKind::Predicate, ChannelKind::Condition);
        let message = err.to_string();
        assert!(message.contains("predicate"), "got: {message}");
        assert!(message.contains("condition"), "got: {message}");
    }

    #[test]
    fn test_invalid_time_zone_message() {
        let err = FilterError::invalid_time_zone(90_000);
        assert_eq!(err.to_string(), "invalid UTC offset: 90000 seconds");
    }
}
