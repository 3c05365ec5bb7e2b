//! Error types for lookback-timeline
//!
//! The store itself is total: appending and querying never fail. Errors only
//! arise when a timeline is misconfigured or when user-facing input (such as
//! an event kind string) cannot be parsed.

use thiserror::Error;

/// Errors that can occur when building or configuring a timeline
#[derive(Debug, Error)]
pub enum TimelineError {
    /// A timeline was configured to retain zero events
    #[error("Invalid capacity: a timeline must retain at least one event")]
    InvalidCapacity,

    /// A configuration value could not be parsed
    #[error("Invalid configuration value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },

    /// An event kind string did not name a known kind
    #[error("Unknown event kind: {0}")]
    UnknownEventKind(String),
}

impl TimelineError {
    /// Create a new InvalidConfig error
    pub fn invalid_config(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a new UnknownEventKind error
    pub fn unknown_event_kind(kind: impl Into<String>) -> Self {
        Self::UnknownEventKind(kind.into())
    }
}
