//! Configuration for a timeline

use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

/// Default number of retained events
pub const DEFAULT_MAX_SIZE: usize = 10_000;

/// Default result cap for queries that do not set one
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Environment variable overriding [`TimelineConfig::max_size`]
pub const MAX_SIZE_ENV: &str = "LOOKBACK_TIMELINE_MAX_SIZE";

/// Environment variable overriding [`TimelineConfig::default_query_limit`]
pub const QUERY_LIMIT_ENV: &str = "LOOKBACK_TIMELINE_QUERY_LIMIT";

/// Configuration for a [`StateTimeline`](crate::StateTimeline)
///
/// Serializes as camelCase (`maxSize`, `defaultQueryLimit`), like the rest of
/// the crate's JSON surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Maximum number of retained events; memory stays O(max_size)
    pub max_size: usize,
    /// Result cap applied when a query does not carry its own limit
    pub default_query_limit: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            default_query_limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

impl TimelineConfig {
    /// Create config from environment variables
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self, TimelineError> {
        let defaults = Self::default();
        Ok(Self {
            max_size: env_usize(MAX_SIZE_ENV)?.unwrap_or(defaults.max_size),
            default_query_limit: env_usize(QUERY_LIMIT_ENV)?
                .unwrap_or(defaults.default_query_limit),
        })
    }

    /// Set the retained event capacity
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the default query limit
    pub fn with_default_query_limit(mut self, limit: usize) -> Self {
        self.default_query_limit = limit;
        self
    }

    /// Check that the configuration describes a usable timeline
    pub fn validate(&self) -> Result<(), TimelineError> {
        if self.max_size == 0 {
            return Err(TimelineError::InvalidCapacity);
        }
        Ok(())
    }
}

fn env_usize(key: &str) -> Result<Option<usize>, TimelineError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| TimelineError::invalid_config(key, raw)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TimelineConfig::default();
        assert_eq!(config.max_size, 10_000);
        assert_eq!(config.default_query_limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        let config = TimelineConfig::default().with_max_size(0);
        assert!(matches!(config.validate(), Err(TimelineError::InvalidCapacity)));
    }

    #[test]
    fn test_builder_methods() {
        let config = TimelineConfig::default()
            .with_max_size(3)
            .with_default_query_limit(2);
        assert_eq!(config.max_size, 3);
        assert_eq!(config.default_query_limit, 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TimelineConfig = serde_json::from_str(r#"{"maxSize": 50}"#).unwrap();
        assert_eq!(config.max_size, 50);
        assert_eq!(config.default_query_limit, DEFAULT_QUERY_LIMIT);

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["maxSize"], 50);
        assert_eq!(value["defaultQueryLimit"], 100);
    }

    #[test]
    fn test_from_env() {
        // SAFETY: this is the only test that reads or writes these variables.
        unsafe {
            std::env::set_var(MAX_SIZE_ENV, "250");
            std::env::set_var(QUERY_LIMIT_ENV, " 7 ");
        }
        let config = TimelineConfig::from_env().unwrap();
        assert_eq!(config.max_size, 250);
        assert_eq!(config.default_query_limit, 7);

        unsafe {
            std::env::remove_var(MAX_SIZE_ENV);
            std::env::remove_var(QUERY_LIMIT_ENV);
        }
        assert_eq!(TimelineConfig::from_env().unwrap(), TimelineConfig::default());

        unsafe { std::env::set_var(MAX_SIZE_ENV, "ten") };
        let err = TimelineConfig::from_env().unwrap_err();
        unsafe { std::env::remove_var(MAX_SIZE_ENV) };
        let TimelineError::InvalidConfig { key, value } = err else {
            panic!("expected InvalidConfig");
        };
        assert_eq!(key, MAX_SIZE_ENV);
        assert_eq!(value, "ten");
    }
}
