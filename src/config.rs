//! Router configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`RouterConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid router configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("history_limit must be at least 1")]
    ZeroHistoryLimit,
}

/// Records kept in the navigation log unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Tunables applied when a router is built.
///
/// Every field has a default, so an empty JSON object is a valid config.
///
/// # Example
///
/// ```rust
/// use waypoint::config::{RouterConfig, DEFAULT_HISTORY_LIMIT};
///
/// let config = RouterConfig::from_json_str(r#"{ "strict_patterns": true }"#).unwrap();
/// assert!(config.strict_patterns);
/// assert_eq!(config.history_limit, Some(DEFAULT_HISTORY_LIMIT));
///
/// let unbounded = RouterConfig::from_json_str(r#"{ "history_limit": null }"#).unwrap();
/// assert_eq!(unbounded.history_limit, None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Reject routes whose patterns have structural issues at build time.
    pub strict_patterns: bool,
    /// Keep at most this many records in the navigation log. `None`
    /// keeps every record.
    pub history_limit: Option<usize>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            strict_patterns: false,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl RouterConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == Some(0) {
            return Err(ConfigError::ZeroHistoryLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        assert_eq!(RouterConfig::from_json_str("{}").unwrap(), RouterConfig::default());
    }

    #[test]
    fn fields_are_read() {
        let config =
            RouterConfig::from_json_str(r#"{ "strict_patterns": true, "history_limit": 50 }"#)
                .unwrap();

        assert!(config.strict_patterns);
        assert_eq!(config.history_limit, Some(50));
    }

    #[test]
    fn history_is_bounded_by_default() {
        assert_eq!(
            RouterConfig::default().history_limit,
            Some(DEFAULT_HISTORY_LIMIT)
        );
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(
            RouterConfig::from_json_str("{ strict"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_history_limit_is_rejected() {
        assert!(matches!(
            RouterConfig::from_json_str(r#"{ "history_limit": 0 }"#),
            Err(ConfigError::ZeroHistoryLimit)
        ));
    }
}
