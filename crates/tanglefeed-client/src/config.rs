//! Client configuration.
//!
//! Loaded from a TOML file; every field has a default.
//!
//! ```toml
//! url = "ws://127.0.0.1:8081/ws"
//! series_capacity = 100
//! event_capacity = 100
//! ```

use crate::ClientError;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_URL: &str = "ws://127.0.0.1:8081/ws";
pub const DEFAULT_SERIES_CAPACITY: usize = 100;
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// WebSocket endpoint of the node's dashboard feed.
    pub url: String,
    /// Samples kept per metric series.
    pub series_capacity: usize,
    /// Pledge/revoke events kept.
    pub event_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            series_capacity: DEFAULT_SERIES_CAPACITY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ClientError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ClientError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.url.is_empty() {
            return Err(ClientError::InvalidConfig("url cannot be empty".into()));
        }
        if self.series_capacity == 0 {
            return Err(ClientError::InvalidConfig(
                "series_capacity must be at least 1".into(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(ClientError::InvalidConfig(
                "event_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.series_capacity, 100);
    }

    #[test]
    fn partial_override() {
        let config = ClientConfig::from_toml_str("series_capacity = 3").unwrap();
        assert_eq!(config.series_capacity, 3);
        assert_eq!(config.url, DEFAULT_URL);
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = ClientConfig::from_toml_str("event_capacity = 0").unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = ClientConfig::from_toml_str("capacity = 3").unwrap_err();
        assert!(matches!(err, ClientError::ConfigParse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ClientConfig::load("/nonexistent/tanglefeed.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tanglefeed.toml"));
    }
}
