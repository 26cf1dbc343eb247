//! Configuration settings and validation.

use std::time::Duration;

use crate::source::S3Options;
use crate::watcher::{WatchPath, WatcherConfig};
use crate::{Error, Result};

/// Main configuration for the csnotify binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seconds between poll cycles.
    pub poll_interval_secs: u64,

    /// Events buffered before polling waits for the consumer.
    pub event_buffer: usize,

    /// Fetch errors buffered before polling waits for the consumer.
    pub error_buffer: usize,

    /// Per-fetch timeout in seconds; 0 disables the timeout.
    pub fetch_timeout_secs: u64,

    /// AWS region for the S3 source.
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores.
    pub endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON logs.
    pub log_json: bool,

    /// Object paths to watch.
    pub paths: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            event_buffer: 1,
            error_buffer: 1,
            fetch_timeout_secs: 30,
            region: None,
            endpoint: None,
            log_level: "info".to_string(),
            log_json: false,
            paths: Vec::new(),
        }
    }
}

impl Config {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        self.watcher_config().validate()?;

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        if self.endpoint.as_deref().is_some_and(str::is_empty) {
            return Err(Error::config("endpoint cannot be empty"));
        }

        for path in &self.paths {
            WatchPath::parse(path.as_str())?;
        }

        Ok(())
    }

    /// Watcher settings derived from this configuration.
    #[must_use]
    pub fn watcher_config(&self) -> WatcherConfig {
        WatcherConfig {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            event_buffer: self.event_buffer,
            error_buffer: self.error_buffer,
            fetch_timeout: (self.fetch_timeout_secs > 0)
                .then(|| Duration::from_secs(self.fetch_timeout_secs)),
        }
    }

    /// S3 connection options derived from this configuration.
    #[must_use]
    pub fn s3_options(&self) -> S3Options {
        S3Options {
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval_secs, 5);
        assert!(config.paths.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_buffer_defaults_match_watcher() {
        let config = Config::default().watcher_config();
        let watcher = WatcherConfig::default();
        assert_eq!(config.event_buffer, watcher.event_buffer);
        assert_eq!(config.error_buffer, watcher.error_buffer);
        assert_eq!(config.poll_interval, watcher.poll_interval);
        assert_eq!(config.fetch_timeout, watcher.fetch_timeout);
    }

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_interval() {
        let config = Config {
            poll_interval_secs: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("poll interval"));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = Config {
            log_level: "invalid".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log level"));
    }

    #[test]
    fn test_log_level_case_insensitive() {
        for level in ["TRACE", "Debug", "INFO", "Warn", "ERROR"] {
            let config = Config {
                log_level: level.to_string(),
                ..Default::default()
            };
            assert!(
                config.validate().is_ok(),
                "Level '{level}' should be valid (case insensitive)"
            );
        }
    }

    #[test]
    fn test_validate_empty_endpoint() {
        let config = Config {
            endpoint: Some(String::new()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("endpoint"));
    }

    #[test]
    fn test_validate_malformed_path() {
        let config = Config {
            paths: vec!["s3://bucket/key".to_string(), "s3://bucket".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("s3://bucket"));
    }

    #[test]
    fn test_watcher_config_mapping() {
        let config = Config {
            poll_interval_secs: 10,
            event_buffer: 8,
            fetch_timeout_secs: 0,
            ..Default::default()
        };
        let watcher = config.watcher_config();
        assert_eq!(watcher.poll_interval, Duration::from_secs(10));
        assert_eq!(watcher.event_buffer, 8);
        assert_eq!(watcher.error_buffer, 1);
        assert!(watcher.fetch_timeout.is_none());
    }

    #[test]
    fn test_s3_options_mapping() {
        let config = Config {
            region: Some("eu-west-1".to_string()),
            endpoint: Some("http://localhost:9000".to_string()),
            ..Default::default()
        };
        let options = config.s3_options();
        assert_eq!(options.region.as_deref(), Some("eu-west-1"));
        assert_eq!(options.endpoint.as_deref(), Some("http://localhost:9000"));
    }
}
