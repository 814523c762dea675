//! Configuration schema definitions.
//!
//! This module defines the `[logger]` block of the backend settings file.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::format::{DEFAULT_DATE_FORMAT, DEFAULT_FORMAT};

/// Environment variable naming the root under which `logs/` is created.
pub const HOME_PATH_ENV: &str = "HOME_PATH";

/// Root of a settings file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// The `LOGGER` block handed to every logger facade.
    pub logger: LoggerConfig,
}

/// Per-facade logger configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level (DEBUG, INFO, WARNING, ERROR, CRITICAL, FATAL, NOTSET).
    pub log_level: String,

    /// Line template with `%(field)s` placeholders.
    pub format: String,

    /// strftime template for `%(asctime)s`.
    pub date_format: String,

    /// Root for `logs/`; falls back to `$HOME_PATH`, then `.`.
    pub home_path: Option<PathBuf>,

    /// Settings for queued (multi-producer) file sinks.
    pub queue: QueueConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "DEBUG".to_string(),
            format: DEFAULT_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            home_path: None,
            queue: QueueConfig::default(),
        }
    }
}

impl LoggerConfig {
    /// Directory under which `logs/<YYYY>/<Month>/<D>/` is laid out.
    pub fn resolved_home(&self) -> PathBuf {
        if let Some(home) = &self.home_path {
            return home.clone();
        }
        std::env::var_os(HOME_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// What a producer does when the queue in front of the drain worker is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Wait up to `block_timeout_ms`, then drop the record.
    Block,
    /// Drop the record being emitted.
    DropNewest,
    /// Evict the oldest queued record to make room.
    DropOldest,
}

/// Queue and drain-worker settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of records waiting for the drain worker.
    pub capacity: usize,

    /// Backpressure policy when the queue is full.
    pub overflow: OverflowPolicy,

    /// Producer wait limit for `OverflowPolicy::Block`, in milliseconds.
    pub block_timeout_ms: u64,

    /// Consecutive failed writes tolerated before the worker gives up.
    pub max_restarts: u32,

    /// Base delay for exponential backoff between restarts, in milliseconds.
    pub backoff_base_ms: u64,

    /// Maximum delay between restarts, in milliseconds.
    pub backoff_max_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 8192,
            overflow: OverflowPolicy::Block,
            block_timeout_ms: 250,
            max_restarts: 5,
            backoff_base_ms: 50,
            backoff_max_ms: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_block_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [logger]
            log_level = "INFO"

            [logger.queue]
            overflow = "drop_oldest"
            "#,
        )
        .unwrap();

        assert_eq!(settings.logger.log_level, "INFO");
        assert_eq!(settings.logger.format, DEFAULT_FORMAT);
        assert_eq!(settings.logger.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(settings.logger.queue.overflow, OverflowPolicy::DropOldest);
        assert_eq!(settings.logger.queue.capacity, 8192);
    }

    #[test]
    fn test_explicit_home_wins() {
        let config = LoggerConfig {
            home_path: Some(PathBuf::from("/srv/clinic")),
            ..LoggerConfig::default()
        };
        assert_eq!(config.resolved_home(), PathBuf::from("/srv/clinic"));
    }
}
