//! # File Backend Configuration
//!
//! Declarative configuration for a [`FileBackend`](crate::FileBackend).
//! A config is built once, handed to the backend at construction time and
//! immutable afterwards; reconfiguration goes through
//! [`Backend::apply_config`](crate::Backend::apply_config), which parses a
//! fresh config and restarts the writer under it.
//!
//! Configuration is deliberately instance-scoped. There is no process-wide
//! mutable default; the shipped defaults are plain associated consts, so two
//! backends in one process can run with different settings and tests stay
//! reentrant.
//!
//! ## Recognized options
//!
//! The `from_hashmap` constructor accepts a `HashMap<String, String>` (e.g.
//! parsed from CLI, environment variables, or a config file) with the keys:
//!
//! - `"filename"`: target path for the log file (required)
//! - `"append"`: `"true"` or `"false"`
//! - `"max_size"`: rotation threshold in bytes
//! - `"flush_interval"`: periodic flush interval in milliseconds
//! - `"queue_limit"`: buffered-byte threshold that forces an early flush
//! - `"grow_size"`: buffer growth increment in bytes

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Error;

/// Configuration of a single file backend instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBackendConfig {
    /// Target path for the log file.
    pub filename: PathBuf,

    /// `true`: open the file in append mode, keeping existing content.
    /// `false`: truncate the file on open.
    ///
    /// Either way the file is truncated in place once a write would push it
    /// past `max_size`.
    pub append: bool,

    /// Byte threshold for rotation. When the next batch would push the file
    /// past this size, the file is truncated to empty before the batch is
    /// written.
    pub max_size: u64,

    /// Periodic flush interval in milliseconds. The writer drains the buffer
    /// at least this often even under low traffic.
    pub flush_interval: u64,

    /// Buffered-byte threshold that wakes the writer ahead of the timer,
    /// bounding memory growth under flood conditions.
    pub queue_limit: usize,

    /// Buffer growth increment. The shared buffer grows in fixed steps of
    /// this many bytes instead of doubling, to bound reallocation pauses.
    pub grow_size: usize,
}

impl FileBackendConfig {
    /// Default rotation threshold: 8 MiB.
    pub const MAX_SIZE_DEFAULT: u64 = 8 * 1024 * 1024;

    /// Default periodic flush interval: 3 seconds.
    pub const FLUSH_PERIOD: u64 = 3000;

    /// Default force-flush threshold: 8 MiB of buffered data.
    pub const QUEUE_SIZE_LIMIT: usize = 8 * 1024 * 1024;

    /// Default buffer growth increment: 64 KiB.
    pub const QUEUE_GROW_SIZE: usize = 64 * 1024;

    /// Creates a config for `filename` with all other options at their
    /// defaults: append mode on, 8 MiB rotation threshold, 3 s flush period.
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        FileBackendConfig {
            filename: filename.into(),
            append: true,
            max_size: Self::MAX_SIZE_DEFAULT,
            flush_interval: Self::FLUSH_PERIOD,
            queue_limit: Self::QUEUE_SIZE_LIMIT,
            grow_size: Self::QUEUE_GROW_SIZE,
        }
    }

    /// Parses a config from a string map.
    ///
    /// Unknown keys are ignored. A missing `"filename"` or an unparsable
    /// value is reported as [`Error::InvalidConfig`].
    pub fn from_hashmap(options: &HashMap<String, String>) -> Result<Self, Error> {
        let filename = options
            .get("filename")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::InvalidConfig {
                key: "filename".to_string(),
                value: String::new(),
            })?;

        let mut config = FileBackendConfig::new(filename);

        if let Some(value) = options.get("append") {
            config.append = parse_option("append", value)?;
        }
        if let Some(value) = options.get("max_size") {
            config.max_size = parse_option("max_size", value)?;
        }
        if let Some(value) = options.get("flush_interval") {
            config.flush_interval = parse_option("flush_interval", value)?;
        }
        if let Some(value) = options.get("queue_limit") {
            config.queue_limit = parse_option("queue_limit", value)?;
        }
        if let Some(value) = options.get("grow_size") {
            config.grow_size = parse_option("grow_size", value)?;
        }

        Ok(config)
    }
}

fn parse_option<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, Error> {
    value.parse().map_err(|_| Error::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FileBackendConfig::new("tmp/app.log");
        assert_eq!(config.filename, PathBuf::from("tmp/app.log"));
        assert!(config.append);
        assert_eq!(config.max_size, FileBackendConfig::MAX_SIZE_DEFAULT);
        assert_eq!(config.flush_interval, FileBackendConfig::FLUSH_PERIOD);
        assert_eq!(config.queue_limit, FileBackendConfig::QUEUE_SIZE_LIMIT);
        assert_eq!(config.grow_size, FileBackendConfig::QUEUE_GROW_SIZE);
    }

    #[test]
    fn test_from_hashmap_overrides() {
        let mut options = HashMap::new();
        options.insert("filename".to_string(), "tmp/custom.log".to_string());
        options.insert("append".to_string(), "false".to_string());
        options.insert("max_size".to_string(), "100".to_string());
        options.insert("flush_interval".to_string(), "500".to_string());
        options.insert("queue_limit".to_string(), "64".to_string());
        options.insert("grow_size".to_string(), "16".to_string());

        let config = FileBackendConfig::from_hashmap(&options).unwrap();
        assert_eq!(config.filename, PathBuf::from("tmp/custom.log"));
        assert!(!config.append);
        assert_eq!(config.max_size, 100);
        assert_eq!(config.flush_interval, 500);
        assert_eq!(config.queue_limit, 64);
        assert_eq!(config.grow_size, 16);
    }

    #[test]
    fn test_from_hashmap_partial_overrides_keep_defaults() {
        let mut options = HashMap::new();
        options.insert("filename".to_string(), "tmp/app.log".to_string());
        options.insert("max_size".to_string(), "4096".to_string());

        let config = FileBackendConfig::from_hashmap(&options).unwrap();
        assert_eq!(config.max_size, 4096);
        assert!(config.append);
        assert_eq!(config.flush_interval, FileBackendConfig::FLUSH_PERIOD);
    }

    #[test]
    fn test_missing_filename_is_rejected() {
        let options = HashMap::new();
        let err = FileBackendConfig::from_hashmap(&options).unwrap_err();
        match err {
            Error::InvalidConfig { key, value } => {
                assert_eq!(key, "filename");
                assert!(value.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_filename_is_rejected() {
        let mut options = HashMap::new();
        options.insert("filename".to_string(), String::new());
        assert!(FileBackendConfig::from_hashmap(&options).is_err());
    }

    #[test]
    fn test_unparsable_value_is_rejected() {
        let mut options = HashMap::new();
        options.insert("filename".to_string(), "tmp/app.log".to_string());
        options.insert("max_size".to_string(), "lots".to_string());

        let err = FileBackendConfig::from_hashmap(&options).unwrap_err();
        match err {
            Error::InvalidConfig { key, value } => {
                assert_eq!(key, "max_size");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut options = HashMap::new();
        options.insert("filename".to_string(), "tmp/app.log".to_string());
        options.insert("colour".to_string(), "teal".to_string());
        assert!(FileBackendConfig::from_hashmap(&options).is_ok());
    }
}
