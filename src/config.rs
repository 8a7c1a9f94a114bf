//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::catalog::DEFAULT_CATALOG_PATH;
use crate::error::{ReaderError, Result};
use crate::scanner::{Baseline, DEFAULT_BASELINE_FIELDS};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub reader: ReaderConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log, catalog and snapshot configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ReaderConfig {
    pub log_path: String,

    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    #[serde(default = "default_trim")]
    pub trim: bool,

    #[serde(default = "default_baseline_fields")]
    pub baseline_fields: Vec<String>,
}

/// Poll loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    /// Milliseconds between queries; 0 runs a single query
    #[serde(default)]
    pub interval_ms: u64,
}

/// Diagnostic logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for a daily rolling log file; empty logs to stderr only
    #[serde(default)]
    pub log_dir: String,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_ms: 0 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

// Default value functions
fn default_catalog_path() -> String { DEFAULT_CATALOG_PATH.to_string() }
fn default_trim() -> bool { true }
fn default_baseline_fields() -> Vec<String> {
    DEFAULT_BASELINE_FIELDS.iter().map(|f| f.to_string()).collect()
}
fn default_log_level() -> String { "info".to_string() }

const MIN_POLL_INTERVAL_MS: u64 = 100;
const MAX_POLL_INTERVAL_MS: u64 = 86_400_000;
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rtl433_reader::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Baseline built from the configured field names
    pub fn baseline(&self) -> Baseline {
        Baseline::new(self.reader.baseline_fields.iter().cloned())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.reader.log_path.is_empty() {
            return Err(invalid("log_path cannot be empty"));
        }

        if self.reader.catalog_path.is_empty() {
            return Err(invalid("catalog_path cannot be empty"));
        }

        let mut seen = HashSet::new();
        for field in &self.reader.baseline_fields {
            if field.is_empty() {
                return Err(invalid("baseline_fields cannot contain an empty name"));
            }
            if !seen.insert(field.as_str()) {
                return Err(invalid(format!("baseline field '{}' is listed twice", field)));
            }
        }

        let interval = self.poll.interval_ms;
        if interval != 0 && !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&interval) {
            return Err(invalid(format!(
                "interval_ms must be 0 or between {} and {}",
                MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS
            )));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid("level must be one of: trace, debug, info, warn, error"));
        }

        Ok(())
    }
}

fn invalid(msg: impl std::fmt::Display) -> ReaderError {
    ReaderError::Config(toml::de::Error::custom(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config {
            reader: ReaderConfig {
                log_path: "rtl_433.json".to_string(),
                catalog_path: default_catalog_path(),
                trim: default_trim(),
                baseline_fields: default_baseline_fields(),
            },
            poll: PollConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_default_config() {
        assert!(create_valid_config().validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[reader]
log_path = "/var/lib/rtl_433/out.json"
trim = false

[poll]
interval_ms = 60000
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.reader.log_path, "/var/lib/rtl_433/out.json");
        assert_eq!(config.reader.catalog_path, "DeviceList.json");
        assert!(!config.reader.trim);
        assert_eq!(config.poll.interval_ms, 60000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.baseline(), Baseline::default());
    }

    #[test]
    fn test_missing_reader_section() {
        let result: std::result::Result<Config, _> = toml::from_str("[poll]\ninterval_ms = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ReaderError::Io(_))));
    }

    #[test]
    fn test_empty_log_path() {
        let mut config = create_valid_config();
        config.reader.log_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_catalog_path() {
        let mut config = create_valid_config();
        config.reader.catalog_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_baseline_field() {
        let mut config = create_valid_config();
        config.reader.baseline_fields.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_baseline_field() {
        let mut config = create_valid_config();
        config.reader.baseline_fields.push("temp".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_baseline_allowed() {
        let mut config = create_valid_config();
        config.reader.baseline_fields.clear();
        assert!(config.validate().is_ok());
        assert!(config.baseline().snapshot().is_empty());
    }

    #[test]
    fn test_poll_interval_too_low() {
        let mut config = create_valid_config();
        config.poll.interval_ms = 99;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_too_high() {
        let mut config = create_valid_config();
        config.poll.interval_ms = 86_400_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_bounds() {
        for &interval in &[0, 100, 86_400_000] {
            let mut config = create_valid_config();
            config.poll.interval_ms = interval;
            assert!(config.validate().is_ok(), "interval {} should be valid", interval);
        }
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = create_valid_config();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_catalog_path(), "DeviceList.json");
        assert!(default_trim());
        assert_eq!(default_baseline_fields(), vec!["temp", "humid", "wind"]);
        assert_eq!(default_log_level(), "info");
    }
}
