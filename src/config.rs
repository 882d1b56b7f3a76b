//! ==============================================================================
//! config.rs - Runtime Configuration Loader
//! ==============================================================================
//!
//! purpose:
//!     defines the schema for `monitor.toml`.
//!     loads configuration from file or falls back to defaults.
//!
//! structure:
//!     - PollingConfig: How often the simulation ticks.
//!     - HistoryConfig: How many readings the rolling history keeps.
//!     - SimulationConfig: Optional RNG seed for reproducible runs.
//!     - LoggingConfig: Log level and whether each tick is printed.
//!
//! every section and field has a default, so a partial file is fine.
//!
//! ==============================================================================

use crate::history::MAX_CAPACITY;
use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub polling: PollingConfig,
    pub history: HistoryConfig,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_seconds: 2 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: crate::history::DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// fixed seed for a reproducible walk; entropy when absent
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub show_sensor_data: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_sensor_data: true,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read config file {}", path.as_ref().display()))?;
        Self::parse(&content)
    }

    /// Parse and validate TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: MonitorConfig = toml::from_str(content).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.polling.interval_seconds == 0 {
            bail!("polling.interval_seconds must be greater than zero");
        }
        if self.history.capacity == 0 || self.history.capacity > MAX_CAPACITY {
            bail!(
                "history.capacity must be between 1 and {}, got {}",
                MAX_CAPACITY,
                self.history.capacity
            );
        }
        Ok(())
    }

    /// Load with default fallback
    ///
    /// runs before logging is set up, so it reports on stdout like the
    /// startup banner does.
    pub fn load_or_default() -> Self {
        for path in Self::search_paths() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => {
                        println!("[CONFIG] Loaded from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        println!("[CONFIG] Warning: Failed to load {}: {:#}", path.display(), e);
                    }
                }
            }
        }

        println!("[CONFIG] No config file found - using defaults");
        Self::default()
    }

    fn search_paths() -> [PathBuf; 2] {
        [
            PathBuf::from("config").join("monitor.toml"),
            PathBuf::from("..").join("config").join("monitor.toml"),
        ]
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_seconds)
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        let seed = self
            .simulation
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random".to_string());
        println!("┌─────────────────────────────────────────┐");
        println!("│          MONITOR CONFIGURATION          │");
        println!("├─────────────────────────────────────────┤");
        println!("│ Tick Interval: {}s", self.polling.interval_seconds);
        println!("│ History Capacity: {}", self.history.capacity);
        println!("│ Seed: {}", seed);
        println!("│ Log Level: {}", self.logging.level);
        println!("└─────────────────────────────────────────┘");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dashboard() {
        let config = MonitorConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(2));
        assert_eq!(config.history.capacity, 30);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(MonitorConfig::parse("").unwrap(), MonitorConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let config = MonitorConfig::parse(
            r#"
            [simulation]
            seed = 42

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.show_sensor_data);
        assert_eq!(config.polling.interval_seconds, 2);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = MonitorConfig::parse("[polling]\ninterval_seconds = 0\n").unwrap_err();
        assert!(err.to_string().contains("interval_seconds"));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(MonitorConfig::parse("[history]\ncapacity = 0\n").is_err());
    }

    #[test]
    fn capacity_above_the_window_is_rejected() {
        assert!(MonitorConfig::parse("[history]\ncapacity = 30\n").is_ok());
        let err = MonitorConfig::parse("[history]\ncapacity = 31\n").unwrap_err();
        assert!(err.to_string().contains("history.capacity"));
        assert!(MonitorConfig::parse("[history]\ncapacity = 1000000000000\n").is_err());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(MonitorConfig::parse("[polling\n").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(MonitorConfig::load("does/not/exist/monitor.toml").is_err());
    }
}
