//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/habitect/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/habitect/` (~/.config/habitect/)
//! - Data: `$XDG_DATA_HOME/habitect/` (~/.local/share/habitect/)
//! - State/Logs: `$XDG_STATE_HOME/habitect/` (~/.local/state/habitect/)

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::weekly::WeeklyConfig;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Engine defaults (timezone, history window)
    #[serde(default)]
    pub engine: EngineConfig,

    /// Weekly report sections
    #[serde(default)]
    pub weekly: WeeklyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Engine defaults
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// IANA timezone used when a user record carries none.
    /// An unknown identifier degrades to UTC at computation time.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,

    /// Days of calendar history a streak view shows by default
    #[serde(default = "default_history_days")]
    pub history_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
            history_days: default_history_days(),
        }
    }
}

impl EngineConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.history_days == 0 || self.history_days > 365 {
            return Err(Error::Config(
                "engine.history_days must be between 1 and 365".to_string(),
            ));
        }
        if self.default_timezone.is_empty() {
            return Err(Error::Config(
                "engine.default_timezone must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_history_days() -> u32 {
    28
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.engine.validate()?;
        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/habitect/config.toml` (~/.config/habitect/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("habitect").join("config.toml")
    }

    /// Returns the data directory path (for export bundles)
    ///
    /// `$XDG_DATA_HOME/habitect/` (~/.local/share/habitect/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("habitect")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/habitect/` (~/.local/state/habitect/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("habitect")
    }

    /// Returns the default export bundle path
    ///
    /// `$XDG_DATA_HOME/habitect/export.json`
    pub fn default_bundle_path() -> PathBuf {
        Self::data_dir().join("export.json")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/habitect/habitect.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("habitect.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
