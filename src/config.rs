//! Configuration file support for beelabel.
//!
//! Settings live in a JSON file so they can be shared between machines and
//! edited by hand. Missing fields fall back to their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SESSION_ID;
use crate::keybindings::{KeyBindings, key_to_string};
use crate::state::FilePersister;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get all log levels in order from least to most verbose.
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Raise the level by a number of `-v` flags, saturating at Trace.
    pub fn raised_by(self, steps: u8) -> Self {
        let all = Self::all();
        let current = all.iter().position(|l| *l == self).unwrap_or(0);
        all[(current + usize::from(steps)).min(all.len() - 1)]
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Keybinding configuration
    #[serde(default)]
    pub keybindings: KeyBindings,
}

fn default_app_name() -> String {
    "beelabel".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Where session state is kept; the platform data directory if unset
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Session to use when none is given on the command line
    #[serde(default = "default_session_id")]
    pub session_id: String,

    /// Default export folder path; the working directory if unset
    #[serde(default)]
    pub export_folder: Option<PathBuf>,
}

fn default_session_id() -> String {
    DEFAULT_SESSION_ID.to_string()
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            state_dir: None,
            session_id: default_session_id(),
            export_folder: None,
        }
    }
}

impl UserPreferences {
    /// The state directory to use, falling back to the platform default.
    pub fn resolved_state_dir(&self) -> Option<PathBuf> {
        self.state_dir
            .clone()
            .or_else(FilePersister::default_state_dir)
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            keybindings: KeyBindings::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        for key in config.keybindings.conflicts() {
            log::warn!(
                "Key '{}' is bound more than once; the first binding wins",
                key_to_string(key)
            );
        }

        Ok(config)
    }

    /// Get the default filename of the config file.
    pub fn default_filename() -> &'static str {
        "beelabel-config.json"
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("beelabel").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("beelabel")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::KeyCode;

    #[test]
    fn test_defaults_roundtrip() {
        let config = AppConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(AppConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = AppConfig::from_json(
            r#"{
                "version": 1,
                "preferences": { "log_level": "debug", "state_dir": "/var/lib/bees" },
                "keybindings": { "discard": "X" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.app_name, "beelabel");
        assert_eq!(config.preferences.log_level, LogLevel::Debug);
        assert_eq!(config.preferences.session_id, "default");
        assert_eq!(
            config.preferences.resolved_state_dir(),
            Some(PathBuf::from("/var/lib/bees"))
        );
        assert_eq!(config.keybindings.discard, KeyCode::X);
        assert_eq!(config.keybindings.label_garbage, KeyCode::Key1);
    }

    #[test]
    fn test_version_too_new() {
        let result = AppConfig::from_json(r#"{ "version": 99 }"#);
        assert!(matches!(
            result,
            Err(ConfigError::VersionTooNew {
                file_version: 99,
                supported_version: CONFIG_VERSION
            })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            AppConfig::from_json("{ not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(AppConfig::default_filename());

        let mut config = AppConfig::default();
        config.preferences.session_id = "hive-3".to_string();
        config.save_to_path(&path).unwrap();

        assert_eq!(AppConfig::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_log_level_raised() {
        assert_eq!(LogLevel::Warn.raised_by(0), LogLevel::Warn);
        assert_eq!(LogLevel::Warn.raised_by(1), LogLevel::Info);
        assert_eq!(LogLevel::Warn.raised_by(9), LogLevel::Trace);
        assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    }
}
