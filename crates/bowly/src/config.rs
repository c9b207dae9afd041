//! Configuration management for bowly.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stats::{DEFAULT_RECENT_GAMES, DEFAULT_TREND_WINDOW};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "bowly";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "games.db";

/// Target average used until the bowler sets one.
pub const DEFAULT_TARGET: f64 = 170.0;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables prefixed with `BOWLY_`, nested keys separated by
///    a double underscore (`BOWLY_STATS__RECENT_GAMES=10`)
/// 2. TOML config file at `~/.config/bowly/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Statistics configuration.
    pub stats: StatsConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/bowly/games.db`
    pub database_path: Option<PathBuf>,
}

/// Statistics and coaching configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Target average for a fresh database.
    pub default_target: f64,
    /// Number of games shown as "recent".
    pub recent_games: usize,
    /// Games compared against the overall average for a suggestion.
    pub trend_window: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            default_target: DEFAULT_TARGET,
            recent_games: DEFAULT_RECENT_GAMES,
            trend_window: DEFAULT_TREND_WINDOW,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("BOWLY_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=300.0).contains(&self.stats.default_target) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "default_target ({}) must be between 0 and 300",
                    self.stats.default_target
                ),
            });
        }

        if self.stats.recent_games == 0 {
            return Err(Error::ConfigValidation {
                message: "recent_games must be greater than 0".to_string(),
            });
        }

        if self.stats.trend_window == 0 {
            return Err(Error::ConfigValidation {
                message: "trend_window must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats_config() {
        let stats = StatsConfig::default();

        assert!((stats.default_target - 170.0).abs() < f64::EPSILON);
        assert_eq!(stats.recent_games, 5);
        assert_eq!(stats.trend_window, 3);
    }

    #[test]
    fn test_default_storage_config() {
        assert!(StorageConfig::default().database_path.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_target_out_of_range() {
        let mut config = Config::default();
        config.stats.default_target = 301.0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_target"));

        config.stats.default_target = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_recent_games() {
        let mut config = Config::default();
        config.stats.recent_games = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("recent_games"));
    }

    #[test]
    fn test_validate_zero_trend_window() {
        let mut config = Config::default();
        config.stats.trend_window = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("trend_window"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("games.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("bowly"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[stats]\ndefault_target = 185.5\nrecent_games = 10\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert!((config.stats.default_target - 185.5).abs() < f64::EPSILON);
        assert_eq!(config.stats.recent_games, 10);
        assert_eq!(config.stats.trend_window, 3);
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[stats]\nrecent_games = 0\n").unwrap();

        assert!(matches!(
            Config::load_from(Some(path)),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_stats_config_deserialize() {
        let json = r#"{"recent_games": 8}"#;
        let stats: StatsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(stats.recent_games, 8);
        assert_eq!(stats.trend_window, 3);
    }
}
