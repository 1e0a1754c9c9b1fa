//! TOML configuration for the crash-stats toolchain.
//!
//! Every field has a default, so an absent file or an empty table yields
//! the standard behavior. The file location comes from the `--config` flag
//! or the `CRASH_STATS_CONFIG` environment variable.

use std::path::{Path, PathBuf};

use crash_stats_analytics::NormalizerConfig;
use crash_stats_analytics::views::{DEFAULT_MIN_CITY_COUNT, DEFAULT_RANKING_LIMIT};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming a config file to use when no path is given.
pub const CONFIG_ENV_VAR: &str = "CRASH_STATS_CONFIG";

/// Errors that can occur while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`Config`].
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Record normalization settings.
    pub normalizer: NormalizerConfig,
    /// View-layer policies.
    pub views: ViewConfig,
}

/// Thresholds and list sizes used when building views.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Minimum crashes for a city to appear in rankings.
    pub min_city_count: u64,
    /// Length of each safest/riskiest city list.
    pub ranking_limit: usize,
    /// Entries shown in top-N lists (weather, light, road type).
    pub top_n: usize,
    /// Weather conditions shown in weather grids.
    pub weather_columns: usize,
    /// Labels hidden from demographic and weather lists.
    pub placeholder_labels: Vec<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_city_count: DEFAULT_MIN_CITY_COUNT,
            ranking_limit: DEFAULT_RANKING_LIMIT,
            top_n: 8,
            weather_columns: 6,
            placeholder_labels: vec!["Unknown".to_string(), "Not Reported".to_string()],
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is not valid configuration.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Loads configuration from `path`, falling back to the file named by
    /// [`CONFIG_ENV_VAR`], then to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let Some(path) = path else {
            log::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        log::info!("Reading config from {}", path.display());
        Self::from_path(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.views.min_city_count, 5);
        assert_eq!(config.views.ranking_limit, 50);
        assert_eq!(config.normalizer.place_sentinels, ["NOT APPLICABLE"]);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [normalizer]
            place_sentinels = ["NOT APPLICABLE", "Unknown"]

            [views]
            min_city_count = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.normalizer.place_sentinels, ["NOT APPLICABLE", "Unknown"]);
        assert_eq!(config.views.min_city_count, 10);
        assert_eq!(config.views.ranking_limit, 50);
        assert_eq!(config.views.top_n, 8);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            Config::from_toml("[views]\nmin_cities = 3\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = Config::from_path(Path::new("/nonexistent/crash-stats.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/crash-stats.toml"));
    }
}
