use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    autocomplete::DEFAULT_DEBOUNCE,
    provider::{
        DEFAULT_SUGGESTION_LIMIT, GeocodingClientConfig, WeatherClientConfig,
        nominatim::{DEFAULT_GEOCODING_BASE_URL, DEFAULT_USER_AGENT},
        wttr::DEFAULT_WEATHER_BASE_URL,
    },
};

/// Settings for the text weather service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSection {
    pub base_url: String,
    /// Request timeout in seconds; absent means the transport default.
    pub timeout_secs: Option<u64>,
}

impl Default for WeatherSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

/// Settings for the geocoding service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingSection {
    pub base_url: String,
    /// Sent with every request; the service refuses anonymous clients.
    pub user_agent: String,
    pub limit: usize,
    pub timeout_secs: Option<u64>,
}

impl Default for GeocodingSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODING_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            limit: DEFAULT_SUGGESTION_LIMIT,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteSection {
    pub debounce_ms: u64,
}

impl Default for AutocompleteSection {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [weather]
/// base_url = "https://wttr.in"
///
/// [geocoding]
/// user_agent = "MyWeather/2.0 (me@example.com)"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherSection,
    pub geocoding: GeocodingSection,
    pub autocomplete: AutocompleteSection,
    /// Overrides the favorites file location.
    pub favorites_path: Option<PathBuf>,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Where favorites are persisted: the configured override, else the
    /// platform data directory.
    pub fn favorites_file_path(&self) -> Result<PathBuf> {
        match &self.favorites_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("favorites.json")),
        }
    }

    pub fn weather_client(&self) -> WeatherClientConfig {
        WeatherClientConfig {
            base_url: self.weather.base_url.clone(),
            timeout: self.weather.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn geocoding_client(&self) -> GeocodingClientConfig {
        GeocodingClientConfig {
            base_url: self.geocoding.base_url.clone(),
            user_agent: self.geocoding.user_agent.clone(),
            timeout: self.geocoding.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.autocomplete.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.weather.base_url, "https://wttr.in");
        assert_eq!(cfg.geocoding.limit, 5);
        assert_eq!(cfg.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn partial_sections_fill_from_defaults() {
        let cfg = Config::from_toml(
            r#"
            [geocoding]
            user_agent = "Test/1.0"

            [weather]
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.geocoding.user_agent, "Test/1.0");
        assert_eq!(cfg.geocoding.base_url, DEFAULT_GEOCODING_BASE_URL);
        assert_eq!(cfg.weather_client().timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.geocoding_client().timeout, None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cfg = Config::from_toml("legacy_units = \"metric\"\n").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn favorites_path_override_wins() {
        let cfg = Config {
            favorites_path: Some(PathBuf::from("/tmp/favs.json")),
            ..Default::default()
        };
        assert_eq!(cfg.favorites_file_path().unwrap(), PathBuf::from("/tmp/favs.json"));
    }

    #[test]
    fn toml_round_trip() {
        let mut cfg = Config::default();
        cfg.autocomplete.debounce_ms = 150;
        cfg.geocoding.timeout_secs = Some(3);

        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let mut cfg = Config::default();
        cfg.geocoding.user_agent = "Test/2.0".into();
        cfg.favorites_path = Some(dir.path().join("favs.json"));
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[weather\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(Config::from_toml("[weather\nbase_url = 1").is_err());
    }
}
