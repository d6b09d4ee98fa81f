use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::render::DayLabels;

pub const DEFAULT_COUNTRIES_URL: &str =
    "https://restcountries.com/v3.1/all?fields=name,flags,latlng,currencies";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Static asset paths for the temperature icons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconPaths {
    pub hot: String,
    pub mild: String,
    pub cold: String,
}

impl Default for IconPaths {
    fn default() -> Self {
        Self {
            hot: "icons/hot.png".to_string(),
            mild: "icons/mild.png".to_string(),
            cold: "icons/cold.png".to_string(),
        }
    }
}

/// Top-level configuration stored on disk. Every field falls back to its default.
///
/// Example TOML:
/// ```toml
/// forecast_days = 7
/// day_labels = "ordinal"
///
/// [icons]
/// hot = "assets/sun.png"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub countries_url: String,
    pub forecast_url: String,

    /// Number of forecast days to request; the API default applies when absent.
    pub forecast_days: Option<u8>,

    pub request_timeout_secs: u64,

    /// How long a submission waits for the country dataset to finish loading.
    pub dataset_wait_secs: u64,

    pub day_labels: DayLabels,
    pub icons: IconPaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            forecast_days: None,
            request_timeout_secs: 15,
            dataset_wait_secs: 10,
            day_labels: DayLabels::default(),
            icons: IconPaths::default(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn dataset_wait(&self) -> Duration {
        Duration::from_secs(self.dataset_wait_secs)
    }

    /// Set the forecast length, rejecting values outside what the forecast API serves.
    pub fn set_forecast_days(&mut self, days: Option<u8>) -> Result<()> {
        check_forecast_days(days)?;
        self.forecast_days = days;
        Ok(())
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents).context("Failed to parse configuration TOML")?;
        check_forecast_days(cfg.forecast_days)?;
        Ok(cfg)
    }

    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        log::info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "countrycast", "countrycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn check_forecast_days(days: Option<u8>) -> Result<()> {
    match days {
        Some(d) if !(1..=16).contains(&d) => {
            Err(anyhow!("forecast_days must be between 1 and 16, got {d}"))
        }
        _ => Ok(()),
    }
}
