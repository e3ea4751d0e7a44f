use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::Coordinates;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1";

/// Base URLs of the two Open-Meteo services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding_url: String,
    pub forecast_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
        }
    }
}

/// Where this machine is, as far as `willitrain here` is concerned.
///
/// Example TOML:
/// [geolocation]
/// enabled = true
/// latitude = 52.52
/// longitude = 13.41
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// `false` behaves like a denied location permission.
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl GeolocationConfig {
    pub fn position(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Absent means geolocation is not available on this host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<GeolocationConfig>,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
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

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "will-it-rain", "willitrain")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("geocoding_url", &self.endpoints.geocoding_url),
            ("forecast_url", &self.endpoints.forecast_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!("endpoints.{name} must be an http(s) URL, got '{url}'"));
            }
        }

        if let Some(position) = self.geolocation.as_ref().and_then(GeolocationConfig::position) {
            validate_coordinates(position)?;
        }

        Ok(())
    }

    /// Enable geolocation at a fixed position.
    pub fn set_position(&mut self, position: Coordinates) -> Result<()> {
        validate_coordinates(position)?;
        self.geolocation = Some(GeolocationConfig {
            enabled: true,
            latitude: Some(position.latitude),
            longitude: Some(position.longitude),
        });
        Ok(())
    }

    /// Keep the geolocation table but refuse to hand out the position.
    pub fn deny_geolocation(&mut self) {
        match self.geolocation.as_mut() {
            Some(geo) => geo.enabled = false,
            None => {
                self.geolocation =
                    Some(GeolocationConfig { enabled: false, latitude: None, longitude: None })
            }
        }
    }

    pub fn clear_geolocation(&mut self) {
        self.geolocation = None;
    }
}

pub fn validate_coordinates(position: Coordinates) -> Result<()> {
    if !(-90.0..=90.0).contains(&position.latitude) {
        return Err(anyhow!("latitude {} is out of range (-90..=90)", position.latitude));
    }
    if !(-180.0..=180.0).contains(&position.longitude) {
        return Err(anyhow!("longitude {} is out of range (-180..=180)", position.longitude));
    }
    Ok(())
}
