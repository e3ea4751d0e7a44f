use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config, RequestError,
    model::{Coordinates, Location, WeatherObservation},
};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Turns a free-text city name into its best-ranked match.
#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    async fn resolve(&self, city: &str) -> Result<Location, RequestError>;
}

/// Fetches the current-weather snapshot at a coordinate.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current_weather(&self, at: Coordinates) -> Result<WeatherObservation, RequestError>;
}

/// Construct the Open-Meteo client from the configured endpoints.
pub fn open_meteo_from_config(config: &Config) -> anyhow::Result<OpenMeteoClient> {
    config.validate()?;
    Ok(OpenMeteoClient::new(
        config.endpoints.geocoding_url.clone(),
        config.endpoints.forecast_url.clone(),
    ))
}
