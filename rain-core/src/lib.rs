//! Core library for the `willitrain` CLI.
//!
//! This crate defines:
//! - Configuration of the Open-Meteo endpoints and the host position
//! - The geocoding and current-weather client
//! - The rain classifier over WMO weather codes
//! - The resolve → fetch → classify pipeline and its four-state view model
//!
//! It is used by `rain-cli`, but can also be reused by other front ends.

pub mod classify;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod view;

#[cfg(test)]
mod test_support;

pub use classify::{Precipitation, RAIN_CODES, is_rain_code};
pub use config::{Config, Endpoints, GeolocationConfig};
pub use error::RequestError;
pub use geolocation::{ConfiguredGeolocator, Geolocator, PositionError, PositionErrorCode};
pub use model::{Coordinates, Location, Verdict, WeatherObservation};
pub use pipeline::{NoopObserver, PipelineObserver, RainPipeline};
pub use provider::{LocationResolver, OpenMeteoClient, WeatherSource};
pub use view::{Session, ViewEvent, ViewRenderer, ViewState};

/// Wire the Open-Meteo client and the configured geolocator into a pipeline.
pub fn pipeline_from_config(config: &Config) -> anyhow::Result<RainPipeline> {
    let client = provider::open_meteo_from_config(config)?;
    let geolocator = ConfiguredGeolocator::from_config(config)
        .map(|geo| Box::new(geo) as Box<dyn Geolocator>);

    Ok(RainPipeline::new(Box::new(client.clone()), Box::new(client), geolocator))
}
