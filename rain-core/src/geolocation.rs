//! Host position lookup for the "use my location" path.
//!
//! A [`Geolocator`] answers once with either coordinates or a
//! [`PositionError`]. Hosts that cannot locate themselves at all simply have
//! no geolocator; the pipeline reports that as unsupported without asking
//! anything.

use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;
use tracing::debug;

use crate::{
    config::GeolocationConfig,
    error::{POSITION_UNAVAILABLE, RequestError},
    model::Coordinates,
};

/// Failure codes, numbered like the W3C `GeolocationPositionError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionErrorCode {
    PermissionDenied = 1,
    PositionUnavailable = 2,
    Timeout = 3,
}

impl PositionErrorCode {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::PermissionDenied),
            2 => Some(Self::PositionUnavailable),
            3 => Some(Self::Timeout),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {})", .code.code())]
pub struct PositionError {
    pub code: PositionErrorCode,
    pub message: String,
}

impl PositionError {
    pub fn new<S: Into<String>>(code: PositionErrorCode, message: S) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<PositionError> for RequestError {
    fn from(err: PositionError) -> Self {
        match err.code {
            PositionErrorCode::PermissionDenied => RequestError::geolocation_denied(),
            PositionErrorCode::PositionUnavailable | PositionErrorCode::Timeout => {
                RequestError::network(POSITION_UNAVAILABLE)
            }
        }
    }
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}

/// Ask `geolocator` for the current position, mapping failures onto [`RequestError`].
pub async fn locate(geolocator: &dyn Geolocator) -> Result<Coordinates, RequestError> {
    match geolocator.current_position().await {
        Ok(position) => {
            debug!("Current position: ({}, {})", position.latitude, position.longitude);
            Ok(position)
        }
        Err(err) => {
            debug!(error = %err, "Geolocation failed");
            Err(err.into())
        }
    }
}

/// Position taken from the `[geolocation]` config table.
#[derive(Debug, Clone)]
pub struct ConfiguredGeolocator {
    settings: GeolocationConfig,
}

impl ConfiguredGeolocator {
    pub fn new(settings: GeolocationConfig) -> Self {
        Self { settings }
    }

    /// `None` when the config has no geolocation table.
    pub fn from_config(config: &crate::Config) -> Option<Self> {
        config.geolocation.clone().map(Self::new)
    }
}

#[async_trait]
impl Geolocator for ConfiguredGeolocator {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        if !self.settings.enabled {
            return Err(PositionError::new(
                PositionErrorCode::PermissionDenied,
                "Geolocation is disabled in the configuration",
            ));
        }

        self.settings.position().ok_or_else(|| {
            PositionError::new(
                PositionErrorCode::PositionUnavailable,
                "No latitude/longitude configured",
            )
        })
    }
}
