use thiserror::Error;

pub const CITY_NOT_FOUND: &str = "City not found. Please check the spelling.";
pub const GEOCODING_UNAVAILABLE: &str = "Could not look up that city.";
pub const WEATHER_UNAVAILABLE: &str = "Could not fetch weather data.";
pub const POSITION_UNAVAILABLE: &str = "Could not get your location.";
pub const GEOLOCATION_DENIED: &str = "Location access denied. Please enter a city name.";
pub const GEOLOCATION_UNSUPPORTED: &str = "Geolocation is not supported on this system.";

/// Everything that can end a rain check early.
///
/// Each variant carries the message shown to the user verbatim. None of them
/// are recovered from: the current check stops and the caller goes back to
/// waiting for input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("{0}")]
    LocationNotFound(String),

    #[error("{0}")]
    NetworkFailure(String),

    #[error("{0}")]
    GeolocationDenied(String),

    #[error("{0}")]
    GeolocationUnsupported(String),
}

impl RequestError {
    pub fn location_not_found() -> Self {
        Self::LocationNotFound(CITY_NOT_FOUND.to_string())
    }

    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::NetworkFailure(message.into())
    }

    pub fn geolocation_denied() -> Self {
        Self::GeolocationDenied(GEOLOCATION_DENIED.to_string())
    }

    pub fn geolocation_unsupported() -> Self {
        Self::GeolocationUnsupported(GEOLOCATION_UNSUPPORTED.to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::LocationNotFound(m)
            | Self::NetworkFailure(m)
            | Self::GeolocationDenied(m)
            | Self::GeolocationUnsupported(m) => m,
        }
    }

    /// What the user can do about it.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::LocationNotFound(_) => "Try a different spelling or a nearby city.",
            Self::NetworkFailure(_) => "Check your connection and try again.",
            Self::GeolocationDenied(_) | Self::GeolocationUnsupported(_) => {
                "Enter a city name instead."
            }
        }
    }
}
