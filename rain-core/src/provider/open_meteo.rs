use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::{GEOCODING_UNAVAILABLE, RequestError, WEATHER_UNAVAILABLE},
    model::{Coordinates, Location, WeatherObservation},
};

use super::{LocationResolver, WeatherSource};

/// Open-Meteo geocoding + forecast client. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    geocoding_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(geocoding_url: String, forecast_url: String) -> Self {
        Self {
            geocoding_url: geocoding_url.trim_end_matches('/').to_string(),
            forecast_url: forecast_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn geocoding_url(&self) -> &str {
        &self.geocoding_url
    }

    pub fn forecast_url(&self) -> &str {
        &self.forecast_url
    }

    /// GET `url` and return the body of a successful response.
    ///
    /// Every failure maps to `NetworkFailure(message)`; the details only go to the log.
    async fn get_text(
        &self,
        url: &str,
        query: &[(&str, String)],
        message: &str,
    ) -> Result<String, RequestError> {
        debug!(%url, ?query, "sending request");

        let res = self.http.get(url).query(query).send().await.map_err(|e| {
            debug!(%url, error = %e, "request failed");
            RequestError::network(message)
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            debug!(%url, error = %e, "failed to read response body");
            RequestError::network(message)
        })?;

        if !status.is_success() {
            debug!(%url, %status, body = %truncate_body(&body), "request returned an error status");
            return Err(RequestError::network(message));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OmGeocodingResult {
    latitude: f64,
    longitude: f64,
    name: String,
    #[serde(default)]
    country_code: String,
}

#[derive(Debug, Deserialize)]
struct OmGeocodingResponse {
    #[serde(default)]
    results: Option<Vec<OmGeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    weathercode: i32,
    #[serde(default)]
    time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current_weather: OmCurrentWeather,
}

#[async_trait]
impl LocationResolver for OpenMeteoClient {
    async fn resolve(&self, city: &str) -> Result<Location, RequestError> {
        let url = format!("{}/search", self.geocoding_url);
        let query = [("name", city.to_string()), ("count", "1".to_string())];

        let body = self.get_text(&url, &query, GEOCODING_UNAVAILABLE).await?;

        let parsed: OmGeocodingResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "failed to parse geocoding JSON");
            RequestError::network(GEOCODING_UNAVAILABLE)
        })?;

        let best = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(RequestError::location_not_found)?;

        debug!(
            "Geocoded '{}' to {} ({:.4}, {:.4})",
            city, best.name, best.latitude, best.longitude
        );

        Ok(Location {
            latitude: best.latitude,
            longitude: best.longitude,
            display_name: best.name,
            country_code: best.country_code,
        })
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn current_weather(&self, at: Coordinates) -> Result<WeatherObservation, RequestError> {
        let url = format!("{}/forecast", self.forecast_url);
        let query = [
            ("latitude", at.latitude.to_string()),
            ("longitude", at.longitude.to_string()),
            ("current_weather", "true".to_string()),
        ];

        let body = self.get_text(&url, &query, WEATHER_UNAVAILABLE).await?;

        let parsed: OmForecastResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "failed to parse forecast JSON");
            RequestError::network(WEATHER_UNAVAILABLE)
        })?;

        let current = parsed.current_weather;
        debug!("Current weather code at ({}, {}): {}", at.latitude, at.longitude, current.weathercode);

        Ok(WeatherObservation {
            weather_code: current.weathercode,
            observed_at: current.time.as_deref().and_then(parse_observation_time),
        })
    }
}

/// Open-Meteo reports local ISO 8601 time without seconds ("2024-06-01T12:00").
fn parse_observation_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
