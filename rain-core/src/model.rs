use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::classify::Precipitation;

/// Label used when the position came from the host instead of a city lookup.
pub const CURRENT_LOCATION_LABEL: &str = "Your location";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Best geocoding match for a city name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
    pub country_code: String,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// "Tokyo, JP", or just the name when the provider gave no country.
    pub fn label(&self) -> String {
        if self.country_code.is_empty() {
            self.display_name.clone()
        } else {
            format!("{}, {}", self.display_name, self.country_code)
        }
    }
}

/// The slice of a current-weather response the classifier cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub weather_code: i32,
    pub observed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_raining: bool,
    pub label: String,
    /// Which rain family matched, if any.
    pub precipitation: Option<Precipitation>,
    pub observed_at: Option<NaiveDateTime>,
}

impl Verdict {
    pub fn answer(&self) -> &'static str {
        if self.is_raining { "YES" } else { "NO" }
    }
}
