use serde::{Deserialize, Serialize};

use crate::model::WeatherObservation;

/// WMO present-weather codes that count as rain.
/// See: https://open-meteo.com/en/docs#weathervariables
pub const RAIN_CODES: [i32; 16] = [
    51, 53, 55, // drizzle
    56, 57, // freezing drizzle
    61, 63, 65, // rain
    66, 67, // freezing rain
    80, 81, 82, // rain showers
    95, 96, 99, // thunderstorm
];

/// Rain family a matching WMO code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precipitation {
    Drizzle,
    FreezingDrizzle,
    Rain,
    FreezingRain,
    RainShowers,
    Thunderstorm,
}

impl Precipitation {
    /// `None` for every code outside [`RAIN_CODES`], including unknown ones.
    pub fn from_wmo_code(code: i32) -> Option<Self> {
        match code {
            51 | 53 | 55 => Some(Self::Drizzle),
            56 | 57 => Some(Self::FreezingDrizzle),
            61 | 63 | 65 => Some(Self::Rain),
            66 | 67 => Some(Self::FreezingRain),
            80..=82 => Some(Self::RainShowers),
            95 | 96 | 99 => Some(Self::Thunderstorm),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Drizzle => "Drizzle",
            Self::FreezingDrizzle => "Freezing drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing rain",
            Self::RainShowers => "Rain showers",
            Self::Thunderstorm => "Thunderstorm",
        }
    }
}

pub fn is_rain_code(code: i32) -> bool {
    RAIN_CODES.contains(&code)
}

pub fn classify(observation: &WeatherObservation) -> bool {
    is_rain_code(observation.weather_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rain_code_is_rain() {
        for code in RAIN_CODES {
            assert!(is_rain_code(code), "code {code} should be rain");
        }
    }

    #[test]
    fn dry_and_unknown_codes_are_not_rain() {
        for code in [0, 1, 2, 3, 45, 48, 71, 73, 75, 85, 100, -1, 52, 64, i32::MAX] {
            assert!(!is_rain_code(code), "code {code} should not be rain");
        }
    }

    #[test]
    fn precipitation_family_agrees_with_membership() {
        for code in -5..=120 {
            assert_eq!(Precipitation::from_wmo_code(code).is_some(), is_rain_code(code), "code {code}");
        }
        assert_eq!(Precipitation::from_wmo_code(66), Some(Precipitation::FreezingRain));
        assert_eq!(Precipitation::from_wmo_code(96), Some(Precipitation::Thunderstorm));
    }

    #[test]
    fn classify_reads_the_weather_code() {
        let wet = WeatherObservation { weather_code: 61, observed_at: None };
        let dry = WeatherObservation { weather_code: 0, observed_at: None };

        assert!(classify(&wet));
        assert!(!classify(&dry));
    }
}
