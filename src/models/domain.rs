use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// City and region a postal code belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub region: String,
}

/// Current temperature reported by the weather provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub celsius: f64,
}

/// Final answer for a postal code
///
/// Wire format: `{"city", "temp_c", "temp_f", "temp_k"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResult {
    pub city: String,
    #[serde(rename = "temp_c")]
    pub celsius: f64,
    #[serde(rename = "temp_f")]
    pub fahrenheit: f64,
    #[serde(rename = "temp_k")]
    pub kelvin: f64,
}

impl TemperatureResult {
    /// Build a result from a city and a Celsius reading
    pub fn from_reading(city: String, reading: WeatherReading) -> Self {
        let (fahrenheit, kelvin) = crate::core::units::convert(reading.celsius);
        Self {
            city,
            celsius: reading.celsius,
            fahrenheit,
            kelvin,
        }
    }
}

/// Aggregate status reported by a health probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Ready,
    Alive,
}

/// Result of an individual health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Ok,
    Error,
    NotConfigured,
}

impl HealthStatus {
    /// `Degraded` if any check errored, `Ok` otherwise
    pub fn aggregate(checks: &BTreeMap<String, CheckStatus>) -> Self {
        if checks.values().any(|c| *c == CheckStatus::Error) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Ok
        }
    }
}
