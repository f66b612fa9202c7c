use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current conditions for one location, as returned by the current-weather endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: String,
    pub observation_time: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub condition: String,
    pub icon: String,
}

/// One 3-hour entry of the forecast list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub condition: String,
    pub icon: String,
}

/// Statistics over all forecast samples that fall on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub max_temp: f64,
    pub min_temp: f64,
    pub avg_humidity: f64,
    pub avg_wind: f64,
    pub condition: String,
    pub icon: String,
}

/// A geocoding hit, used to place map markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub region: Option<String>,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationCandidate {
    /// `q` parameter that resolves back to this candidate, e.g. `Portland,Oregon,US`.
    pub fn query(&self) -> String {
        [Some(self.name.as_str()), self.region.as_deref(), Some(self.country.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Human-readable form, e.g. `Portland, Oregon, US`.
    pub fn label(&self) -> String {
        self.query().replace(',', ", ")
    }
}

/// Upstream endpoint a request goes to. Part of every cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Current,
    Forecast,
    Geocode,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::Forecast => "forecast",
            Endpoint::Geocode => "geocode",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
