//! Validated decoding of OpenWeather response bodies.
//!
//! The wire types below mirror the JSON that OpenWeather sends. Every field the
//! dashboard relies on is required: a missing or mistyped field fails the whole
//! body with [`WeatherError::MalformedData`] instead of turning into a default.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    error::{Result, WeatherError},
    model::{Endpoint, ForecastSample, LocationCandidate, WeatherSnapshot},
};

#[derive(Debug, Deserialize)]
struct OwCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    sys: OwSys,
    main: OwCurrentMain,
    weather: Vec<OwCondition>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwCondition>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    #[serde(default)]
    state: Option<String>,
    country: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

/// Decode a current-weather body.
pub fn parse_current(body: &str) -> Result<WeatherSnapshot> {
    let parsed: OwCurrentResponse = decode(Endpoint::Current, body)?;
    let condition = first_condition(parsed.weather, "current weather")?;

    Ok(WeatherSnapshot {
        location_name: parsed.name,
        country: parsed.sys.country,
        observation_time: timestamp(parsed.dt, "current weather")?,
        temperature: parsed.main.temp,
        feels_like: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        condition: condition.description,
        icon: condition.icon,
    })
}

/// Decode a forecast body into its samples, in the order they were sent.
pub fn parse_forecast(body: &str) -> Result<Vec<ForecastSample>> {
    let parsed: OwForecastResponse = decode(Endpoint::Forecast, body)?;

    parsed
        .list
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let context = format!("forecast entry {idx}");
            let condition = first_condition(entry.weather, &context)?;
            Ok(ForecastSample {
                timestamp: timestamp(entry.dt, &context)?,
                temperature: entry.main.temp,
                humidity_pct: entry.main.humidity,
                wind_speed: entry.wind.speed,
                condition: condition.description,
                icon: condition.icon,
            })
        })
        .collect()
}

/// Decode a direct-geocoding body.
pub fn parse_locations(body: &str) -> Result<Vec<LocationCandidate>> {
    let parsed: Vec<OwGeoEntry> = decode(Endpoint::Geocode, body)?;

    parsed
        .into_iter()
        .map(|entry| {
            if !(-90.0..=90.0).contains(&entry.lat) || !(-180.0..=180.0).contains(&entry.lon) {
                return Err(WeatherError::MalformedData(format!(
                    "geocode result '{}' has out-of-range coordinates ({}, {})",
                    entry.name, entry.lat, entry.lon
                )));
            }
            Ok(LocationCandidate {
                name: entry.name,
                region: entry.state.filter(|s| !s.trim().is_empty()),
                country: entry.country,
                latitude: entry.lat,
                longitude: entry.lon,
            })
        })
        .collect()
}

/// Message to attach to an `Api` error: OpenWeather's own `message` field when the
/// body carries one, otherwise the start of the raw body.
pub fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<OwErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => truncate_body(body),
    }
}

fn decode<T: serde::de::DeserializeOwned>(endpoint: Endpoint, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        WeatherError::MalformedData(format!("{endpoint} response did not match the expected shape: {e}"))
    })
}

fn first_condition(conditions: Vec<OwCondition>, context: &str) -> Result<OwCondition> {
    conditions
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MalformedData(format!("{context} has an empty `weather` list")))
}

fn timestamp(ts: i64, context: &str) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| WeatherError::MalformedData(format!("{context} has invalid timestamp {ts}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
