//! Core library for the `weather` dashboard.
//!
//! This crate defines:
//! - Configuration & API key resolution
//! - The OpenWeather client and its short-lived response cache
//! - Validated decoding of upstream payloads
//! - Aggregation of the 3-hour forecast into daily summaries
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod payload;
pub mod provider;
pub mod units;

pub use aggregate::{aggregate, aggregate_in, aggregate_payload};
pub use config::{Config, MapConfig, Theme};
pub use error::WeatherError;
pub use model::{DailySummary, Endpoint, ForecastSample, LocationCandidate, WeatherSnapshot};
pub use provider::{CachedProvider, OpenWeatherProvider, WeatherProvider, provider_from_config};
pub use units::UnitSystem;
