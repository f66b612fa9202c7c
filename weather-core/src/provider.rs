use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    Config,
    cache::{CacheKey, Clock, SystemClock, TtlCache},
    error::{Result, WeatherError},
    model::{Endpoint, ForecastSample, LocationCandidate, WeatherSnapshot},
    units::UnitSystem,
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, location: &str, units: UnitSystem) -> Result<WeatherSnapshot>;

    async fn fetch_forecast(&self, location: &str, units: UnitSystem) -> Result<Vec<ForecastSample>>;

    async fn search_locations(&self, query: &str, limit: u8) -> Result<Vec<LocationCandidate>>;
}

/// Wraps a provider and memoizes successful current/forecast lookups for a
/// fixed time. Failures are never cached; geocoding passes straight through.
#[derive(Debug)]
pub struct CachedProvider<P> {
    inner: P,
    current: TtlCache<CacheKey, WeatherSnapshot>,
    forecast: TtlCache<CacheKey, Vec<ForecastSample>>,
}

impl<P: WeatherProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: std::time::Duration) -> Self {
        Self::with_clock(inner, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(inner: P, ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            current: TtlCache::with_clock(ttl, clock.clone()),
            forecast: TtlCache::with_clock(ttl, clock),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: WeatherProvider> WeatherProvider for CachedProvider<P> {
    async fn fetch_current(&self, location: &str, units: UnitSystem) -> Result<WeatherSnapshot> {
        let key = CacheKey::new(Endpoint::Current, location, units);
        if let Some(hit) = self.current.get(&key) {
            tracing::debug!(endpoint = %key.endpoint, location = %key.location, %units, "cache hit");
            return Ok(hit);
        }
        tracing::debug!(endpoint = %key.endpoint, location = %key.location, %units, "cache miss");

        let snapshot = self.inner.fetch_current(location, units).await?;
        self.current.insert(key, snapshot.clone());
        Ok(snapshot)
    }

    async fn fetch_forecast(&self, location: &str, units: UnitSystem) -> Result<Vec<ForecastSample>> {
        let key = CacheKey::new(Endpoint::Forecast, location, units);
        if let Some(hit) = self.forecast.get(&key) {
            tracing::debug!(endpoint = %key.endpoint, location = %key.location, %units, "cache hit");
            return Ok(hit);
        }
        tracing::debug!(endpoint = %key.endpoint, location = %key.location, %units, "cache miss");

        let samples = self.inner.fetch_forecast(location, units).await?;
        self.forecast.insert(key, samples.clone());
        Ok(samples)
    }

    async fn search_locations(&self, query: &str, limit: u8) -> Result<Vec<LocationCandidate>> {
        self.inner.search_locations(query, limit).await
    }
}

/// Build the cached OpenWeather client described by `config`.
///
/// Fails with [`WeatherError::Configuration`] when no API key can be resolved.
pub fn provider_from_config(config: &Config) -> Result<CachedProvider<OpenWeatherProvider>> {
    provider_from_config_with(config, |name| std::env::var(name).ok())
}

/// [`provider_from_config`] with an explicit environment lookup.
pub fn provider_from_config_with<F>(
    config: &Config,
    env: F,
) -> Result<CachedProvider<OpenWeatherProvider>>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = config.resolve_api_key_with(env)?;
    provider_with_key(config, api_key)
}

pub fn provider_with_key(
    config: &Config,
    api_key: String,
) -> Result<CachedProvider<OpenWeatherProvider>> {
    let inner = OpenWeatherProvider::builder(api_key)
        .base_url(&config.base_url)
        .geo_base_url(&config.geo_base_url)
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| WeatherError::Configuration(format!("Failed to build HTTP client: {e}")))?;

    Ok(CachedProvider::new(inner, config.cache_ttl()))
}
