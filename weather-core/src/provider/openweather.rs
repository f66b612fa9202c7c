use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_GEO_BASE_URL},
    error::{Result, WeatherError},
    model::{Endpoint, ForecastSample, LocationCandidate, WeatherSnapshot},
    payload,
    units::UnitSystem,
};

use super::WeatherProvider;

/// Client for the OpenWeather current, forecast and direct-geocoding endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    geo_base_url: String,
    http: Client,
}

#[derive(Debug)]
pub struct OpenWeatherProviderBuilder {
    api_key: String,
    base_url: String,
    geo_base_url: String,
    timeout: Duration,
}

impl OpenWeatherProviderBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn geo_base_url(mut self, url: &str) -> Self {
        self.geo_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> reqwest::Result<OpenWeatherProvider> {
        let http = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("weather-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(OpenWeatherProvider {
            api_key: self.api_key,
            base_url: self.base_url,
            geo_base_url: self.geo_base_url,
            http,
        })
    }
}

impl OpenWeatherProvider {
    pub fn builder(api_key: String) -> OpenWeatherProviderBuilder {
        OpenWeatherProviderBuilder {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            geo_base_url: DEFAULT_GEO_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Issue one GET and return the body of a successful response.
    async fn get(&self, endpoint: Endpoint, url: String, query: &[(&str, &str)]) -> Result<String> {
        tracing::debug!(%endpoint, %url, "sending request");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(%endpoint, status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            let message = payload::api_error_message(&body);
            tracing::warn!(%endpoint, status = status.as_u16(), %message, "OpenWeather request failed");
            return Err(WeatherError::Api { status: status.as_u16(), message });
        }

        Ok(body)
    }
}

fn require_text<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WeatherError::InvalidInput(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, location: &str, units: UnitSystem) -> Result<WeatherSnapshot> {
        let location = require_text(location, "Location")?;
        let body = self
            .get(
                Endpoint::Current,
                format!("{}/weather", self.base_url),
                &[("q", location), ("units", units.as_str())],
            )
            .await?;
        payload::parse_current(&body)
    }

    async fn fetch_forecast(&self, location: &str, units: UnitSystem) -> Result<Vec<ForecastSample>> {
        let location = require_text(location, "Location")?;
        let body = self
            .get(
                Endpoint::Forecast,
                format!("{}/forecast", self.base_url),
                &[("q", location), ("units", units.as_str())],
            )
            .await?;
        payload::parse_forecast(&body)
    }

    async fn search_locations(&self, query: &str, limit: u8) -> Result<Vec<LocationCandidate>> {
        let query = require_text(query, "Search query")?;
        let limit = limit.max(1).to_string();
        let body = self
            .get(
                Endpoint::Geocode,
                format!("{}/direct", self.geo_base_url),
                &[("q", query), ("limit", limit.as_str())],
            )
            .await?;
        payload::parse_locations(&body)
    }
}
