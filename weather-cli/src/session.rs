use weather_core::{
    Config, DailySummary, LocationCandidate, MapConfig, Theme, UnitSystem, WeatherError,
    WeatherProvider, WeatherSnapshot, aggregate,
};

use crate::theme::RenderContext;

/// Everything rendered for one location.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub current: WeatherSnapshot,
    pub days: Vec<DailySummary>,
}

/// Per-run state: the (cached) client plus display preferences. Passed
/// explicitly to every action instead of living in globals.
#[derive(Debug)]
pub struct Session<P> {
    provider: P,
    pub units: UnitSystem,
    pub theme: Theme,
    pub map: MapConfig,
    pub geocode_limit: u8,
}

impl<P: WeatherProvider> Session<P> {
    pub fn new(config: &Config, provider: P) -> Self {
        Self {
            provider,
            units: config.units,
            theme: config.theme,
            map: config.map,
            geocode_limit: config.geocode_limit,
        }
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext::new(self.units, self.theme)
    }

    /// Fetch current conditions and the forecast concurrently, then aggregate.
    pub async fn dashboard(&self, location: &str) -> Result<Dashboard, WeatherError> {
        tracing::info!(location, units = %self.units, "loading dashboard");
        let (current, samples) = tokio::try_join!(
            self.provider.fetch_current(location, self.units),
            self.provider.fetch_forecast(location, self.units),
        )?;

        Ok(Dashboard { current, days: aggregate(&samples) })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<LocationCandidate>, WeatherError> {
        tracing::info!(query, limit = self.geocode_limit, "searching locations");
        self.provider.search_locations(query, self.geocode_limit).await
    }

    pub fn toggle_units(&mut self) {
        self.units = self.units.toggled();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;
    use weather_core::ForecastSample;

    #[derive(Debug, Default)]
    struct FakeProvider {
        seen_units: Mutex<Vec<UnitSystem>>,
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_current(&self, location: &str, units: UnitSystem) -> Result<WeatherSnapshot, WeatherError> {
            self.seen_units.lock().unwrap().push(units);
            if location == "Atlantis" {
                return Err(WeatherError::Api { status: 404, message: "city not found".into() });
            }
            Ok(WeatherSnapshot {
                location_name: location.into(),
                country: "GB".into(),
                observation_time: Utc::now(),
                temperature: 11.0,
                feels_like: 10.0,
                humidity_pct: 80,
                wind_speed: 4.0,
                condition: "light rain".into(),
                icon: "10d".into(),
            })
        }

        async fn fetch_forecast(&self, _location: &str, units: UnitSystem) -> Result<Vec<ForecastSample>, WeatherError> {
            self.seen_units.lock().unwrap().push(units);
            let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
            Ok(vec![ForecastSample {
                timestamp: ts,
                temperature: 9.0,
                humidity_pct: 70,
                wind_speed: 3.0,
                condition: "light rain".into(),
                icon: "10d".into(),
            }])
        }

        async fn search_locations(&self, query: &str, limit: u8) -> Result<Vec<LocationCandidate>, WeatherError> {
            Ok((0..limit)
                .map(|i| LocationCandidate {
                    name: format!("{query} {i}"),
                    region: None,
                    country: "FR".into(),
                    latitude: 48.0 + f64::from(i),
                    longitude: 2.0,
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn dashboard_combines_current_and_forecast() {
        let session = Session::new(&Config::default(), FakeProvider::default());
        let dashboard = session.dashboard("London").await.unwrap();
        assert_eq!(dashboard.current.location_name, "London");
        assert_eq!(dashboard.days.len(), 1);
        assert_eq!(dashboard.days[0].max_temp, 9.0);
    }

    #[tokio::test]
    async fn dashboard_surfaces_api_error() {
        let session = Session::new(&Config::default(), FakeProvider::default());
        let err = session.dashboard("Atlantis").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn toggled_units_reach_the_provider() {
        let mut session = Session::new(&Config::default(), FakeProvider::default());
        session.toggle_units();
        session.dashboard("London").await.unwrap();
        let seen = session.provider.seen_units.lock().unwrap().clone();
        assert_eq!(seen, vec![UnitSystem::Imperial, UnitSystem::Imperial]);
    }

    #[tokio::test]
    async fn search_uses_configured_limit() {
        let mut config = Config::default();
        config.geocode_limit = 3;
        let session = Session::new(&config, FakeProvider::default());
        assert_eq!(session.search("Paris").await.unwrap().len(), 3);
    }

    #[test]
    fn render_context_follows_session() {
        let mut session = Session::new(&Config::default(), FakeProvider::default());
        session.toggle_theme();
        session.toggle_units();
        assert_eq!(session.theme, Theme::Dark);
        assert_eq!(session.render_context().units, UnitSystem::Imperial);
    }
}
