use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Display and query convention for temperatures and wind speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn wind_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown unit system '{0}'. Supported: metric, imperial.")]
pub struct ParseUnitSystemError(String);

impl FromStr for UnitSystem {
    type Err = ParseUnitSystemError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(ParseUnitSystemError(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imperial_labels() {
        let units: UnitSystem = "imperial".parse().unwrap();
        assert_eq!(units.temperature_suffix(), "°F");
        assert_eq!(units.wind_suffix(), "mph");
    }

    #[test]
    fn metric_labels() {
        let units: UnitSystem = "metric".parse().unwrap();
        assert_eq!(units.temperature_suffix(), "°C");
        assert_eq!(units.wind_suffix(), "m/s");
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("Imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert_eq!(" METRIC ".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
    }

    #[test]
    fn unknown_unit_system_error() {
        let err = "kelvin".parse::<UnitSystem>().unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn as_str_roundtrip() {
        for units in UnitSystem::all() {
            assert_eq!(units.as_str().parse::<UnitSystem>().unwrap(), *units);
        }
    }
}
