//! Error taxonomy shared by the client, the cache and the aggregator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    /// Missing API key or unusable configuration. Raised before any request.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport failure: timeout, DNS, refused connection, truncated body.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("OpenWeather request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// Upstream payload did not match the expected shape.
    #[error("Malformed data: {0}")]
    MalformedData(String),
}

impl WeatherError {
    /// Short message suitable for showing next to a failed action.
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(msg) => format!("Configuration problem: {msg}"),
            Self::InvalidInput(msg) => msg.clone(),
            Self::Network(_) => "Network error. Check your connection and try again.".to_string(),
            Self::Api { status: 401, .. } => {
                "The API key was rejected (401). Run `weather configure` to update it.".to_string()
            }
            Self::Api { status: 404, message } => format!("Location not found: {message}"),
            Self::Api { status, message } => format!("Weather service error ({status}): {message}"),
            Self::MalformedData(_) => {
                "The weather service returned data in an unexpected format.".to_string()
            }
        }
    }

    /// Everything except configuration errors is scoped to a single action.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Configuration(_))
    }

    /// Upstream status code, when the error came from a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
