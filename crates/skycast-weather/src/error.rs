//! Weather-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("API key missing or placeholder, and no proxy configured")]
    MissingApiKey,

    #[error("Provider configuration error: {0}")]
    Config(String),

    #[error("Provider error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingApiKey => {
                "Weather API key not configured. Set OPENWEATHER_API_KEY or configure a proxy."
                    .to_string()
            }
            Self::Config(msg) => format!("Weather configuration error: {}", msg),
            Self::Api { message, .. } => message.clone(),
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Parse(_) => "Received an unexpected response. Please try again.".to_string(),
        }
    }

    /// Configuration errors are fatal to the requested action and get a
    /// longer-lived alert; everything else is transient.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_surfaces_provider_message() {
        let err = WeatherError::Api {
            status: 404,
            message: "city not found".to_string(),
        };
        assert_eq!(err.user_message(), "city not found");
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_configuration_errors_flagged() {
        assert!(WeatherError::MissingApiKey.is_configuration());
        assert!(WeatherError::Config("template".into()).is_configuration());
    }
}
