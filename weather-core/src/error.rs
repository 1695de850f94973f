use thiserror::Error;

use crate::result::UNKNOWN_ERROR;

/// Why a response body could not become a [`crate::WeatherModel`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is empty")]
    EmptyBody,

    #[error("malformed weather JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

impl DecodeError {
    pub(crate) fn out_of_range(field: &'static str, value: f64) -> Self {
        Self::OutOfRange { field, value }
    }
}

/// The HTTP exchange itself failed: no connectivity, timeout, TLS, or the
/// body could not be read. `message` is `None` when the fault carried no text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or(UNKNOWN_ERROR))]
pub struct TransportError {
    pub message: Option<String>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: Some(message.into()) }
    }

    pub fn without_message() -> Self {
        Self { message: None }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // The URL carries the API key.
        let err = err.without_url();
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(message)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "No API key configured.\n\
         Hint: run `weather configure` or pass --api-key / set WEATHER_API_KEY."
    )]
    MissingApiKey,

    #[error("Invalid base URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display_uses_message() {
        assert_eq!(TransportError::new("timeout").to_string(), "timeout");
        assert_eq!(TransportError::without_message().to_string(), UNKNOWN_ERROR);
    }

    #[test]
    fn missing_api_key_mentions_configure() {
        let msg = ConfigError::MissingApiKey.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("weather configure"));
    }
}
