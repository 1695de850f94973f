use crate::model::WeatherModel;

/// Message published for non-2xx responses and undecodable bodies.
pub const FETCH_FAILED: &str = "Failed to fetch data";

/// Message published for transport faults that carry no text of their own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// State of the most recent weather lookup.
///
/// The store exposes `Option<WeatherResult>`; `None` means nothing has been
/// fetched yet.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherResult {
    Loading,
    Success(WeatherModel),
    Error(String),
}

impl WeatherResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Success or Error; a lookup never leaves a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    pub fn model(&self) -> Option<&WeatherModel> {
        match self {
            Self::Success(model) => Some(model),
            _ => None,
        }
    }
}
