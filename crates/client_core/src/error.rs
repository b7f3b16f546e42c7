use reqwest::StatusCode;
use thiserror::Error;

/// Why a backend call did not produce usable data. Controllers collapse
/// every variant into the same failed state and keep only
/// [`FetchError::user_message`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API request failed with status {status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("{0}")]
    Application(String),
}

impl FetchError {
    pub fn server(status: StatusCode, message: Option<&str>) -> Self {
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
        Self::Server { status, message }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Network(detail) => format!("Network error: {detail}"),
            Self::Server { status, message } => {
                format!("API request failed with status {}: {message}", status.as_u16())
            }
            Self::Application(message) => message.clone(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            return Self::Network(format!("request timed out: {value}"));
        }
        Self::Network(value.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Network(format!("malformed response body: {value}"))
    }
}
