use serde::{Deserialize, Serialize};

/// Body the backend returns alongside a failing status, e.g.
/// `{ "error": "weather service unavailable" }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}
