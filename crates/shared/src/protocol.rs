//! Request and response bodies for the food-discovery backend.
//!
//! Every response field the client reads carries a default so a sparse
//! body still decodes.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    null_as_default, Deal, FestivalEntry, Location, Recommendation, WeatherSnapshot,
};

pub const RECOMMENDATIONS_PATH: &str = "/api/food/recommendations";
pub const DEALS_PATH: &str = "/api/deals/recommendations";
pub const CHAT_PATH: &str = "/api/food/chat";
pub const SYSTEM_STATUS_PATH: &str = "/api/system/status";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRequest {
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub location: Location,
}

/// The backend wraps festivals as `{ "festivals": [...] }`; a bare list is
/// accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FestivalsPayload {
    Wrapped {
        #[serde(default, deserialize_with = "null_as_default")]
        festivals: Vec<FestivalEntry>,
    },
    List(Vec<FestivalEntry>),
}

impl FestivalsPayload {
    pub fn into_entries(self) -> Vec<FestivalEntry> {
        match self {
            Self::Wrapped { festivals } => festivals,
            Self::List(festivals) => festivals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecommendationContextPayload {
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub festivals: Option<FestivalsPayload>,
    #[serde(default)]
    pub current_month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub context: Option<RecommendationContextPayload>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub demo_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DealResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub deals: Vec<Deal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub marketing_ideas: Vec<String>,
    #[serde(default)]
    pub total_savings: Option<f64>,
    #[serde(default)]
    pub high_priority_count: Option<u32>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub demo_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DealResponse {
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_backend_timestamp)
    }
}

/// Accepts RFC 3339 or a naive ISO-8601 timestamp, which the backend emits
/// in its own local time.
pub fn parse_backend_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub demo_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cohere_api_available: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather_api_available: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub demo_mode: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

/// Responses that may report failure inside a 2xx body.
pub trait ApplicationStatus {
    fn application_error(&self) -> Option<&str>;
}

macro_rules! application_status {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ApplicationStatus for $ty {
                fn application_error(&self) -> Option<&str> {
                    self.error.as_deref().filter(|message| !message.trim().is_empty())
                }
            }
        )+
    };
}

application_status!(RecommendationResponse, DealResponse, ChatResponse);

impl ApplicationStatus for SystemStatus {
    fn application_error(&self) -> Option<&str> {
        None
    }
}
