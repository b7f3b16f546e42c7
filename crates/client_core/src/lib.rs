//! Client-side orchestration for the food discovery dashboard: one
//! controller per view, each fetching from the backend, degrading to a
//! fixed state on failure, and exposing a snapshot for rendering.

pub mod api;
pub mod clock;
pub mod config;
pub mod conversation;
pub mod dashboard;
pub mod deals;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod recommendations;

pub use api::{FoodApi, HttpFoodApi, SharedFoodApi};
pub use config::{load_settings, Settings};
pub use conversation::{ChatMessage, ConversationController, Sender, SubmitOutcome};
pub use dashboard::Dashboard;
pub use deals::{DealController, DealSummary, FilterToken};
pub use error::FetchError;
pub use fetch::{DataSource, FetchPhase};
pub use recommendations::RecommendationController;

/// User-facing banner shown above recommendations while the backend runs
/// without its AI keys.
pub const RECOMMENDATIONS_DEMO_NOTICE: &str =
    "Using sample data. For full features, please configure API keys in the backend.";
pub const CHAT_DEMO_NOTICE: &str =
    "Using sample responses. For full features, please configure API keys in the backend.";
/// Footer under the deal list after a failed fetch.
pub const DEALS_FALLBACK_NOTICE: &str = "Showing sample data. Please check your connection.";

#[cfg(test)]
mod test_support;
