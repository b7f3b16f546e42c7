use chrono::{DateTime, Local};
use shared::{
    domain::{FestivalEntry, Location, Recommendation, WeatherSnapshot},
    protocol::{RecommendationRequest, RecommendationResponse},
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    api::SharedFoodApi,
    clock::ClockTicker,
    config::Settings,
    error::FetchError,
    fetch::{DataSource, FetchPhase, LoadingTracker},
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecommendationContext {
    pub weather: Option<WeatherSnapshot>,
    pub festivals: Vec<FestivalEntry>,
    pub current_month: String,
}

/// Snapshot of everything the recommendations view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationView {
    pub location: Option<Location>,
    pub recommendations: Vec<Recommendation>,
    pub context: RecommendationContext,
    /// Non-fatal notices reported by the backend on a successful fetch.
    pub warnings: Vec<String>,
    pub error: Option<String>,
    pub demo_mode: bool,
    pub source: Option<DataSource>,
    pub is_loading: bool,
    pub phase: FetchPhase,
}

impl RecommendationView {
    /// City to show in the header: the one the backend resolved, or the one
    /// the user picked.
    pub fn display_city(&self) -> Option<&str> {
        self.context
            .weather
            .as_ref()
            .and_then(|weather| weather.city.as_deref())
            .or_else(|| self.location.as_ref().map(Location::as_str))
    }
}

#[derive(Debug, Default)]
struct RecommendationState {
    location: Option<Location>,
    recommendations: Vec<Recommendation>,
    context: RecommendationContext,
    warnings: Vec<String>,
    error: Option<String>,
    demo_mode: bool,
    source: Option<DataSource>,
}

impl RecommendationState {
    fn apply_success(&mut self, response: RecommendationResponse) {
        let context = response.context.unwrap_or_default();
        self.recommendations = response.recommendations;
        self.context = RecommendationContext {
            weather: context.weather,
            festivals: context
                .festivals
                .map(|festivals| festivals.into_entries())
                .unwrap_or_default(),
            current_month: context.current_month.unwrap_or_default(),
        };
        self.warnings = response.errors;
        self.error = None;
        self.demo_mode = response.demo_mode.unwrap_or(false);
        self.source = Some(DataSource::Live);
    }

    fn apply_failure(&mut self, err: &FetchError) {
        self.recommendations.clear();
        self.context = RecommendationContext::default();
        self.warnings.clear();
        self.error = Some(format!(
            "Failed to load recommendations: {}",
            err.user_message()
        ));
        self.demo_mode = true;
        self.source = Some(DataSource::Fallback);
    }
}

/// Personalised dish recommendations plus weather and festival context for
/// one location.
pub struct RecommendationController {
    api: SharedFoodApi,
    settings: Settings,
    state: Mutex<RecommendationState>,
    loading: LoadingTracker,
    clock: ClockTicker,
}

impl RecommendationController {
    /// Starts the display clock, so this must run inside a Tokio runtime.
    /// The clock stops when the controller is dropped.
    pub fn new(api: SharedFoodApi, settings: Settings) -> Self {
        let clock = ClockTicker::start(settings.clock_tick);
        Self {
            api,
            settings,
            state: Mutex::new(RecommendationState::default()),
            loading: LoadingTracker::new(),
            clock,
        }
    }

    /// Runs one fetch for `location` and returns what the view settled on.
    /// Overlapping calls are not coalesced; whichever settles last wins.
    pub async fn refresh(&self, location: &Location) -> DataSource {
        let _loading = self.loading.begin();
        {
            let mut state = self.state.lock().await;
            state.error = None;
            state.location = Some(location.clone());
        }
        info!("recommendations: fetching location={location}");

        let request = RecommendationRequest {
            user_id: self.settings.user_id.clone(),
            location: location.clone(),
        };
        let result = self.api.recommendations(request).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(response) => {
                state.apply_success(response);
                info!(
                    "recommendations: fetched count={} warnings={} demo_mode={} location={location}",
                    state.recommendations.len(),
                    state.warnings.len(),
                    state.demo_mode
                );
                DataSource::Live
            }
            Err(err) => {
                warn!("recommendations: fetch failed location={location} error={err}");
                state.apply_failure(&err);
                DataSource::Fallback
            }
        }
    }

    pub async fn view(&self) -> RecommendationView {
        let state = self.state.lock().await;
        let is_loading = self.loading.is_loading();
        RecommendationView {
            location: state.location.clone(),
            recommendations: state.recommendations.clone(),
            context: state.context.clone(),
            warnings: state.warnings.clone(),
            error: state.error.clone(),
            demo_mode: state.demo_mode,
            source: state.source,
            is_loading,
            phase: FetchPhase::resolve(is_loading, state.source),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn current_time(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn clock(&self) -> &ClockTicker {
        &self.clock
    }

    /// Tears the view down: stops the display clock.
    pub fn stop_clock(&mut self) {
        self.clock.stop();
    }
}

#[cfg(test)]
#[path = "tests/recommendations_tests.rs"]
mod tests;
