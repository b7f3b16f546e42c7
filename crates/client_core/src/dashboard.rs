use shared::{domain::Location, protocol::SystemStatus};
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    api::SharedFoodApi,
    config::Settings,
    conversation::{ConversationController, SubmitOutcome},
    deals::DealController,
    error::FetchError,
    fetch::DataSource,
    recommendations::RecommendationController,
};

/// The three views sharing one backend and one selected location.
pub struct Dashboard {
    api: SharedFoodApi,
    location: RwLock<Location>,
    pub recommendations: RecommendationController,
    pub deals: DealController,
    pub conversation: ConversationController,
}

impl Dashboard {
    /// Builds every controller for `location` and runs the first fetch of
    /// recommendations and deals concurrently. Needs a Tokio runtime.
    pub async fn mount(api: SharedFoodApi, settings: Settings, location: Location) -> Self {
        let dashboard = Self {
            recommendations: RecommendationController::new(api.clone(), settings),
            deals: DealController::new(api.clone()),
            conversation: ConversationController::new(api.clone(), &location),
            location: RwLock::new(location),
            api,
        };
        dashboard.refresh().await;
        dashboard
    }

    pub async fn location(&self) -> Location {
        self.location.read().await.clone()
    }

    /// Switches location and refetches recommendations and deals. The chat
    /// transcript keeps its original greeting.
    pub async fn select_location(&self, location: Location) -> (DataSource, DataSource) {
        info!("dashboard: location selected location={location}");
        *self.location.write().await = location;
        self.refresh().await
    }

    pub async fn refresh(&self) -> (DataSource, DataSource) {
        let location = self.location().await;
        tokio::join!(
            self.recommendations.refresh(&location),
            self.deals.refresh(&location)
        )
    }

    pub async fn submit_chat(&self, text: &str) -> SubmitOutcome {
        let location = self.location().await;
        self.conversation.submit(text, &location).await
    }

    pub async fn system_status(&self) -> Result<SystemStatus, FetchError> {
        self.api.system_status().await
    }
}
