use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    error::ApiErrorBody,
    protocol::{
        ApplicationStatus, ChatRequest, ChatResponse, DealRequest, DealResponse,
        RecommendationRequest, RecommendationResponse, SystemStatus, CHAT_PATH, DEALS_PATH,
        RECOMMENDATIONS_PATH, SYSTEM_STATUS_PATH,
    },
};
use tracing::debug;

use crate::{config::Settings, error::FetchError};

/// The backend as seen by the controllers. Implementations map transport
/// failures, non-2xx statuses and in-body `error` fields onto [`FetchError`].
#[async_trait]
pub trait FoodApi: Send + Sync {
    async fn recommendations(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResponse, FetchError>;
    async fn deals(&self, request: DealRequest) -> Result<DealResponse, FetchError>;
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, FetchError>;
    async fn system_status(&self) -> Result<SystemStatus, FetchError>;
}

pub type SharedFoodApi = Arc<dyn FoodApi>;

pub struct HttpFoodApi {
    http: Client,
    settings: Settings,
}

impl HttpFoodApi {
    pub fn new(settings: Settings) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self { http, settings })
    }

    pub fn shared(settings: Settings) -> Result<SharedFoodApi, FetchError> {
        Ok(Arc::new(Self::new(settings)?))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + ApplicationStatus,
    {
        let request = self.http.post(self.settings.endpoint(path)).json(body);
        self.execute(path, request).await
    }

    async fn execute<T>(&self, path: &str, request: RequestBuilder) -> Result<T, FetchError>
    where
        T: DeserializeOwned + ApplicationStatus,
    {
        let response = request.send().await?;
        let status = response.status();
        let raw = response.text().await?;
        debug!("api: settled path={path} status={} bytes={}", status.as_u16(), raw.len());

        if !status.is_success() {
            let body = ApiErrorBody::parse(&raw);
            return Err(FetchError::server(
                status,
                body.as_ref().and_then(ApiErrorBody::message),
            ));
        }

        let decoded: T = serde_json::from_str(&raw)?;
        if let Some(message) = decoded.application_error() {
            return Err(FetchError::Application(message.to_string()));
        }
        Ok(decoded)
    }
}

#[async_trait]
impl FoodApi for HttpFoodApi {
    async fn recommendations(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResponse, FetchError> {
        self.post_json(RECOMMENDATIONS_PATH, &request).await
    }

    async fn deals(&self, request: DealRequest) -> Result<DealResponse, FetchError> {
        self.post_json(DEALS_PATH, &request).await
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, FetchError> {
        let response: ChatResponse = self.post_json(CHAT_PATH, &request).await?;
        if response.response.is_none() {
            return Err(FetchError::Application(
                "Failed to get response".to_string(),
            ));
        }
        Ok(response)
    }

    async fn system_status(&self) -> Result<SystemStatus, FetchError> {
        let request = self.http.get(self.settings.endpoint(SYSTEM_STATUS_PATH));
        self.execute(SYSTEM_STATUS_PATH, request).await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
