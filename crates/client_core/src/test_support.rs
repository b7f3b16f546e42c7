use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::{
    domain::{Deal, DealType, Recommendation, Urgency},
    protocol::{
        ChatRequest, ChatResponse, DealRequest, DealResponse, RecommendationRequest,
        RecommendationResponse, SystemStatus,
    },
};
use tokio::sync::oneshot;

use crate::{api::FoodApi, error::FetchError};

pub(crate) enum Reply<T> {
    Ready(Result<T, FetchError>),
    Gated(oneshot::Receiver<Result<T, FetchError>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T, FetchError> {
        match self {
            Self::Ready(result) => result,
            Self::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Network("gate dropped".into()))),
        }
    }
}

/// Backend double answering each call with the next scripted reply.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    recommendations: Mutex<VecDeque<Reply<RecommendationResponse>>>,
    deals: Mutex<VecDeque<Reply<DealResponse>>>,
    chat: Mutex<VecDeque<Reply<ChatResponse>>>,
    pub(crate) recommendation_requests: Mutex<Vec<RecommendationRequest>>,
    pub(crate) deal_requests: Mutex<Vec<DealRequest>>,
    pub(crate) chat_requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_recommendations(&self, result: Result<RecommendationResponse, FetchError>) {
        self.recommendations
            .lock()
            .unwrap()
            .push_back(Reply::Ready(result));
    }

    pub(crate) fn gate_recommendations(
        &self,
    ) -> oneshot::Sender<Result<RecommendationResponse, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.recommendations
            .lock()
            .unwrap()
            .push_back(Reply::Gated(rx));
        tx
    }

    pub(crate) fn push_deals(&self, result: Result<DealResponse, FetchError>) {
        self.deals.lock().unwrap().push_back(Reply::Ready(result));
    }

    pub(crate) fn gate_deals(&self) -> oneshot::Sender<Result<DealResponse, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.deals.lock().unwrap().push_back(Reply::Gated(rx));
        tx
    }

    pub(crate) fn push_chat(&self, result: Result<ChatResponse, FetchError>) {
        self.chat.lock().unwrap().push_back(Reply::Ready(result));
    }

    pub(crate) fn gate_chat(&self) -> oneshot::Sender<Result<ChatResponse, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.chat.lock().unwrap().push_back(Reply::Gated(rx));
        tx
    }
}

fn unscripted<T>() -> Reply<T> {
    Reply::Ready(Err(FetchError::Network("no scripted reply".into())))
}

#[async_trait]
impl FoodApi for ScriptedApi {
    async fn recommendations(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResponse, FetchError> {
        self.recommendation_requests.lock().unwrap().push(request);
        let reply = self
            .recommendations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(unscripted);
        reply.resolve().await
    }

    async fn deals(&self, request: DealRequest) -> Result<DealResponse, FetchError> {
        self.deal_requests.lock().unwrap().push(request);
        let reply = self
            .deals
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(unscripted);
        reply.resolve().await
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, FetchError> {
        self.chat_requests.lock().unwrap().push(request);
        let reply = self
            .chat
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(unscripted);
        reply.resolve().await
    }

    async fn system_status(&self) -> Result<SystemStatus, FetchError> {
        Ok(SystemStatus::default())
    }
}

pub(crate) fn dish(name: &str) -> Recommendation {
    Recommendation {
        dish_name: name.to_string(),
        cuisine: "Indian".to_string(),
        reason_text: format!("{name} suits the weather"),
        confidence: 0.8,
        ..Recommendation::default()
    }
}

pub(crate) fn recommendations_with(names: &[&str]) -> RecommendationResponse {
    RecommendationResponse {
        recommendations: names.iter().map(|name| dish(name)).collect(),
        ..RecommendationResponse::default()
    }
}

pub(crate) fn deal(
    restaurant: &str,
    deal_type: DealType,
    urgency: Urgency,
    prices: Option<(f64, f64)>,
    rating: Option<f64>,
) -> Deal {
    Deal {
        restaurant: restaurant.to_string(),
        deal_text: format!("offer at {restaurant}"),
        deal_type,
        urgency,
        original_price: prices.map(|(original, _)| original),
        discounted_price: prices.map(|(_, discounted)| discounted),
        rating,
        ..Deal::default()
    }
}

pub(crate) fn chat_reply(text: &str) -> ChatResponse {
    ChatResponse {
        response: Some(text.to_string()),
        ..ChatResponse::default()
    }
}
