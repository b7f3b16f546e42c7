use std::{sync::Arc, time::Duration};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use client_core::{
    fallback::fallback_deals, Dashboard, DataSource, HttpFoodApi, Sender, Settings,
    SubmitOutcome,
};
use serde_json::{json, Value};
use shared::{
    domain::Location,
    protocol::{
        ChatRequest, DealRequest, RecommendationRequest, CHAT_PATH, DEALS_PATH,
        RECOMMENDATIONS_PATH,
    },
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct Backend {
    chat_locations: Arc<Mutex<Vec<String>>>,
}

async fn recommendations(Json(request): Json<RecommendationRequest>) -> Json<Value> {
    Json(json!({
        "recommendations": [{
            "dish_name": format!("{} special", request.location),
            "cuisine": "Indian",
            "reason": "Local favourite",
            "confidence": 0.75,
            "tags": ["local", "hot", "quick", "cheap"]
        }],
        "context": {
            "weather": { "condition": "Clear", "temperature": 31.0, "city": request.location.as_str() },
            "festivals": { "festivals": [] },
            "current_month": "May"
        },
        "errors": [],
        "demo_mode": false
    }))
}

async fn deals(Json(request): Json<DealRequest>) -> (StatusCode, Json<Value>) {
    if request.location.as_str() == "Delhi" {
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "Upstream timeout" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "deals": [
                { "restaurant": "A", "deal": "40% off", "type": "clearance", "urgency": "high",
                  "original_price": 100, "discounted_price": 60, "rating": 4.0 },
                { "restaurant": "B", "deal": "Free dessert", "type": "innovative", "urgency": "low" }
            ],
            "marketing_ideas": ["Monsoon combo"],
            "timestamp": "2024-05-01T12:00:00Z"
        })),
    )
}

async fn chat(State(backend): State<Backend>, Json(request): Json<ChatRequest>) -> Json<Value> {
    backend
        .chat_locations
        .lock()
        .await
        .push(request.location.to_string());
    Json(json!({ "response": format!("You said: {}", request.message), "demo_mode": true }))
}

async fn spawn_backend() -> (Settings, Backend) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let backend = Backend::default();
    let app = Router::new()
        .route(RECOMMENDATIONS_PATH, post(recommendations))
        .route(DEALS_PATH, post(deals))
        .route(CHAT_PATH, post(chat))
        .with_state(backend.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let mut settings = Settings::with_base_url(format!("http://{addr}")).expect("settings");
    settings.clock_tick = Duration::from_millis(20);
    (settings, backend)
}

#[tokio::test]
async fn dashboard_mounts_switches_location_and_chats() {
    let (settings, backend) = spawn_backend().await;
    let api = HttpFoodApi::shared(settings.clone()).expect("client");

    let dashboard = Dashboard::mount(api, settings, Location::new("Mumbai")).await;

    let recommendations = dashboard.recommendations.view().await;
    assert_eq!(recommendations.recommendations[0].dish_name, "Mumbai special");
    assert_eq!(recommendations.recommendations[0].headline_tags().len(), 3);
    assert_eq!(recommendations.display_city(), Some("Mumbai"));
    assert!(!recommendations.is_loading);

    let deals = dashboard.deals.view().await;
    assert_eq!(deals.source, Some(DataSource::Live));
    assert_eq!(deals.deals.len(), 2);
    let summary = deals.summary.expect("summary");
    assert_eq!(summary.total_savings, 40.0);
    assert_eq!(summary.high_priority_count, 1);
    assert_eq!(summary.average_rating, 4.0);

    let (recs_source, deals_source) = dashboard.select_location(Location::new("Delhi")).await;
    assert_eq!(recs_source, DataSource::Live);
    assert_eq!(deals_source, DataSource::Fallback);

    let deals = dashboard.deals.view().await;
    assert_eq!(deals.deals, fallback_deals());
    assert!(deals.demo_mode);
    assert_eq!(
        deals.error.as_deref(),
        Some("API request failed with status 502: Upstream timeout")
    );
    assert_eq!(
        dashboard.recommendations.view().await.recommendations[0].dish_name,
        "Delhi special"
    );

    assert_eq!(dashboard.submit_chat("hello").await, SubmitOutcome::Replied);
    let conversation = dashboard.conversation.view().await;
    assert!(conversation.messages[0].text.contains("location in Mumbai"));
    assert_eq!(conversation.messages[2].sender, Sender::Assistant);
    assert_eq!(conversation.messages[2].text, "You said: hello");
    assert!(conversation.demo_mode);
    assert_eq!(*backend.chat_locations.lock().await, vec!["Delhi".to_string()]);
}
