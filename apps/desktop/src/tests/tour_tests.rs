use std::time::Duration;

use axum::{http::StatusCode, routing::post, Json, Router};
use client_core::{HttpFoodApi, Settings, DEALS_FALLBACK_NOTICE};
use serde_json::{json, Value};
use shared::protocol::{
    ChatRequest, DealRequest, RecommendationRequest, CHAT_PATH, DEALS_PATH, RECOMMENDATIONS_PATH,
};
use tokio::net::TcpListener;

use super::*;

async fn recommendations(Json(request): Json<RecommendationRequest>) -> Json<Value> {
    Json(json!({
        "recommendations": [{
            "dish_name": format!("{} thali", request.location),
            "cuisine": "Indian",
            "reason": "Local favourite",
            "confidence": 0.5,
            "tags": null
        }],
        "context": { "weather": { "condition": "Clear", "temperature": 30.0 } },
        "errors": null
    }))
}

async fn deals(Json(request): Json<DealRequest>) -> (StatusCode, Json<Value>) {
    if request.location.as_str() == "Chennai" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "down" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "deals": [{ "restaurant": "Corner Cafe", "deal": "10% off", "type": "clearance", "urgency": "high" }],
            "marketing_ideas": null
        })),
    )
}

async fn chat(Json(request): Json<ChatRequest>) -> Json<Value> {
    Json(json!({ "response": format!("{} has great dosa", request.location) }))
}

async fn mounted_dashboard() -> Dashboard {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route(RECOMMENDATIONS_PATH, post(recommendations))
        .route(DEALS_PATH, post(deals))
        .route(CHAT_PATH, post(chat));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let mut settings: Settings =
        Settings::with_base_url(format!("http://{addr}")).expect("settings");
    settings.clock_tick = Duration::from_millis(50);
    let api = HttpFoodApi::shared(settings.clone()).expect("client");
    Dashboard::mount(api, settings, Location::new("Bangalore")).await
}

#[tokio::test]
async fn walk_renders_each_location_in_turn() {
    let dashboard = mounted_dashboard().await;

    let out = walk(&dashboard, &[Location::new("Chennai")], &[])
        .await
        .expect("walk");

    let (before, after) = out.split_once("== Chennai ==").expect("switch header");
    assert!(before.contains("Recommendations for Bangalore"));
    assert!(before.contains("Bangalore thali"));
    assert!(before.contains("Corner Cafe"));
    assert!(!before.contains(DEALS_FALLBACK_NOTICE));

    assert!(after.contains("Chennai thali"));
    assert!(after.contains("Tandoori Tales"));
    assert!(after.contains(DEALS_FALLBACK_NOTICE));
    assert_eq!(dashboard.location().await, Location::new("Chennai"));
}

#[tokio::test]
async fn questions_use_the_last_selected_location() {
    let dashboard = mounted_dashboard().await;

    let out = walk(
        &dashboard,
        &[Location::new("Delhi")],
        &["breakfast?".to_string()],
    )
    .await
    .expect("walk");

    assert!(out.contains("you: breakfast?"));
    assert!(out.contains("assistant: Delhi has great dosa"));
    assert!(out.contains("your location in Bangalore"));
}
