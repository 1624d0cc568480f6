//! HTTP surface tests: requests driven straight through the assembled
//! router, checking status codes and response shapes per endpoint.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use docket_common::CaseStore;
use docketd::llm::FakeGenerator;
use docketd::manager::CaseManager;
use docketd::server::{self, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const SUMMARY: &str = "<h2>Case Summary</h2><p>A dispute.</p>";

fn app_with(responses: Vec<&str>) -> Router {
    let store = CaseStore::open_in_memory().unwrap();
    let manager = CaseManager::new(store, Arc::new(FakeGenerator::with_responses(responses)));
    server::router(Arc::new(AppState::new(manager)))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app_with(vec![]);
    let response = app.oneshot(get("/v1/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_create_case_returns_201_with_document() {
    let app = app_with(vec![SUMMARY, "High"]);
    let response = app
        .oneshot(post_json(
            "/v1/cases",
            json!({"case_text": "Breach of a supply contract.", "category": "Civil"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert!(body["case_id"].as_str().unwrap().starts_with("CASE-"));
    assert_eq!(body["priority"], "High");
    assert_eq!(body["status"], "Open");
}

#[tokio::test]
async fn test_create_case_empty_text_is_400() {
    let app = app_with(vec![]);
    let response = app
        .oneshot(post_json("/v1/cases", json!({"case_text": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_case_is_404() {
    let app = app_with(vec![]);
    let response = app
        .oneshot(get("/v1/cases/CASE-19700101-deadbeef"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_summarize_endpoint() {
    let app = app_with(vec![SUMMARY]);
    let response = app
        .clone()
        .oneshot(post_json("/v1/summarize", json!({"case_text": "A dispute."})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["summary"], SUMMARY);

    // Empty input never reaches the model.
    let response = app
        .oneshot(post_json("/v1/summarize", json!({"case_text": ""})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_summarize_model_failure_is_502() {
    let store = CaseStore::open_in_memory().unwrap();
    let manager = CaseManager::new(store, Arc::new(FakeGenerator::failing()));
    let app = server::router(Arc::new(AppState::new(manager)));

    let response = app
        .oneshot(post_json("/v1/summarize", json!({"case_text": "A dispute."})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_analyze_endpoint() {
    let app = app_with(vec![SUMMARY, "Low"]);
    let response = app
        .oneshot(post_json(
            "/v1/analyze",
            json!({"case_text": "A dispute.", "category": "Civil"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["summary"], SUMMARY);
    assert_eq!(body["predicted_priority"], "Low");
    assert_eq!(body["category"], "Civil");
}

#[tokio::test]
async fn test_stats_endpoint() {
    let app = app_with(vec![SUMMARY, "Medium"]);
    app.clone()
        .oneshot(post_json("/v1/cases", json!({"case_text": "A dispute."})))
        .await
        .unwrap();

    let response = app
        .oneshot(get("/v1/stats?time_range=all&category=all"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["total_cases"], 1);
    assert_eq!(body["priority_counts"]["Medium"], 1);
}
