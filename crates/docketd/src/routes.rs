//! API routes for docketd.
//!
//! One handler per case-manager operation; each returns a success
//! payload or a (status, message) pair the manager's error taxonomy
//! maps onto.

use crate::manager::{
    CaseAnalysis, CompleteCase, CompleteHearing, NewCase, NewHistoryEntry, NewJudgeNote,
    ScheduleHearing, StatusUpdate,
};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use docket_common::{Case, CaseKey, CaseStats, DocketError, HistoryEntry, TimeRange};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

type AppStateArc = Arc<AppState>;

fn error_response(e: DocketError) -> (StatusCode, String) {
    let status =
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, e.to_string())
}

// ============================================================================
// Case Routes
// ============================================================================

pub fn case_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/cases", post(create_case).get(list_cases))
        .route("/v1/cases/:case_id", get(get_case))
        .route("/v1/cases/:case_id/status", put(update_status))
        .route("/v1/cases/:case_id/hearings", post(schedule_hearing))
        .route(
            "/v1/cases/:case_id/hearings/:hearing_id/complete",
            post(complete_hearing),
        )
        .route("/v1/cases/:case_id/notes", post(add_judge_note))
        .route(
            "/v1/cases/:case_id/history",
            post(add_history).get(get_history),
        )
        .route("/v1/cases/:case_id/complete", post(complete_case))
}

async fn create_case(
    State(state): State<AppStateArc>,
    Json(req): Json<NewCase>,
) -> Result<(StatusCode, Json<Case>), (StatusCode, String)> {
    let case = state.manager.create(req).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(case)))
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ListParams {
    priority: Option<String>,
    status: Option<String>,
}

async fn list_cases(
    State(state): State<AppStateArc>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Case>>, (StatusCode, String)> {
    let cases = state
        .manager
        .list(params.priority.as_deref(), params.status.as_deref())
        .map_err(error_response)?;
    Ok(Json(cases))
}

async fn get_case(
    State(state): State<AppStateArc>,
    Path(key): Path<String>,
) -> Result<Json<Case>, (StatusCode, String)> {
    let case = state
        .manager
        .get(&CaseKey::parse(&key))
        .map_err(error_response)?;
    Ok(Json(case))
}

#[derive(Debug, Clone, Serialize)]
struct MessageResponse {
    message: String,
}

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

async fn update_status(
    State(state): State<AppStateArc>,
    Path(case_id): Path<String>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    state
        .manager
        .update_status(&case_id, req)
        .map_err(error_response)?;
    Ok(message("Case status updated successfully"))
}

#[derive(Debug, Clone, Serialize)]
struct HearingScheduledResponse {
    message: String,
    hearing_id: Uuid,
}

async fn schedule_hearing(
    State(state): State<AppStateArc>,
    Path(case_id): Path<String>,
    Json(req): Json<ScheduleHearing>,
) -> Result<Json<HearingScheduledResponse>, (StatusCode, String)> {
    let hearing_id = state
        .manager
        .schedule_hearing(&case_id, req)
        .map_err(error_response)?;
    Ok(Json(HearingScheduledResponse {
        message: "Hearing scheduled successfully".to_string(),
        hearing_id,
    }))
}

async fn complete_hearing(
    State(state): State<AppStateArc>,
    Path((case_id, hearing_id)): Path<(String, String)>,
    Json(req): Json<CompleteHearing>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let hearing_id = Uuid::parse_str(&hearing_id).map_err(|_| {
        error_response(DocketError::Validation(format!(
            "Invalid hearing id: {}",
            hearing_id
        )))
    })?;
    state
        .manager
        .complete_hearing(&case_id, hearing_id, req)
        .map_err(error_response)?;
    Ok(message("Hearing completed successfully"))
}

async fn add_judge_note(
    State(state): State<AppStateArc>,
    Path(case_id): Path<String>,
    Json(req): Json<NewJudgeNote>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    state
        .manager
        .add_judge_note(&case_id, req)
        .map_err(error_response)?;
    Ok(message("Judge notes added successfully"))
}

async fn add_history(
    State(state): State<AppStateArc>,
    Path(case_id): Path<String>,
    Json(req): Json<NewHistoryEntry>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    state
        .manager
        .add_history(&case_id, req)
        .map_err(error_response)?;
    Ok(message("History updated successfully"))
}

async fn get_history(
    State(state): State<AppStateArc>,
    Path(case_id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, (StatusCode, String)> {
    let history = state.manager.history(&case_id).map_err(error_response)?;
    Ok(Json(history))
}

async fn complete_case(
    State(state): State<AppStateArc>,
    Path(case_id): Path<String>,
    Json(req): Json<CompleteCase>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    state
        .manager
        .complete(&case_id, req)
        .map_err(error_response)?;
    Ok(message("Case completed successfully"))
}

// ============================================================================
// Analysis Routes
// ============================================================================

pub fn analysis_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/summarize", post(summarize))
        .route("/v1/analyze", post(analyze))
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SummarizeRequest {
    #[serde(default)]
    case_text: String,
}

#[derive(Debug, Clone, Serialize)]
struct SummaryResponse {
    summary: String,
}

async fn summarize(
    State(state): State<AppStateArc>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<SummaryResponse>, (StatusCode, String)> {
    let summary = state
        .manager
        .summarize(&req.case_text)
        .await
        .map_err(error_response)?;
    Ok(Json(SummaryResponse { summary }))
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    case_text: String,
    #[serde(default)]
    category: String,
}

async fn analyze(
    State(state): State<AppStateArc>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<CaseAnalysis>, (StatusCode, String)> {
    let analysis = state
        .manager
        .analyze(&req.case_text, &req.category)
        .await
        .map_err(error_response)?;
    Ok(Json(analysis))
}

// ============================================================================
// Stats Routes
// ============================================================================

pub fn stats_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/stats", get(get_stats))
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StatsParams {
    time_range: Option<String>,
    category: Option<String>,
}

async fn get_stats(
    State(state): State<AppStateArc>,
    Query(params): Query<StatsParams>,
) -> Result<Json<CaseStats>, (StatusCode, String)> {
    let time_range = TimeRange::from_param(params.time_range.as_deref().unwrap_or("all"));
    let category = params.category.as_deref().unwrap_or("all");
    let stats = state
        .manager
        .stats(time_range, category)
        .map_err(error_response)?;
    Ok(Json(stats))
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_seconds: u64,
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
