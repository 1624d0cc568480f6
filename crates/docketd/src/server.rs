//! HTTP server for docketd.

use crate::manager::CaseManager;
use crate::routes;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
pub struct AppState {
    pub manager: CaseManager,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(manager: CaseManager) -> Self {
        Self {
            manager,
            start_time: Instant::now(),
        }
    }
}

/// Assemble the full application router over the shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::case_routes())
        .merge(routes::analysis_routes())
        .merge(routes::stats_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server.
pub async fn run(state: AppState, bind_addr: &str) -> Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("  Listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
