//! Docket daemon entry point.

use anyhow::Result;
use docket_common::CaseStore;
use docketd::config::DocketConfig;
use docketd::llm::OllamaClient;
use docketd::manager::CaseManager;
use docketd::server::{self, AppState};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Docket daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = DocketConfig::load();

    let store = CaseStore::open(Path::new(&config.storage.db_path))?;
    info!("Case store opened at {}", config.storage.db_path);

    let llm = Arc::new(
        OllamaClient::new(Some(config.llm.model.clone()), config.llm.timeout_secs)
            .with_keep_alive(&config.llm.keep_alive),
    );
    if !llm.is_available().await {
        info!("LLM backend not reachable yet; AI endpoints will fail until it is");
    }

    let manager = CaseManager::new(store, llm);
    let state = AppState::new(manager);

    server::run(state, &config.server.bind_addr).await
}
