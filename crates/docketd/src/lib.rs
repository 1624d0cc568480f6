//! Docket daemon: REST backend for tracking legal case records.
//!
//! Case documents live in a sqlite store; summarization and priority
//! prediction go through an injected text-generation client.

pub mod analysis;
pub mod config;
pub mod llm;
pub mod manager;
pub mod routes;
pub mod server;

pub use config::DocketConfig;
pub use llm::{FakeGenerator, OllamaClient, TextGenerator};
pub use manager::CaseManager;
pub use server::AppState;
