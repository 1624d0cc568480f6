//! Text generation client.
//!
//! The model handle is an injected capability: components that need
//! text generation take a [`TextGenerator`], so summarizer/classifier
//! failures are simulatable in tests via [`FakeGenerator`] and the
//! daemon carries no global model state.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

const OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_MODEL: &str = "qwen2.5:7b-instruct";

/// Default keep_alive - model stays loaded for 5 minutes after last request
const DEFAULT_KEEP_ALIVE: &str = "5m";

/// Single-shot, stateless text generation: prompt in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Ollama-backed generator.
pub struct OllamaClient {
    http_client: reqwest::Client,
    model: String,
    /// How long the model stays loaded after a request (e.g., "5m", "0").
    keep_alive: String,
}

impl OllamaClient {
    pub fn new(model: Option<String>, timeout_secs: u64) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            keep_alive: DEFAULT_KEEP_ALIVE.to_string(),
        }
    }

    pub fn with_keep_alive(mut self, keep_alive: &str) -> Self {
        self.keep_alive = keep_alive.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check whether the Ollama backend is reachable.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", OLLAMA_URL);
        self.http_client
            .get(&url)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", OLLAMA_URL);

        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "keep_alive": self.keep_alive,
        });

        info!(
            "[>]  LLM CALL [{}] prompt: {} chars",
            self.model,
            prompt.len()
        );

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Ollama")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Ollama returned error {}: {}", status, error_text));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        let text = json
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or("")
            .to_string();

        info!("[<]  LLM RESPONSE: {} chars", text.len());
        Ok(text)
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(None, 120)
    }
}

/// Scripted generator for tests: hands out queued responses in order,
/// or fails every call.
pub struct FakeGenerator {
    responses: Mutex<VecDeque<String>>,
    fail: bool,
}

impl FakeGenerator {
    /// Generator that answers with the given responses, in order.
    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            fail: false,
        }
    }

    /// Generator whose every call fails.
    pub fn failing() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        if self.fail {
            return Err(anyhow!("fake generator: forced failure"));
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("fake generator: no scripted response left"))
    }
}
