use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use serde_json::Value;

use crate::config::AdviceConfig;
use crate::models::entry::EntryInput;

/// Stored in place of a recommendation whenever the agent is off or fails.
pub const NO_ADVICE: &str = "No advice could be generated.";

/// Produces a recommendation for a submitted entry. Never fails: every
/// problem resolves to [`NO_ADVICE`].
pub trait AdviceSource {
    fn generate(&self, input: &EntryInput) -> impl Future<Output = String> + Send;
}

/// Mistral agents client, built once at startup and shared through `AppState`.
#[derive(Clone)]
pub struct AdviceClient {
    http: reqwest::Client,
    config: AdviceConfig,
}

impl AdviceClient {
    pub fn new(config: AdviceConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .context("Failed to build advice HTTP client")?;
        Ok(Self { http, config })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    async fn request_advice(&self, agent_id: &str, input: &EntryInput) -> anyhow::Result<String> {
        let payload = serde_json::to_string(input)?;

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({
                "agent_id": agent_id,
                "messages": [{
                    "role": "user",
                    "content": payload,
                }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Advice agent error {}: {}", status, body);
        }

        let body: Value = response.json().await?;
        extract_content(&body).context("Advice agent returned no content")
    }
}

impl AdviceSource for AdviceClient {
    async fn generate(&self, input: &EntryInput) -> String {
        let Some(agent_id) = self.config.agent_id.as_deref().filter(|_| self.is_enabled()) else {
            return NO_ADVICE.to_string();
        };

        match self.request_advice(agent_id, input).await {
            Ok(advice) => advice,
            Err(e) => {
                tracing::warn!(error = %e, "Advice agent unavailable, storing placeholder");
                NO_ADVICE.to_string()
            }
        }
    }
}

/// Pull the first choice's text out of a chat completion body. The content
/// is either a plain string or a list of typed chunks.
fn extract_content(body: &Value) -> Option<String> {
    let content = body.get("choices")?.get(0)?.get("message")?.get("content")?;
    let text = match content {
        Value::String(s) => s.clone(),
        Value::Array(chunks) => chunks
            .iter()
            .filter_map(|c| c.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(""),
        _ => return None,
    };
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
