//! Completion collaborator: OpenAI-compatible chat completions.

use async_trait::async_trait;
use serde_json::json;

use askdocs_core::config::CompletionConfig;
use askdocs_core::error::{Error, Result};

/// The completion collaborator behind a stable interface.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Send one user prompt and return the assistant's response text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Groq chat-completions client (OpenAI-compatible wire format).
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    config: CompletionConfig,
}

impl GroqClient {
    /// The client carries a bounded request timeout; a hung completion
    /// call surfaces as a completion error instead of stalling the loop.
    pub fn new(api_key: String, config: CompletionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Completion(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            config,
        })
    }
}

#[async_trait]
impl CompletionModel for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        tracing::debug!(%url, model = %self.config.model, "completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Completion(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Completion(format!("api returned {status}: {body}")));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Completion(format!("unreadable response: {e}")))?;
        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| Error::Completion("missing choices[0].message.content".to_string()))?
            .to_string();

        Ok(content)
    }
}
