//! Chat-completion client for the assist suggestions.

use domains::models::{AssistRequest, AssistSuggestion};
use domains::ports::AssistProvider;
use domains::{AppError, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You draft municipal complaint reports. Respond with a single JSON \
object with keys: inferred_title (string), description (string), descriptions (array of 4 \
alternative strings), suggested_category (string), suggested_department (string), tags (array \
of strings). No prose outside the JSON.";

pub struct HttpAssistProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
}

impl HttpAssistProvider {
    pub fn new(base_url: String, api_key: Option<SecretString>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    fn user_prompt(request: &AssistRequest) -> String {
        let mut parts = Vec::new();
        if let Some(title) = request.title.as_deref().filter(|t| !t.trim().is_empty()) {
            parts.push(format!("Title hint: {title}"));
        }
        if let Some(description) = request
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            parts.push(format!("Description hint: {description}"));
        }
        if parts.is_empty() {
            parts.push("No hints were provided; draft a generic civic issue report.".to_string());
        }
        parts.join("\n")
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

fn upstream(context: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Upstream(format!("{context}: {err}"))
}

#[async_trait::async_trait]
impl AssistProvider for HttpAssistProvider {
    async fn suggest(&self, request: &AssistRequest) -> Result<AssistSuggestion> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AppError::Upstream("assist api key not configured".into()))?;

        let body = json!({
            "model": self.model,
            "temperature": 0.4,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::user_prompt(request) },
            ],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| upstream("assist request failed", e))?
            .error_for_status()
            .map_err(|e| upstream("assist returned error status", e))?;

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| upstream("assist response was not valid json", e))?;
        let content = chat
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| AppError::Upstream("assist response had no choices".into()))?;
        debug!(bytes = content.len(), "assist suggestion received");

        serde_json::from_str(content)
            .map_err(|e| upstream("assist suggestion did not match the expected shape", e))
    }
}
