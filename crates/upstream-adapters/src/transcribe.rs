//! Speech-to-text client: upload, submit, poll.

use std::time::Duration;

use bytes::Bytes;
use domains::ports::Transcriber;
use domains::{AppError, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

pub struct HttpTranscriber {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    poll_interval: Duration,
    max_polls: u32,
}

impl HttpTranscriber {
    pub fn new(
        base_url: String,
        api_key: SecretString,
        poll_interval: Duration,
        max_polls: u32,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            poll_interval,
            max_polls,
        }
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Deserialize)]
struct TranscriptStatus {
    status: String,
    text: Option<String>,
    error: Option<String>,
}

fn upstream(context: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Upstream(format!("{context}: {err}"))
}

#[async_trait::async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: Bytes, content_type: &str) -> Result<String> {
        let upload: UploadResponse = self
            .client
            .post(format!("{}/upload", self.base_url))
            .header("authorization", self.api_key.expose_secret())
            .header("content-type", content_type.to_string())
            .body(audio)
            .send()
            .await
            .map_err(|e| upstream("audio upload failed", e))?
            .error_for_status()
            .map_err(|e| upstream("audio upload rejected", e))?
            .json()
            .await
            .map_err(|e| upstream("upload response was not valid json", e))?;

        let submitted: SubmitResponse = self
            .client
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", self.api_key.expose_secret())
            .json(&json!({ "audio_url": upload.upload_url }))
            .send()
            .await
            .map_err(|e| upstream("transcript submission failed", e))?
            .error_for_status()
            .map_err(|e| upstream("transcript submission rejected", e))?
            .json()
            .await
            .map_err(|e| upstream("submit response was not valid json", e))?;
        debug!(transcript_id = %submitted.id, "transcription submitted");

        for _ in 0..self.max_polls {
            let status: TranscriptStatus = self
                .client
                .get(format!("{}/transcript/{}", self.base_url, submitted.id))
                .header("authorization", self.api_key.expose_secret())
                .send()
                .await
                .map_err(|e| upstream("transcript poll failed", e))?
                .error_for_status()
                .map_err(|e| upstream("transcript poll rejected", e))?
                .json()
                .await
                .map_err(|e| upstream("poll response was not valid json", e))?;

            match status.status.as_str() {
                "completed" => {
                    return Ok(status.text.unwrap_or_default());
                }
                "error" => {
                    let reason = status.error.unwrap_or_else(|| "unknown".to_string());
                    return Err(AppError::Upstream(format!("transcription failed: {reason}")));
                }
                // queued and processing fall through to the next poll
                _ => tokio::time::sleep(self.poll_interval).await,
            }
        }
        Err(AppError::Upstream("transcription timed out".into()))
    }
}
