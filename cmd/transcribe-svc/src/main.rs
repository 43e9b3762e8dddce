//! Standalone audio-transcription proxy.
//!
//! Accepts a multipart upload from the submission form, forwards it to
//! the upstream speech API and returns the finished transcript.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use domains::ports::Transcriber;
use domains::AppError;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use upstream_adapters::HttpTranscriber;

#[derive(Clone)]
struct SvcState {
    transcriber: Arc<dyn Transcriber>,
}

struct SvcError(AppError);

impl From<AppError> for SvcError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for SvcError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

async fn transcribe(
    State(state): State<SvcState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, SvcError> {
    let mut audio = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("audio") {
            let content_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?;
            audio = Some((data, content_type));
        }
    }
    let (data, content_type) =
        audio.ok_or_else(|| AppError::Validation("an 'audio' field is required".into()))?;

    let transcript = state.transcriber.transcribe(data, &content_type).await?;
    Ok(Json(json!({ "transcript": transcript })))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = configs::AppConfig::load().context("loading configuration")?;
    let api_key = config
        .transcribe
        .api_key
        .clone()
        .context("transcribe.api_key (CIVIC__TRANSCRIBE__API_KEY) is required")?;
    let transcriber = Arc::new(HttpTranscriber::new(
        config.transcribe.base_url.clone(),
        api_key,
        Duration::from_millis(config.transcribe.poll_interval_ms),
        config.transcribe.max_polls,
    ));

    let app = Router::new()
        .route("/api/transcribe", post(transcribe))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(SvcState { transcriber });

    let listener = tokio::net::TcpListener::bind(&config.transcribe.bind)
        .await
        .with_context(|| format!("binding {}", config.transcribe.bind))?;
    info!(bind = %config.transcribe.bind, "transcription proxy listening");
    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
