//! AI-assist pass-through with a deterministic fallback.
//!
//! The value lives entirely in the upstream model; this service only
//! guarantees that an upstream failure degrades to a usable suggestion
//! instead of failing the submission form.

use std::sync::Arc;

use domains::models::{AssistRequest, AssistSuggestion};
use domains::ports::AssistProvider;
use domains::{AppError, Result};
use tracing::warn;

#[derive(Clone)]
pub struct AssistService {
    provider: Arc<dyn AssistProvider>,
}

impl AssistService {
    pub fn new(provider: Arc<dyn AssistProvider>) -> Self {
        Self { provider }
    }

    pub async fn suggest(&self, request: AssistRequest) -> Result<AssistSuggestion> {
        match self.provider.suggest(&request).await {
            Ok(suggestion) => Ok(suggestion),
            Err(AppError::Upstream(reason)) => {
                warn!(%reason, "assist upstream failed, serving fallback");
                Ok(fallback(&request))
            }
            Err(other) => Err(other),
        }
    }
}

/// Suggestion built purely from the caller's own hints.
fn fallback(request: &AssistRequest) -> AssistSuggestion {
    let base = request
        .description
        .clone()
        .filter(|text| !text.trim().is_empty())
        .or_else(|| {
            request
                .title
                .clone()
                .filter(|text| !text.trim().is_empty())
        })
        .unwrap_or_else(|| {
            "This issue requires municipal attention and timely intervention.".to_string()
        });
    AssistSuggestion {
        inferred_title: request
            .title
            .clone()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| "Issue Report".to_string()),
        description: base.clone(),
        descriptions: (1..=4).map(|i| format!("{base} (Alt {i})")).collect(),
        suggested_category: "general".to_string(),
        suggested_department: "unassigned".to_string(),
        tags: vec!["general".to_string()],
    }
}
