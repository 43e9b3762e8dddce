//! Citizen verification voting endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use domains::models::Complaint;
use domains::AppError;
use serde::Deserialize;
use serde_json::Value;
use services::VoteOutcome;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// The voting view historically sent `user_id` as either a JSON string or
/// a bare number; both are accepted and stringified before validation.
#[derive(Deserialize)]
pub struct VoteRequest {
    pub user_id: Option<Value>,
    pub vote_type: String,
}

fn stringify_user_id(raw: Option<&Value>) -> Result<String, ApiError> {
    match raw {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) | None => {
            Err(AppError::InvalidUser("user_id is required to vote".into()).into())
        }
    }
}

pub async fn cast(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<VoteOutcome>, ApiError> {
    let user_id = stringify_user_id(request.user_id.as_ref())?;
    let outcome = state
        .voting
        .cast_vote(id, &user_id, &request.vote_type)
        .await?;
    Ok(Json(outcome))
}

pub async fn pending(State(state): State<AppState>) -> Result<Json<Vec<Complaint>>, ApiError> {
    Ok(Json(state.voting.list_pending().await?))
}

/// Optional `?user_id=` lets the voting view learn the caller's own
/// current-round vote along with the tally.
#[derive(Deserialize, Default)]
pub struct SummaryQuery {
    pub user_id: Option<Uuid>,
}

pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<VoteOutcome>, ApiError> {
    Ok(Json(state.voting.summary(id, query.user_id).await?))
}
