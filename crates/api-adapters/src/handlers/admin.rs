//! Admin dashboard endpoints. Everything here sits behind the
//! `X-ADMIN-TOKEN` middleware.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use domains::models::{Complaint, ComplaintFilter};
use domains::schema::{Department, ProcessStage, ResolutionStatus};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DepartmentUpdate {
    pub department: String,
}

#[derive(Deserialize)]
pub struct UrgencyUpdate {
    pub urgency: String,
}

#[derive(Deserialize)]
pub struct ProcessUpdate {
    pub process: String,
}

/// Listing filters as the dashboard sends them, all optional.
#[derive(Deserialize, Default)]
pub struct AdminListQuery {
    pub department: Option<String>,
    pub process: Option<String>,
    pub status: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl AdminListQuery {
    fn into_filter(self) -> Result<ComplaintFilter, ApiError> {
        Ok(ComplaintFilter {
            department: self
                .department
                .as_deref()
                .map(Department::parse)
                .transpose()?,
            process: self
                .process
                .as_deref()
                .map(ProcessStage::parse)
                .transpose()?,
            status: self
                .status
                .as_deref()
                .map(ResolutionStatus::parse)
                .transpose()?,
            created_from: self.created_from,
            created_to: self.created_to,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<Vec<Complaint>>, ApiError> {
    let filter = query.into_filter()?;
    Ok(Json(state.lifecycle.list(&filter).await?))
}

pub async fn get_complaint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Complaint>, ApiError> {
    Ok(Json(state.lifecycle.get_complaint(id).await?))
}

pub async fn set_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<DepartmentUpdate>,
) -> Result<Json<Complaint>, ApiError> {
    Ok(Json(
        state.lifecycle.set_department(id, &update.department).await?,
    ))
}

pub async fn set_urgency(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<UrgencyUpdate>,
) -> Result<Json<Complaint>, ApiError> {
    Ok(Json(state.lifecycle.set_urgency(id, &update.urgency).await?))
}

pub async fn set_process(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ProcessUpdate>,
) -> Result<Json<Complaint>, ApiError> {
    Ok(Json(state.lifecycle.set_process(id, &update.process).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.complaints.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
