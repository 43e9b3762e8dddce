//! Public complaint endpoints: multipart intake and listings.

use axum::extract::{Multipart, State};
use axum::Json;
use domains::models::Complaint;
use domains::AppError;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> ApiError {
    AppError::Validation(format!("malformed multipart body: {err}")).into()
}

fn parse_coord(name: &str, raw: &str) -> Result<Option<f64>, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("{name} '{raw}' is not a number")).into())
}

/// The submission form posts multipart/form-data; text fields arrive as
/// strings and the photo, when attached, under `image`.
pub async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut submission = services::ComplaintSubmission::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "image" => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(bad_multipart)?;
                if !data.is_empty() {
                    submission.image = Some((data, content_type));
                }
            }
            "title" => submission.title = field.text().await.map_err(bad_multipart)?,
            "description" => submission.description = field.text().await.map_err(bad_multipart)?,
            "category" => submission.category = Some(field.text().await.map_err(bad_multipart)?),
            "department" => submission.department = field.text().await.map_err(bad_multipart)?,
            "latitude" => {
                let raw = field.text().await.map_err(bad_multipart)?;
                submission.latitude = parse_coord("latitude", &raw)?;
            }
            "longitude" => {
                let raw = field.text().await.map_err(bad_multipart)?;
                submission.longitude = parse_coord("longitude", &raw)?;
            }
            "locationName" | "location_name" => {
                submission.location_name = field.text().await.map_err(bad_multipart)?
            }
            "user_id" => {
                submission.reporter_id = Some(field.text().await.map_err(bad_multipart)?)
            }
            // unknown fields are ignored, the form has evolved before
            _ => {}
        }
    }

    let complaint = state.complaints.create(submission).await?;
    let image_url = complaint
        .image_ref
        .as_deref()
        .map(|media_ref| state.complaints.image_url(media_ref));
    Ok(Json(json!({
        "id": complaint.id,
        "image_url": image_url,
    })))
}

pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Complaint>>, ApiError> {
    Ok(Json(state.complaints.list_all().await?))
}

pub async fn list_resolved(
    State(state): State<AppState>,
) -> Result<Json<Vec<Complaint>>, ApiError> {
    Ok(Json(state.complaints.list_resolved().await?))
}
