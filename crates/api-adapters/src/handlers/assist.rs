//! AI-assist endpoint backing the submission form's autofill button.

use axum::extract::{Multipart, State};
use axum::Json;
use domains::models::{AssistRequest, AssistSuggestion};
use domains::AppError;

use crate::error::ApiError;
use crate::state::AppState;

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> ApiError {
    AppError::Validation(format!("malformed multipart body: {err}")).into()
}

pub async fn suggest(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AssistSuggestion>, ApiError> {
    let mut request = AssistRequest::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "title" => request.title = Some(field.text().await.map_err(bad_multipart)?),
            "description" => {
                request.description = Some(field.text().await.map_err(bad_multipart)?)
            }
            "image" => {
                let data = field.bytes().await.map_err(bad_multipart)?;
                if !data.is_empty() {
                    request.image = Some(data);
                }
            }
            _ => {}
        }
    }
    Ok(Json(state.assist.suggest(request).await?))
}
