//! Admin token gate for the `/admin` subtree.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use domains::AppError;

use crate::error::ApiError;
use crate::state::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

pub async fn require_admin_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !state.admin.verify(presented) {
        return Err(AppError::Unauthorized("invalid or missing admin token".into()).into());
    }
    Ok(next.run(request).await)
}
