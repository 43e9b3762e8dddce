//! Registration and login.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use services::RegisterUser;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub aadhar_number: String,
    pub email: String,
    /// The original mobile client sent this field as `phnumber`.
    #[serde(alias = "phnumber")]
    pub phone: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_id = state
        .users
        .register(RegisterUser {
            first_name: request.first_name,
            last_name: request.last_name,
            age: request.age,
            aadhar_number: request.aadhar_number,
            email: request.email,
            phone: request.phone,
            password: request.password,
        })
        .await?;
    Ok(Json(json!({ "user_id": user_id })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_id = state.users.login(&request.email, &request.password).await?;
    Ok(Json(json!({ "user_id": user_id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_accepts_legacy_phone_field() {
        let request: RegisterRequest = serde_json::from_value(json!({
            "first_name": "Meena",
            "last_name": "R",
            "age": 28,
            "aadhar_number": "123456789012",
            "email": "meena@example.com",
            "phnumber": "7777777777",
            "password": "hunter2hunter2",
        }))
        .unwrap();
        assert_eq!(request.phone, "7777777777");
    }
}
