//! # AppError
//!
//! Centralized error handling for the Civic Guardian ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Complaint, User)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., bad enum value, out-of-range coordinates)
    #[error("validation error: {0}")]
    Validation(String),

    /// Action attempted against a complaint not in the required process stage
    #[error("not eligible: {0}")]
    NotEligible(String),

    /// Vote cast with a missing, malformed, or unregistered user id
    #[error("invalid user: {0}")]
    InvalidUser(String),

    /// Security/Auth failure (bad credentials, missing admin token)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource already exists (e.g., duplicate aadhaar or email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Failure reported by an external collaborator (AI assist, speech API)
    #[error("upstream service error: {0}")]
    Upstream(String),

    /// Infrastructure failure (e.g., DB down, filesystem error)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(entity.to_string(), id.to_string())
    }
}

/// A specialized Result type for Civic Guardian logic.
pub type Result<T> = std::result::Result<T, AppError>;
