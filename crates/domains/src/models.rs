//! # Domain Models
//!
//! These structs represent the core entities of Civic Guardian.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::schema::{Category, Department, Priority, ProcessStage, ResolutionStatus, VoteType};

/// Geographic point with the validity ranges enforced at construction:
/// latitude in [-90, 90], longitude in [-180, 180).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::Validation(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !(-180.0..180.0).contains(&longitude) {
            return Err(AppError::Validation(format!(
                "longitude {longitude} outside [-180, 180)"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A citizen-submitted civic issue report with location, classification,
/// and lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: Uuid,
    /// Submitting user, by reference. Deleting a user never cascades here.
    pub reporter_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub department: Department,
    pub priority: Priority,
    pub process: ProcessStage,
    pub status: ResolutionStatus,
    pub location: GeoPoint,
    pub location_name: String,
    /// Reference into the media store; set at creation.
    pub image_ref: Option<String>,
    /// Incremented each time `process` enters `pending_verification`.
    /// Votes are stamped with this, which is what invalidates stale rounds.
    pub verification_round: i64,
    pub created_at: DateTime<Utc>,
}

/// One citizen's verdict for one verification round of one complaint.
/// At most one row exists per (complaint, user, round); a re-vote replaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub complaint_id: Uuid,
    pub user_id: Uuid,
    pub round: i64,
    pub vote: VoteType,
    pub cast_at: DateTime<Utc>,
}

/// Current-round vote counts for a complaint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct VoteTally {
    pub resolved: i64,
    pub not_resolved: i64,
}

impl VoteTally {
    pub fn total(&self) -> i64 {
        self.resolved + self.not_resolved
    }
}

// The voting view wants the total without summing client-side.
impl Serialize for VoteTally {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("VoteTally", 3)?;
        state.serialize_field("resolved", &self.resolved)?;
        state.serialize_field("not_resolved", &self.not_resolved)?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

/// Registered citizen identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub aadhar_number: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Optional listing criteria; all `None` means "everything".
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplaintFilter {
    pub department: Option<Department>,
    pub process: Option<ProcessStage>,
    pub status: Option<ResolutionStatus>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl ComplaintFilter {
    pub fn with_process(process: ProcessStage) -> Self {
        Self {
            process: Some(process),
            ..Self::default()
        }
    }

    pub fn with_status(status: ResolutionStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Hints forwarded to the AI-assist collaborator.
#[derive(Debug, Clone, Default)]
pub struct AssistRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<bytes::Bytes>,
}

/// Suggestion returned by the AI-assist collaborator (or the local
/// fallback when the upstream is unavailable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistSuggestion {
    pub inferred_title: String,
    pub description: String,
    pub descriptions: Vec<String>,
    pub suggested_category: String,
    pub suggested_department: String,
    pub tags: Vec<String>,
}
