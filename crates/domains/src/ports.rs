//! # Port traits
//!
//! Contracts the adapter crates implement. Any storage or upstream plugin
//! must implement these to be wired into the binary.

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    AssistRequest, AssistSuggestion, Complaint, ComplaintFilter, User, Vote, VoteTally,
};
use crate::schema::{Department, Priority, ProcessStage, ResolutionStatus, VoteType};

/// Persistence contract for complaints and their lifecycle fields.
///
/// The setters are single-field, last-write-wins updates; each returns the
/// updated record, or `None` when the complaint does not exist. `set_process`
/// must bump `verification_round` atomically when the new stage enters
/// `pending_verification` from any other stage, never read-modify-write.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ComplaintRepo: Send + Sync {
    async fn insert(&self, complaint: &Complaint) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Complaint>>;
    async fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>>;

    async fn set_department(&self, id: Uuid, department: Department)
        -> Result<Option<Complaint>>;
    async fn set_priority(&self, id: Uuid, priority: Priority) -> Result<Option<Complaint>>;
    async fn set_process(&self, id: Uuid, process: ProcessStage) -> Result<Option<Complaint>>;

    /// Applies a threshold-triggered transition for the given round.
    ///
    /// Conditional on the complaint still being in `pending_verification`
    /// with that exact round, so two racing casts can never apply it twice.
    /// Returns whether the transition was applied; a lost race is `false`,
    /// not an error.
    async fn finalize_round(
        &self,
        id: Uuid,
        round: i64,
        status: ResolutionStatus,
        process: ProcessStage,
    ) -> Result<bool>;

    /// Returns whether a record was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Persistence contract for verification votes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VoteRepo: Send + Sync {
    /// Upserts the user's vote for the given round and returns the
    /// recomputed tally for that round. Write and recount happen in one
    /// storage transaction; the tally is never an in-memory counter.
    async fn record_vote(
        &self,
        complaint_id: Uuid,
        round: i64,
        user_id: Uuid,
        vote: VoteType,
    ) -> Result<VoteTally>;

    async fn tally(&self, complaint_id: Uuid, round: i64) -> Result<VoteTally>;

    async fn find_vote(
        &self,
        complaint_id: Uuid,
        round: i64,
        user_id: Uuid,
    ) -> Result<Option<Vote>>;
}

/// Persistence contract for registered citizens.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `Conflict` when the aadhaar number or email is taken.
    async fn insert(&self, user: &User) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn exists(&self, aadhar_number: &str, email: &str) -> Result<bool>;
}

/// Media storage contract for complaint photos.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Saves raw bytes and returns a media reference for the complaint.
    async fn save_upload(&self, data: Bytes, content_type: &str) -> Result<String>;
    /// Public URL or path for a stored reference.
    fn url(&self, media_ref: &str) -> String;
}

/// Password hashing contract; kept behind a port so the service layer
/// never depends on a concrete KDF.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// External AI-assist collaborator. Pure pass-through; failures surface
/// as `Upstream` so callers can degrade instead of erroring.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AssistProvider: Send + Sync {
    async fn suggest(&self, request: &AssistRequest) -> Result<AssistSuggestion>;
}

/// External speech-to-text collaborator.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Bytes, content_type: &str) -> Result<String>;
}
