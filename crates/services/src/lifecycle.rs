//! Lifecycle state machine for admin-driven field transitions.
//!
//! `department`, `priority` and `process` only change through the setters
//! here, which re-validate the value against the shared schema even though
//! the HTTP layer validated it once already; the admin UI and the voting
//! UI are separate callers.

use std::sync::Arc;

use domains::models::{Complaint, ComplaintFilter};
use domains::ports::ComplaintRepo;
use domains::schema::{Department, Priority, ProcessStage};
use domains::{AppError, Result};
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct LifecycleService {
    repo: Arc<dyn ComplaintRepo>,
}

impl LifecycleService {
    pub fn new(repo: Arc<dyn ComplaintRepo>) -> Self {
        Self { repo }
    }

    /// Routes the complaint to a department. Never touches `status`.
    pub async fn set_department(&self, id: Uuid, value: &str) -> Result<Complaint> {
        let department = Department::parse(value)?;
        self.repo
            .set_department(id, department)
            .await?
            .ok_or_else(|| AppError::not_found("complaint", id))
    }

    pub async fn set_urgency(&self, id: Uuid, value: &str) -> Result<Complaint> {
        let priority = Priority::parse(value)?;
        self.repo
            .set_priority(id, priority)
            .await?
            .ok_or_else(|| AppError::not_found("complaint", id))
    }

    /// Moves the complaint to a new process stage.
    ///
    /// Entering `pending_verification` opens a fresh voting round (the
    /// repository bumps `verification_round` in the same update), which is
    /// what invalidates any votes from earlier rounds. Leaving it closes
    /// the poll without resolving `status`.
    pub async fn set_process(&self, id: Uuid, value: &str) -> Result<Complaint> {
        let process = ProcessStage::parse(value)?;
        let updated = self
            .repo
            .set_process(id, process)
            .await?
            .ok_or_else(|| AppError::not_found("complaint", id))?;
        if updated.process == ProcessStage::PendingVerification {
            info!(
                complaint_id = %id,
                round = updated.verification_round,
                "verification poll open"
            );
        }
        Ok(updated)
    }

    pub async fn get_complaint(&self, id: Uuid) -> Result<Complaint> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("complaint", id))
    }

    pub async fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>> {
        self.repo.list(filter).await
    }
}
