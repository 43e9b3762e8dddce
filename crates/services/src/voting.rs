//! Round-scoped verification voting.
//!
//! A poll is the set of votes stamped with the complaint's current
//! `verification_round`. Casting records the vote and recomputes the tally
//! in one storage transaction; crossing a threshold applies the transition
//! through a conditional update keyed on the round, so concurrent casts
//! can never finalize twice.

use std::sync::Arc;

use domains::models::{Complaint, ComplaintFilter, VoteTally};
use domains::ports::{ComplaintRepo, UserRepo, VoteRepo};
use domains::schema::{ProcessStage, ResolutionStatus, VoteType};
use domains::{AppError, Result};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Threshold configuration for automatic finalization.
///
/// The original system never pinned these down; they are explicit,
/// configurable absolute counts here (see the `voting` config section).
#[derive(Debug, Clone, Copy)]
pub struct VotePolicy {
    /// "Resolved" votes needed to finalize the complaint.
    pub resolve_threshold: i64,
    /// "Not resolved" votes needed to reopen the work item.
    pub reopen_threshold: i64,
    /// Stage a reopened complaint returns to.
    pub reopen_stage: ProcessStage,
}

impl Default for VotePolicy {
    fn default() -> Self {
        Self {
            resolve_threshold: 3,
            reopen_threshold: 3,
            reopen_stage: ProcessStage::Assigned,
        }
    }
}

/// Tally plus the complaint's state after the cast was applied.
#[derive(Debug, Clone, Serialize)]
pub struct VoteOutcome {
    pub complaint_id: Uuid,
    pub round: i64,
    pub tally: VoteTally,
    pub status: ResolutionStatus,
    pub process: ProcessStage,
    /// The asking user's own current-round vote, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_vote: Option<VoteType>,
}

#[derive(Clone)]
pub struct VotingService {
    complaints: Arc<dyn ComplaintRepo>,
    votes: Arc<dyn VoteRepo>,
    users: Arc<dyn UserRepo>,
    policy: VotePolicy,
}

impl VotingService {
    pub fn new(
        complaints: Arc<dyn ComplaintRepo>,
        votes: Arc<dyn VoteRepo>,
        users: Arc<dyn UserRepo>,
        policy: VotePolicy,
    ) -> Self {
        Self {
            complaints,
            votes,
            users,
            policy,
        }
    }

    /// Complaints currently open for citizen verification.
    pub async fn list_pending(&self) -> Result<Vec<Complaint>> {
        self.complaints
            .list(&ComplaintFilter::with_process(
                ProcessStage::PendingVerification,
            ))
            .await
    }

    /// Records (or replaces) the user's vote for the complaint's current
    /// round, then applies the threshold transition if one was crossed.
    pub async fn cast_vote(
        &self,
        complaint_id: Uuid,
        user_id: &str,
        vote_type: &str,
    ) -> Result<VoteOutcome> {
        let vote = VoteType::parse(vote_type)?;
        let user_id = Uuid::parse_str(user_id.trim())
            .map_err(|_| AppError::InvalidUser(format!("'{user_id}' is not a valid user id")))?;
        if self.users.get(user_id).await?.is_none() {
            return Err(AppError::InvalidUser(format!(
                "user {user_id} is not registered"
            )));
        }

        let complaint = self
            .complaints
            .get(complaint_id)
            .await?
            .ok_or_else(|| AppError::not_found("complaint", complaint_id))?;
        if complaint.process != ProcessStage::PendingVerification {
            return Err(AppError::NotEligible(format!(
                "complaint {complaint_id} is not pending verification"
            )));
        }

        let round = complaint.verification_round;
        let tally = self
            .votes
            .record_vote(complaint_id, round, user_id, vote)
            .await?;

        if tally.resolved >= self.policy.resolve_threshold {
            let applied = self
                .complaints
                .finalize_round(
                    complaint_id,
                    round,
                    ResolutionStatus::Resolved,
                    ProcessStage::ComplaintSent,
                )
                .await?;
            if applied {
                info!(
                    complaint_id = %complaint_id,
                    round,
                    resolved = tally.resolved,
                    "complaint verified resolved by citizens"
                );
            }
        } else if tally.not_resolved >= self.policy.reopen_threshold {
            let applied = self
                .complaints
                .finalize_round(
                    complaint_id,
                    round,
                    ResolutionStatus::Unresolved,
                    self.policy.reopen_stage,
                )
                .await?;
            if applied {
                info!(
                    complaint_id = %complaint_id,
                    round,
                    not_resolved = tally.not_resolved,
                    reopen_stage = %self.policy.reopen_stage,
                    "complaint reopened by citizen votes"
                );
            }
        }

        let current = self
            .complaints
            .get(complaint_id)
            .await?
            .ok_or_else(|| AppError::not_found("complaint", complaint_id))?;
        Ok(VoteOutcome {
            complaint_id,
            round,
            tally,
            status: current.status,
            process: current.process,
            caller_vote: Some(vote),
        })
    }

    /// Current-round tally without casting anything. When a voter is
    /// named, their own vote for this round rides along so the voting
    /// view can pre-select it.
    pub async fn summary(&self, complaint_id: Uuid, voter: Option<Uuid>) -> Result<VoteOutcome> {
        let complaint = self
            .complaints
            .get(complaint_id)
            .await?
            .ok_or_else(|| AppError::not_found("complaint", complaint_id))?;
        let round = complaint.verification_round;
        let tally = self.votes.tally(complaint_id, round).await?;
        let caller_vote = match voter {
            Some(user_id) => self
                .votes
                .find_vote(complaint_id, round, user_id)
                .await?
                .map(|v| v.vote),
            None => None,
        };
        Ok(VoteOutcome {
            complaint_id,
            round,
            tally,
            status: complaint.status,
            process: complaint.process,
            caller_vote,
        })
    }
}
