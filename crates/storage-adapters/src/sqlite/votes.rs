//! SQLite implementation of `VoteRepo`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::models::{Vote, VoteTally};
use domains::ports::VoteRepo;
use domains::schema::VoteType;
use domains::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{corrupt, db_err, uuid_to_blob, CivicDb};

pub struct SqliteVoteRepo {
    db: CivicDb,
}

impl SqliteVoteRepo {
    pub fn new(db: CivicDb) -> Self {
        Self { db }
    }
}

fn fold_tally(rows: &[SqliteRow]) -> Result<VoteTally> {
    let mut tally = VoteTally::default();
    for row in rows {
        let vote_type: String = row.try_get("vote_type").map_err(db_err)?;
        let count: i64 = row.try_get("n").map_err(db_err)?;
        match VoteType::parse(&vote_type).map_err(|e| corrupt("vote_type", e))? {
            VoteType::Resolved => tally.resolved = count,
            VoteType::NotResolved => tally.not_resolved = count,
        }
    }
    Ok(tally)
}

const TALLY_SQL: &str =
    "SELECT vote_type, COUNT(*) AS n FROM votes WHERE complaint_id = ? AND round = ? \
     GROUP BY vote_type";

#[async_trait]
impl VoteRepo for SqliteVoteRepo {
    async fn record_vote(
        &self,
        complaint_id: Uuid,
        round: i64,
        user_id: Uuid,
        vote: VoteType,
    ) -> Result<VoteTally> {
        // Upsert and recount inside one transaction so the returned tally
        // always includes this vote.
        let mut tx = self.db.pool().begin().await.map_err(db_err)?;
        sqlx::query(
            "INSERT INTO votes (complaint_id, user_id, round, vote_type, cast_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(complaint_id, user_id, round) \
             DO UPDATE SET vote_type = excluded.vote_type, cast_at = excluded.cast_at",
        )
        .bind(uuid_to_blob(complaint_id))
        .bind(uuid_to_blob(user_id))
        .bind(round)
        .bind(vote.as_str())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        let rows = sqlx::query(TALLY_SQL)
            .bind(uuid_to_blob(complaint_id))
            .bind(round)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        fold_tally(&rows)
    }

    async fn tally(&self, complaint_id: Uuid, round: i64) -> Result<VoteTally> {
        let rows = sqlx::query(TALLY_SQL)
            .bind(uuid_to_blob(complaint_id))
            .bind(round)
            .fetch_all(self.db.pool())
            .await
            .map_err(db_err)?;
        fold_tally(&rows)
    }

    async fn find_vote(
        &self,
        complaint_id: Uuid,
        round: i64,
        user_id: Uuid,
    ) -> Result<Option<Vote>> {
        let row = sqlx::query(
            "SELECT vote_type, cast_at FROM votes \
             WHERE complaint_id = ? AND round = ? AND user_id = ?",
        )
        .bind(uuid_to_blob(complaint_id))
        .bind(round)
        .bind(uuid_to_blob(user_id))
        .fetch_optional(self.db.pool())
        .await
        .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let vote_type: String = row.try_get("vote_type").map_err(db_err)?;
        Ok(Some(Vote {
            complaint_id,
            user_id,
            round,
            vote: VoteType::parse(&vote_type).map_err(|e| corrupt("vote_type", e))?,
            cast_at: row
                .try_get::<DateTime<Utc>, _>("cast_at")
                .map_err(db_err)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::models::{Complaint, GeoPoint, User};
    use domains::ports::{ComplaintRepo, UserRepo};
    use domains::schema::{Department, Priority, ProcessStage, ResolutionStatus};

    use crate::sqlite::{SqliteComplaintRepo, SqliteUserRepo};

    struct Fixture {
        votes: SqliteVoteRepo,
        complaint_id: Uuid,
        users: Vec<Uuid>,
    }

    // The votes table carries foreign keys, so tests need real complaint
    // and user rows behind each vote.
    async fn fixture(user_count: usize) -> Fixture {
        let db = CivicDb::in_memory().await.unwrap();
        let complaints = SqliteComplaintRepo::new(db.clone());
        let users_repo = SqliteUserRepo::new(db.clone());

        let complaint = Complaint {
            id: Uuid::new_v4(),
            reporter_id: None,
            title: "Streetlight out".into(),
            description: "Dark stretch near the park".into(),
            category: None,
            department: Department::Electricity,
            priority: Priority::High,
            process: ProcessStage::PendingVerification,
            status: ResolutionStatus::Unresolved,
            location: GeoPoint {
                latitude: 13.0,
                longitude: 80.0,
            },
            location_name: "Park Rd".into(),
            image_ref: None,
            verification_round: 1,
            created_at: Utc::now(),
        };
        complaints.insert(&complaint).await.unwrap();

        let mut user_ids = Vec::new();
        for i in 0..user_count {
            let user = User {
                id: Uuid::new_v4(),
                first_name: format!("Citizen{i}"),
                last_name: "Test".into(),
                age: 30,
                aadhar_number: format!("11112222333{i}"),
                email: format!("citizen{i}@example.com"),
                phone: "9999999999".into(),
                password_hash: "hash".into(),
                created_at: Utc::now(),
            };
            users_repo.insert(&user).await.unwrap();
            user_ids.push(user.id);
        }

        Fixture {
            votes: SqliteVoteRepo::new(db),
            complaint_id: complaint.id,
            users: user_ids,
        }
    }

    #[tokio::test]
    async fn record_vote_returns_running_tally() {
        let fx = fixture(3).await;
        let tally = fx
            .votes
            .record_vote(fx.complaint_id, 1, fx.users[0], VoteType::Resolved)
            .await
            .unwrap();
        assert_eq!(tally, VoteTally { resolved: 1, not_resolved: 0 });

        fx.votes
            .record_vote(fx.complaint_id, 1, fx.users[1], VoteType::NotResolved)
            .await
            .unwrap();
        let tally = fx
            .votes
            .record_vote(fx.complaint_id, 1, fx.users[2], VoteType::Resolved)
            .await
            .unwrap();
        assert_eq!(tally, VoteTally { resolved: 2, not_resolved: 1 });
        assert_eq!(tally.total(), 3);
    }

    #[tokio::test]
    async fn revote_replaces_instead_of_stacking() {
        let fx = fixture(1).await;
        fx.votes
            .record_vote(fx.complaint_id, 1, fx.users[0], VoteType::Resolved)
            .await
            .unwrap();
        let tally = fx
            .votes
            .record_vote(fx.complaint_id, 1, fx.users[0], VoteType::NotResolved)
            .await
            .unwrap();
        assert_eq!(tally, VoteTally { resolved: 0, not_resolved: 1 });

        let vote = fx
            .votes
            .find_vote(fx.complaint_id, 1, fx.users[0])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vote.vote, VoteType::NotResolved);
    }

    #[tokio::test]
    async fn rounds_are_isolated() {
        let fx = fixture(2).await;
        fx.votes
            .record_vote(fx.complaint_id, 1, fx.users[0], VoteType::Resolved)
            .await
            .unwrap();
        fx.votes
            .record_vote(fx.complaint_id, 1, fx.users[1], VoteType::Resolved)
            .await
            .unwrap();

        // round two starts from zero
        let tally = fx.votes.tally(fx.complaint_id, 2).await.unwrap();
        assert_eq!(tally, VoteTally::default());

        // the same user votes again in round two without touching round one
        fx.votes
            .record_vote(fx.complaint_id, 2, fx.users[0], VoteType::NotResolved)
            .await
            .unwrap();
        let round_one = fx.votes.tally(fx.complaint_id, 1).await.unwrap();
        assert_eq!(round_one, VoteTally { resolved: 2, not_resolved: 0 });
    }

    #[tokio::test]
    async fn find_vote_misses_other_rounds() {
        let fx = fixture(1).await;
        fx.votes
            .record_vote(fx.complaint_id, 1, fx.users[0], VoteType::Resolved)
            .await
            .unwrap();
        assert!(fx
            .votes
            .find_vote(fx.complaint_id, 2, fx.users[0])
            .await
            .unwrap()
            .is_none());
    }
}
