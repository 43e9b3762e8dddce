//! SQLite implementation of `ComplaintRepo`.
//!
//! Maps between the relational model and the domain `Complaint`, and
//! carries the two statements with real invariants: the round-bumping
//! `set_process` and the conditional `finalize_round`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::models::{Complaint, ComplaintFilter, GeoPoint};
use domains::ports::ComplaintRepo;
use domains::schema::{Category, Department, Priority, ProcessStage, ResolutionStatus};
use domains::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use super::{blob_to_uuid, corrupt, db_err, uuid_to_blob, CivicDb};

pub struct SqliteComplaintRepo {
    db: CivicDb,
}

impl SqliteComplaintRepo {
    pub fn new(db: CivicDb) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Complaint>> {
        let row = sqlx::query("SELECT * FROM complaints WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.db.pool())
            .await
            .map_err(db_err)?;
        row.as_ref().map(row_to_complaint).transpose()
    }
}

fn row_to_complaint(row: &SqliteRow) -> Result<Complaint> {
    let id = blob_to_uuid(&row.try_get::<Vec<u8>, _>("id").map_err(db_err)?)?;
    let reporter_id = row
        .try_get::<Option<Vec<u8>>, _>("reporter_id")
        .map_err(db_err)?
        .map(|blob| blob_to_uuid(&blob))
        .transpose()?;
    let category = row
        .try_get::<Option<String>, _>("category")
        .map_err(db_err)?
        .map(|value| Category::parse(&value).map_err(|e| corrupt("category", e)))
        .transpose()?;

    Ok(Complaint {
        id,
        reporter_id,
        title: row.try_get("title").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        category,
        department: Department::parse(&row.try_get::<String, _>("department").map_err(db_err)?)
            .map_err(|e| corrupt("department", e))?,
        priority: Priority::parse(&row.try_get::<String, _>("priority").map_err(db_err)?)
            .map_err(|e| corrupt("priority", e))?,
        process: ProcessStage::parse(&row.try_get::<String, _>("process").map_err(db_err)?)
            .map_err(|e| corrupt("process", e))?,
        status: ResolutionStatus::parse(&row.try_get::<String, _>("status").map_err(db_err)?)
            .map_err(|e| corrupt("status", e))?,
        location: GeoPoint {
            latitude: row.try_get("latitude").map_err(db_err)?,
            longitude: row.try_get("longitude").map_err(db_err)?,
        },
        location_name: row.try_get("location_name").map_err(db_err)?,
        image_ref: row.try_get("image_ref").map_err(db_err)?,
        verification_round: row.try_get("verification_round").map_err(db_err)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(db_err)?,
    })
}

#[async_trait]
impl ComplaintRepo for SqliteComplaintRepo {
    async fn insert(&self, complaint: &Complaint) -> Result<()> {
        sqlx::query(
            "INSERT INTO complaints (id, reporter_id, title, description, category, department, \
             priority, process, status, latitude, longitude, location_name, image_ref, \
             verification_round, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(complaint.id))
        .bind(complaint.reporter_id.map(uuid_to_blob))
        .bind(&complaint.title)
        .bind(&complaint.description)
        .bind(complaint.category.map(|c| c.as_str()))
        .bind(complaint.department.as_str())
        .bind(complaint.priority.as_str())
        .bind(complaint.process.as_str())
        .bind(complaint.status.as_str())
        .bind(complaint.location.latitude)
        .bind(complaint.location.longitude)
        .bind(&complaint.location_name)
        .bind(&complaint.image_ref)
        .bind(complaint.verification_round)
        .bind(complaint.created_at)
        .execute(self.db.pool())
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Complaint>> {
        self.fetch(id).await
    }

    async fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM complaints WHERE 1 = 1");
        if let Some(department) = filter.department {
            qb.push(" AND department = ").push_bind(department.as_str());
        }
        if let Some(process) = filter.process {
            qb.push(" AND process = ").push_bind(process.as_str());
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(from) = filter.created_from {
            qb.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = filter.created_to {
            qb.push(" AND created_at <= ").push_bind(to);
        }
        qb.push(" ORDER BY created_at DESC");

        let rows = qb
            .build()
            .fetch_all(self.db.pool())
            .await
            .map_err(db_err)?;
        rows.iter().map(row_to_complaint).collect()
    }

    async fn set_department(
        &self,
        id: Uuid,
        department: Department,
    ) -> Result<Option<Complaint>> {
        let result = sqlx::query("UPDATE complaints SET department = ? WHERE id = ?")
            .bind(department.as_str())
            .bind(uuid_to_blob(id))
            .execute(self.db.pool())
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch(id).await
    }

    async fn set_priority(&self, id: Uuid, priority: Priority) -> Result<Option<Complaint>> {
        let result = sqlx::query("UPDATE complaints SET priority = ? WHERE id = ?")
            .bind(priority.as_str())
            .bind(uuid_to_blob(id))
            .execute(self.db.pool())
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch(id).await
    }

    async fn set_process(&self, id: Uuid, process: ProcessStage) -> Result<Option<Complaint>> {
        // The round bump is computed against the pre-update row inside the
        // statement itself, so entering pending_verification can never race
        // a concurrent setter into a double bump.
        let result = sqlx::query(
            "UPDATE complaints SET \
             verification_round = verification_round + \
               (CASE WHEN ? = 'pending_verification' AND process <> 'pending_verification' \
                     THEN 1 ELSE 0 END), \
             process = ? \
             WHERE id = ?",
        )
        .bind(process.as_str())
        .bind(process.as_str())
        .bind(uuid_to_blob(id))
        .execute(self.db.pool())
        .await
        .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch(id).await
    }

    async fn finalize_round(
        &self,
        id: Uuid,
        round: i64,
        status: ResolutionStatus,
        process: ProcessStage,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE complaints SET status = ?, process = ? \
             WHERE id = ? AND verification_round = ? AND process = 'pending_verification'",
        )
        .bind(status.as_str())
        .bind(process.as_str())
        .bind(uuid_to_blob(id))
        .bind(round)
        .execute(self.db.pool())
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM complaints WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.db.pool())
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
