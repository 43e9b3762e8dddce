//! SQLite wiring: pool construction, schema application, and the shared
//! row-mapping helpers the repositories use.

use std::str::FromStr;

use domains::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

mod complaints;
mod users;
mod votes;

pub use complaints::SqliteComplaintRepo;
pub use users::SqliteUserRepo;
pub use votes::SqliteVoteRepo;

/// Shared SQLite handle. The schema is applied on connect so a fresh
/// database file (or an in-memory database in tests) is immediately usable.
#[derive(Clone)]
pub struct CivicDb {
    pool: SqlitePool,
}

impl CivicDb {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(db_err)?;
        let db = Self { pool };
        db.apply_schema().await?;
        Ok(db)
    }

    /// Single-connection in-memory database for tests. One connection,
    /// never recycled, or the database vanishes mid-test.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(db_err)?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(db_err)?;
        let db = Self { pool };
        db.apply_schema().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn apply_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
        }
        Ok(())
    }
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS complaints (
        id                 BLOB PRIMARY KEY,
        reporter_id        BLOB,
        title              TEXT NOT NULL,
        description        TEXT NOT NULL,
        category           TEXT,
        department         TEXT NOT NULL,
        priority           TEXT NOT NULL,
        process            TEXT NOT NULL,
        status             TEXT NOT NULL,
        latitude           REAL NOT NULL,
        longitude          REAL NOT NULL,
        location_name      TEXT NOT NULL,
        image_ref          TEXT,
        verification_round INTEGER NOT NULL DEFAULT 0,
        created_at         TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id            BLOB PRIMARY KEY,
        first_name    TEXT NOT NULL,
        last_name     TEXT NOT NULL,
        age           INTEGER NOT NULL,
        aadhar_number TEXT NOT NULL UNIQUE,
        email         TEXT NOT NULL UNIQUE,
        phone         TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at    TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS votes (
        complaint_id BLOB NOT NULL REFERENCES complaints(id) ON DELETE CASCADE,
        user_id      BLOB NOT NULL REFERENCES users(id),
        round        INTEGER NOT NULL,
        vote_type    TEXT NOT NULL,
        cast_at      TEXT NOT NULL,
        PRIMARY KEY (complaint_id, user_id, round)
    )",
    "CREATE INDEX IF NOT EXISTS idx_complaints_process ON complaints(process)",
    "CREATE INDEX IF NOT EXISTS idx_votes_round ON votes(complaint_id, round)",
];

pub(crate) fn db_err(err: sqlx::Error) -> AppError {
    AppError::Internal(format!("database error: {err}"))
}

/// A stored enum value this crate did not write is data corruption,
/// not caller input.
pub(crate) fn corrupt(column: &str, err: AppError) -> AppError {
    AppError::Internal(format!("corrupt {column} column: {err}"))
}

// UUID columns are stored as 16-byte blobs.
pub(crate) fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub(crate) fn blob_to_uuid(blob: &[u8]) -> Result<Uuid> {
    Uuid::from_slice(blob).map_err(|_| AppError::Internal("corrupt uuid column".into()))
}
