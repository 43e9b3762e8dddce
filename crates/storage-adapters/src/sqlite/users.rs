//! SQLite implementation of `UserRepo`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::models::User;
use domains::ports::UserRepo;
use domains::{AppError, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{blob_to_uuid, db_err, uuid_to_blob, CivicDb};

pub struct SqliteUserRepo {
    db: CivicDb,
}

impl SqliteUserRepo {
    pub fn new(db: CivicDb) -> Self {
        Self { db }
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id").map_err(db_err)?)?,
        first_name: row.try_get("first_name").map_err(db_err)?,
        last_name: row.try_get("last_name").map_err(db_err)?,
        age: row.try_get("age").map_err(db_err)?,
        aadhar_number: row.try_get("aadhar_number").map_err(db_err)?,
        email: row.try_get("email").map_err(db_err)?,
        phone: row.try_get("phone").map_err(db_err)?,
        password_hash: row.try_get("password_hash").map_err(db_err)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(db_err)?,
    })
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn insert(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO users (id, first_name, last_name, age, aadhar_number, email, phone, \
             password_hash, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(user.id))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.age)
        .bind(&user.aadhar_number)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(self.db.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                "user already registered with this aadhaar number or email".into(),
            )),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.db.pool())
            .await
            .map_err(db_err)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.db.pool())
            .await
            .map_err(db_err)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn exists(&self, aadhar_number: &str, email: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM users WHERE aadhar_number = ? OR email = ? LIMIT 1")
            .bind(aadhar_number)
            .bind(email)
            .fetch_optional(self.db.pool())
            .await
            .map_err(db_err)?;
        Ok(row.is_some())
    }
}
