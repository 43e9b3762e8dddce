//! Citizen registration and login.

use std::sync::Arc;

use chrono::Utc;
use domains::models::User;
use domains::ports::{PasswordHasher, UserRepo};
use domains::{AppError, Result};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub aadhar_number: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepo>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepo>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }

    /// Registers a citizen; aadhaar number and email must both be unused.
    pub async fn register(&self, input: RegisterUser) -> Result<Uuid> {
        for (field, value) in [
            ("first_name", &input.first_name),
            ("aadhar_number", &input.aadhar_number),
            ("email", &input.email),
            ("password", &input.password),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} must be non-empty")));
            }
        }
        if !(1..=150).contains(&input.age) {
            return Err(AppError::Validation(format!(
                "age {} is not plausible",
                input.age
            )));
        }
        if self
            .repo
            .exists(input.aadhar_number.trim(), input.email.trim())
            .await?
        {
            return Err(AppError::Conflict(
                "a user with this aadhaar or email already exists".into(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            age: input.age,
            aadhar_number: input.aadhar_number.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            password_hash: self.hasher.hash(&input.password)?,
            created_at: Utc::now(),
        };
        // The unique indexes still backstop a registration race.
        self.repo.insert(&user).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user.id)
    }

    /// Returns the user id on a correct email/password pair. Unknown email
    /// and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<Uuid> {
        let user = self.repo.find_by_email(email.trim()).await?;
        match user {
            Some(user) if self.hasher.verify(password, &user.password_hash) => Ok(user.id),
            _ => Err(AppError::Unauthorized("invalid email or password".into())),
        }
    }
}
