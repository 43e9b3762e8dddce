//! # auth-adapters
//!
//! Argon2 password hashing and the shared-secret admin token check.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;
use domains::{AppError, Result};
use secrecy::{ExposeSecret, SecretString};

/// Argon2id implementation of the `PasswordHasher` port.
#[derive(Default, Clone)]
pub struct ArgonPasswordHasher;

impl domains::ports::PasswordHasher for ArgonPasswordHasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Shared-secret token guarding the admin surface. Held behind `secrecy`
/// so the value never lands in debug output or logs.
#[derive(Clone)]
pub struct AdminToken {
    secret: SecretString,
}

impl AdminToken {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    pub fn verify(&self, presented: &str) -> bool {
        presented.as_bytes() == self.secret.expose_secret().as_bytes()
    }
}
