//! # storage-adapters
//!
//! SQLite persistence for complaints, votes and users, plus the local
//! filesystem media store.

pub mod media_local;
pub mod sqlite;

pub use media_local::LocalMediaStore;
pub use sqlite::{CivicDb, SqliteComplaintRepo, SqliteUserRepo, SqliteVoteRepo};
