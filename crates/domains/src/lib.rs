//! # domains
//!
//! Core domain layer of Civic Guardian: the complaint/user/vote models,
//! the shared schema enumerations, the error taxonomy, and the port traits
//! every adapter implements.

pub mod error;
pub mod models;
pub mod ports;
pub mod schema;

pub use error::{AppError, Result};
