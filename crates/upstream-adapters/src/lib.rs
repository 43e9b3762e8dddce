//! # upstream-adapters
//!
//! HTTP clients for the external collaborators: the chat-completion
//! assist model and the speech-to-text service. Every failure path maps
//! to `AppError::Upstream` so the service layer can decide whether to
//! degrade or surface a 502.

pub mod assist;
pub mod transcribe;

pub use assist::HttpAssistProvider;
pub use transcribe::HttpTranscriber;
