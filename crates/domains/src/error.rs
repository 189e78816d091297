//! # Errors
//!
//! `DomainError` is what ports return; `VoteError` is what the correlator
//! reports to its caller.

use thiserror::Error;

/// Failures raised by ports and by input validation.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Validation failure (e.g. idea text too short)
    #[error("validation error: {0}")]
    Validation(String),

    /// Bad or missing webhook signature
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Key/value store unreachable, or a stored record could not be decoded
    #[error("storage error: {0}")]
    Storage(String),

    /// Outbound notification failed
    #[error("notification error: {0}")]
    Notification(String),
}

/// The three ways a vote can fail. `Display` yields the reason string sent
/// back to the webhook caller.
#[derive(Error, Debug)]
pub enum VoteError {
    #[error("Invalid idea ID format")]
    InvalidFormat,

    #[error("Idea not found")]
    NotFound { candidate: String },

    #[error("Failed to process vote")]
    Processing(#[source] DomainError),
}

impl VoteError {
    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            VoteError::InvalidFormat => "invalid_format",
            VoteError::NotFound { .. } => "not_found",
            VoteError::Processing(_) => "error",
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
