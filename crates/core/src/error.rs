//! Error types for Talks Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Assistant error: {0}")]
    Assistant(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Input rejected before any store is touched.
///
/// The messages are shown inline next to the form that produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Cannot schedule meetings in the past. Time travel module not detected.")]
    PastSchedule,

    #[error("Session title is required.")]
    EmptyTitle,

    #[error("A session needs at least one slot.")]
    InvalidCapacity,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid start time: {0}")]
    InvalidTime(String),

    #[error("Unique Username is required.")]
    MissingUsername,

    #[error("Invalid email format.")]
    InvalidEmail,

    #[error("Password must be 8+ chars with uppercase, numbers, and symbols.")]
    WeakPassword,

    #[error("Passwords don't match.")]
    PasswordMismatch,

    #[error("Username already taken: {0}")]
    UsernameTaken(String),
}

pub type Result<T> = std::result::Result<T, Error>;
