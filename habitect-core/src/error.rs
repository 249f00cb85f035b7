//! Error types for habitect-core

use thiserror::Error;
use uuid::Uuid;

/// Main error type for the habitect-core library
///
/// The engine surfaces only the not-found variants from its computations;
/// everything else degrades to a safe default instead of failing (an
/// unparseable timezone becomes UTC, insufficient data becomes zero/`None`
/// outputs). `Io`, `Json`, and `Config` cover the library's own plumbing:
/// configuration files, logging setup, and export-bundle parsing.
#[derive(Error, Debug)]
pub enum Error {
    /// Habit not found for the given user
    #[error("habit not found: {0}")]
    HabitNotFound(Uuid),

    /// User not found
    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for habitect-core
pub type Result<T> = std::result::Result<T, Error>;
