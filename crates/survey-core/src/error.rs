//! Core error types for survey-core.
//!
//! The flow controller never treats any of these as fatal: a rejected intent
//! leaves the flow state untouched and hands the error back to the caller.

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::QuestionId;
use crate::session::SessionId;

/// Core error type for survey-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Answer store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Answer store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The session already carries the terminal COMPLETED status.
    #[error("Session {0} is completed and accepts no further answers")]
    SessionClosed(SessionId),

    /// A persisted record could not be encoded or decoded.
    #[error("Malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The backing medium refused the write.
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Catalog construction errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog has no questions")]
    Empty,

    #[error("Question id must be positive (got 0)")]
    ZeroId,

    #[error("Duplicate question id {0}")]
    DuplicateId(QuestionId),

    #[error("Question {id} has an inverted rating range {min}..={max}")]
    InvertedRange { id: QuestionId, min: i64, max: i64 },
}

/// Answer validation failures.
///
/// Always recoverable: the presentation layer decides how to surface them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Rating outside the question's inclusive range
    #[error("Rating {value} for question {question_id} is outside {min}..={max}")]
    OutOfRange {
        question_id: QuestionId,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Answer kind does not match the question kind
    #[error("Question {question_id} expects a {expected} answer, got {got}")]
    WrongKind {
        question_id: QuestionId,
        expected: &'static str,
        got: &'static str,
    },
}

/// Rejected intents.
#[derive(Error, Debug)]
pub enum FlowError {
    /// The answer failed kind/range validation; nothing was written.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The store could not durably record the write.
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),

    /// The intent has no row in the transition table for the current screen.
    #[error("Intent '{intent}' is not valid on the {screen} screen")]
    InvalidTransition {
        screen: &'static str,
        intent: &'static str,
    },

    /// An answer for this question failed to persist and has not been
    /// retried or discarded yet.
    #[error("Answer for question {question_id} has not been saved")]
    UnsavedAnswer { question_id: QuestionId },
}

impl FlowError {
    /// True for failures the respondent caused and can correct.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
