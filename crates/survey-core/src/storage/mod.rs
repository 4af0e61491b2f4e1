mod config;
pub mod database;
mod memory;
pub mod migrations;

pub use config::{Config, KioskConfig, StorageBackend, StorageConfig, MAX_RESET_DELAY_SECS};
pub use database::SqliteAnswerStore;
pub use memory::MemoryAnswerStore;

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::{AnswerKey, AnswerValue};
use crate::error::{ConfigError, StoreError};
use crate::session::SessionId;

/// Durable checkpoint contract for answers and session completion.
///
/// Every call must be durable before it returns.
pub trait AnswerStore {
    /// Upsert the answer for `key`. Last write wins.
    ///
    /// # Errors
    /// Returns [`StoreError::SessionClosed`] if the session is already
    /// completed, or a backend error if the write is not durable.
    fn record_answer(
        &mut self,
        key: &AnswerKey,
        value: &AnswerValue,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Write the terminal COMPLETED status. A second call for the same
    /// session is a no-op.
    fn mark_completed(&mut self, session_id: &SessionId, at: DateTime<Utc>)
        -> Result<(), StoreError>;
}

impl<S: AnswerStore + ?Sized> AnswerStore for Box<S> {
    fn record_answer(
        &mut self,
        key: &AnswerKey,
        value: &AnswerValue,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        (**self).record_answer(key, value, at)
    }

    fn mark_completed(
        &mut self,
        session_id: &SessionId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        (**self).mark_completed(session_id, at)
    }
}

/// Terminal session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Completed,
}

impl SessionStatus {
    pub const COMPLETED: &'static str = "COMPLETED";

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Completed => Self::COMPLETED,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            Self::COMPLETED => Some(SessionStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A session known to the store, for audit listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub session_id: SessionId,
    pub status: Option<SessionStatus>,
}

/// Returns the kiosk data directory, creating it if needed.
///
/// `SURVEY_KIOSK_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/survey-kiosk[-dev]/`, with `-dev` chosen by
/// `SURVEY_KIOSK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SURVEY_KIOSK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("SURVEY_KIOSK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("survey-kiosk-dev")
            } else {
                base_dir.join("survey-kiosk")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_literal() {
        assert_eq!(SessionStatus::Completed.as_str(), "COMPLETED");
        assert_eq!(SessionStatus::parse("COMPLETED"), Some(SessionStatus::Completed));
        assert_eq!(SessionStatus::parse("completed"), None);
        assert_eq!(
            serde_json::to_string(&SessionStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }
}
