//! # Survey Kiosk Core Library
//!
//! This library provides the session engine for a single-respondent survey
//! kiosk. Presentation lives elsewhere (the `survey-kiosk` terminal binary is
//! one such layer): it renders whatever [`ScreenView`] the controller reports
//! and forwards respondent intents back into it.
//!
//! ## Architecture
//!
//! - **Flow Controller**: A state machine over an explicit [`FlowState`];
//!   the caller periodically invokes `tick()` to let the auto-reset fire
//! - **Catalog**: The ordered, immutable question list
//! - **Storage**: Answer checkpoints behind the [`AnswerStore`] trait, with
//!   SQLite and in-memory implementations, plus TOML configuration
//!
//! ## Key Components
//!
//! - [`SurveyController`]: Core flow state machine
//! - [`QuestionCatalog`]: Question definitions
//! - [`SqliteAnswerStore`]: Durable answer persistence
//! - [`Config`]: Kiosk configuration management

pub mod answer;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod events;
pub mod flow;
pub mod session;
pub mod storage;

pub use answer::{AnswerKey, AnswerRecord, AnswerValue};
pub use catalog::{Question, QuestionCatalog, QuestionId, QuestionKind, RatingScale};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CatalogError, ConfigError, CoreError, FlowError, StoreError, ValidationError};
pub use events::SurveyEvent;
pub use flow::{FlowState, Intent, ResetTimer, ScreenKind, ScreenView, SurveyController};
pub use session::{Session, SessionId};
pub use storage::{
    AnswerStore, Config, MemoryAnswerStore, SessionStatus, SqliteAnswerStore, StorageBackend,
    StoredSession,
};
