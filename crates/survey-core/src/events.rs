use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::AnswerValue;
use crate::catalog::QuestionId;
use crate::session::SessionId;

/// Every accepted transition produces an Event.
/// The presentation layer drains them after each intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurveyEvent {
    SessionStarted {
        session_id: SessionId,
        at: DateTime<Utc>,
    },
    AnswerRecorded {
        session_id: SessionId,
        question_id: QuestionId,
        value: AnswerValue,
        at: DateTime<Utc>,
    },
    /// A failed write was dropped on the caller's explicit request.
    AnswerDiscarded {
        session_id: SessionId,
        question_id: QuestionId,
        at: DateTime<Utc>,
    },
    CursorMoved {
        from: usize,
        to: usize,
        at: DateTime<Utc>,
    },
    ConfirmRequested {
        at: DateTime<Utc>,
    },
    ConfirmCancelled {
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session_id: SessionId,
        answered: usize,
        reset_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    FlowReset {
        at: DateTime<Utc>,
    },
}
