use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::AnswerValue;
use crate::catalog::{Question, QuestionId};
use crate::session::{Session, SessionId};

/// An answer the store refused, held until retried or discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsavedAnswer {
    pub question_id: QuestionId,
    pub value: AnswerValue,
}

/// The active session plus the in-memory mirror of its answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub session: Session,
    pub answers: BTreeMap<QuestionId, AnswerValue>,
    pub unsaved: Option<UnsavedAnswer>,
}

impl ActiveSession {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            answers: BTreeMap::new(),
            unsaved: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.session.id
    }
}

/// Flow state. Only the controller's transition function moves between
/// variants.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Welcome,
    /// `0 <= cursor < catalog.count()`
    InProgress { session: ActiveSession, cursor: usize },
    Confirming { session: ActiveSession },
    Completed { session: ActiveSession },
}

impl FlowState {
    pub fn kind(&self) -> ScreenKind {
        match self {
            FlowState::Welcome => ScreenKind::Welcome,
            FlowState::InProgress { .. } => ScreenKind::InProgress,
            FlowState::Confirming { .. } => ScreenKind::Confirming,
            FlowState::Completed { .. } => ScreenKind::Completed,
        }
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        match self {
            FlowState::Welcome => None,
            FlowState::InProgress { session, .. }
            | FlowState::Confirming { session }
            | FlowState::Completed { session } => Some(session),
        }
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut ActiveSession> {
        match self {
            FlowState::Welcome => None,
            FlowState::InProgress { session, .. }
            | FlowState::Confirming { session }
            | FlowState::Completed { session } => Some(session),
        }
    }

    /// Move the session out, leaving `Welcome` behind.
    pub(crate) fn take_session(&mut self) -> Option<ActiveSession> {
        match std::mem::take(self) {
            FlowState::Welcome => None,
            FlowState::InProgress { session, .. }
            | FlowState::Confirming { session }
            | FlowState::Completed { session } => Some(session),
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        match self {
            FlowState::InProgress { cursor, .. } => Some(*cursor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    Welcome,
    InProgress,
    Confirming,
    Completed,
}

impl ScreenKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScreenKind::Welcome => "welcome",
            ScreenKind::InProgress => "in_progress",
            ScreenKind::Confirming => "confirming",
            ScreenKind::Completed => "completed",
        }
    }
}

/// Respondent intents forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "value", rename_all = "snake_case")]
pub enum Intent {
    Start,
    Answer(AnswerValue),
    Next,
    Prev,
    Confirm,
    Cancel,
    /// Re-attempt the write of an unsaved answer.
    RetrySave,
    /// Drop an unsaved answer and unblock navigation.
    DiscardUnsaved,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Start => "start",
            Intent::Answer(_) => "answer",
            Intent::Next => "next",
            Intent::Prev => "prev",
            Intent::Confirm => "confirm",
            Intent::Cancel => "cancel",
            Intent::RetrySave => "retry_save",
            Intent::DiscardUnsaved => "discard_unsaved",
        }
    }
}

/// What the presentation layer should render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenView {
    pub kind: ScreenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    /// Mirrored answer for the current question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsaved: Option<AnswerValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_at: Option<DateTime<Utc>>,
}

impl ScreenView {
    pub(crate) fn bare(kind: ScreenKind) -> Self {
        Self {
            kind,
            question: None,
            cursor: None,
            total: None,
            answer: None,
            unsaved: None,
            session_id: None,
            reset_at: None,
        }
    }

    /// "Previous" has nowhere to go.
    pub fn is_first(&self) -> bool {
        self.cursor == Some(0)
    }

    /// "Next" will ask for confirmation instead of advancing.
    pub fn is_last(&self) -> bool {
        matches!((self.cursor, self.total), (Some(c), Some(t)) if c + 1 == t)
    }
}
