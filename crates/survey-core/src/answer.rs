use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::QuestionId;
use crate::session::SessionId;

/// A respondent's answer to one question.
///
/// Serialized untagged: ratings are JSON numbers, free text is a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Rating(i64),
    Text(String),
}

impl AnswerValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            AnswerValue::Rating(_) => "rating",
            AnswerValue::Text(_) => "text",
        }
    }

    pub fn as_rating(&self) -> Option<i64> {
        match self {
            AnswerValue::Rating(v) => Some(*v),
            AnswerValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            AnswerValue::Rating(_) => None,
        }
    }
}

/// Composite store key: one answer slot per (session, question).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnswerKey {
    pub session_id: SessionId,
    pub question_id: QuestionId,
}

impl AnswerKey {
    pub fn new(session_id: SessionId, question_id: QuestionId) -> Self {
        Self {
            session_id,
            question_id,
        }
    }
}

/// Persisted answer payload: `{questionId, answer, timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub answer: AnswerValue,
    pub timestamp: DateTime<Utc>,
}
