use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{AnswerStore, SessionStatus};
use crate::answer::{AnswerKey, AnswerRecord, AnswerValue};
use crate::error::StoreError;
use crate::session::SessionId;

/// In-process answer store. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryAnswerStore {
    answers: BTreeMap<AnswerKey, AnswerRecord>,
    completed: BTreeMap<SessionId, DateTime<Utc>>,
}

impl MemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answers(&self, session_id: &SessionId) -> Vec<AnswerRecord> {
        self.answers
            .iter()
            .filter(|(k, _)| &k.session_id == session_id)
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn status(&self, session_id: &SessionId) -> Option<SessionStatus> {
        self.completed
            .contains_key(session_id)
            .then_some(SessionStatus::Completed)
    }

    pub fn completed_at(&self, session_id: &SessionId) -> Option<DateTime<Utc>> {
        self.completed.get(session_id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl AnswerStore for MemoryAnswerStore {
    fn record_answer(
        &mut self,
        key: &AnswerKey,
        value: &AnswerValue,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if self.completed.contains_key(&key.session_id) {
            return Err(StoreError::SessionClosed(key.session_id.clone()));
        }
        self.answers.insert(
            key.clone(),
            AnswerRecord {
                question_id: key.question_id,
                answer: value.clone(),
                timestamp: at,
            },
        );
        Ok(())
    }

    fn mark_completed(
        &mut self,
        session_id: &SessionId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.completed.entry(session_id.clone()).or_insert(at);
        Ok(())
    }
}
