//! SQLite-backed answer store.
//!
//! Provides durable checkpoints for:
//! - Individual answers, one row per (session, question)
//! - The terminal COMPLETED status per session
//!
//! The connection runs with `synchronous = FULL`, so a committed write has
//! reached disk before the call returns.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, migrations, AnswerStore, Config, SessionStatus, StoredSession};
use crate::answer::{AnswerKey, AnswerRecord, AnswerValue};
use crate::error::{Result, StoreError};
use crate::session::SessionId;

/// SQLite database for answer storage.
pub struct SqliteAnswerStore {
    conn: Connection,
}

impl SqliteAnswerStore {
    /// Open the database named by `config` inside the data directory.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open(config: &Config) -> Result<Self> {
        let path = data_dir()?.join(&config.storage.database_file);
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) the database at `path`.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "synchronous", "FULL")?;
        migrations::migrate(&conn).map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    fn status_in(
        conn: &Connection,
        session_id: &SessionId,
    ) -> Result<Option<SessionStatus>, StoreError> {
        let status: Option<String> = conn
            .query_row(
                "SELECT status FROM session_status WHERE session_id = ?1",
                params![session_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(status.as_deref().and_then(SessionStatus::parse))
    }

    /// Terminal status of `session_id`, if any.
    pub fn status(&self, session_id: &SessionId) -> Result<Option<SessionStatus>, StoreError> {
        Self::status_in(&self.conn, session_id)
    }

    /// Every answer record of a session, ordered by question id.
    pub fn answers(&self, session_id: &SessionId) -> Result<Vec<AnswerRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM answers
             WHERE session_id = ?1
             ORDER BY question_id",
        )?;
        let rows = stmt.query_map(params![session_id.as_str()], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for payload in rows {
            records.push(serde_json::from_str(&payload?)?);
        }
        Ok(records)
    }

    /// Every session with at least one answer or a status record.
    pub fn sessions(&self) -> Result<Vec<StoredSession>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT s.session_id, st.status
             FROM (SELECT session_id FROM answers
                   UNION
                   SELECT session_id FROM session_status) AS s
             LEFT JOIN session_status st ON st.session_id = s.session_id
             ORDER BY s.session_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, status) = row?;
            sessions.push(StoredSession {
                session_id: SessionId::from(id),
                status: status.as_deref().and_then(SessionStatus::parse),
            });
        }
        Ok(sessions)
    }
}

impl AnswerStore for SqliteAnswerStore {
    fn record_answer(
        &mut self,
        key: &AnswerKey,
        value: &AnswerValue,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        if Self::status_in(&tx, &key.session_id)?.is_some() {
            return Err(StoreError::SessionClosed(key.session_id.clone()));
        }

        let payload = serde_json::to_string(&AnswerRecord {
            question_id: key.question_id,
            answer: value.clone(),
            timestamp: at,
        })?;
        tx.execute(
            "INSERT INTO answers (session_id, question_id, payload, recorded_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(session_id, question_id)
             DO UPDATE SET payload = excluded.payload, recorded_at = excluded.recorded_at",
            params![
                key.session_id.as_str(),
                key.question_id.0,
                payload,
                at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn mark_completed(
        &mut self,
        session_id: &SessionId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO session_status (session_id, status, completed_at)
             VALUES (?1, ?2, ?3)",
            params![
                session_id.as_str(),
                SessionStatus::Completed.as_str(),
                at.to_rfc3339(),
            ],
        )?;
        if inserted == 0 {
            tracing::debug!(session = %session_id, "session already completed, ignoring");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionId;

    fn key(session: &str, q: u32) -> AnswerKey {
        AnswerKey::new(SessionId::from(session), QuestionId(q))
    }

    #[test]
    fn record_and_read_back() {
        let mut db = SqliteAnswerStore::open_memory().unwrap();
        let now = Utc::now();
        db.record_answer(&key("s1", 1), &AnswerValue::Rating(4), now)
            .unwrap();
        db.record_answer(&key("s1", 5), &AnswerValue::Text("Faster checkout".into()), now)
            .unwrap();

        let records = db.answers(&SessionId::from("s1")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question_id, QuestionId(1));
        assert_eq!(records[0].answer, AnswerValue::Rating(4));
        assert_eq!(records[1].answer, AnswerValue::Text("Faster checkout".into()));
    }

    #[test]
    fn rerecording_overwrites() {
        let mut db = SqliteAnswerStore::open_memory().unwrap();
        let now = Utc::now();
        db.record_answer(&key("s1", 2), &AnswerValue::Rating(2), now)
            .unwrap();
        db.record_answer(&key("s1", 2), &AnswerValue::Rating(5), now)
            .unwrap();
        let records = db.answers(&SessionId::from("s1")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].answer, AnswerValue::Rating(5));
    }

    #[test]
    fn repeated_identical_writes_match_a_single_write() {
        let now = Utc::now();
        let value = AnswerValue::Text("Faster checkout".into());

        let mut once = SqliteAnswerStore::open_memory().unwrap();
        once.record_answer(&key("s1", 5), &value, now).unwrap();

        let mut many = SqliteAnswerStore::open_memory().unwrap();
        for _ in 0..5 {
            many.record_answer(&key("s1", 5), &value, now).unwrap();
        }

        let session = SessionId::from("s1");
        assert_eq!(many.answers(&session).unwrap(), once.answers(&session).unwrap());
        assert_eq!(many.sessions().unwrap(), once.sessions().unwrap());
    }

    #[test]
    fn completed_session_rejects_answers() {
        let mut db = SqliteAnswerStore::open_memory().unwrap();
        let now = Utc::now();
        let session = SessionId::from("s1");
        db.record_answer(&key("s1", 1), &AnswerValue::Rating(3), now)
            .unwrap();
        db.mark_completed(&session, now).unwrap();
        // Second completion is a no-op.
        db.mark_completed(&session, now).unwrap();

        let err = db
            .record_answer(&key("s1", 1), &AnswerValue::Rating(1), now)
            .unwrap_err();
        assert!(matches!(err, StoreError::SessionClosed(_)));
        assert_eq!(db.answers(&session).unwrap()[0].answer, AnswerValue::Rating(3));
        assert_eq!(db.status(&session).unwrap(), Some(SessionStatus::Completed));
    }

    #[test]
    fn sessions_lists_answered_and_completed() {
        let mut db = SqliteAnswerStore::open_memory().unwrap();
        let now = Utc::now();
        db.record_answer(&key("a", 1), &AnswerValue::Rating(3), now)
            .unwrap();
        db.mark_completed(&SessionId::from("b"), now).unwrap();

        let sessions = db.sessions().unwrap();
        assert_eq!(
            sessions,
            vec![
                StoredSession {
                    session_id: SessionId::from("a"),
                    status: None
                },
                StoredSession {
                    session_id: SessionId::from("b"),
                    status: Some(SessionStatus::Completed)
                },
            ]
        );
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.db");
        let now = Utc::now();
        {
            let mut db = SqliteAnswerStore::open_at(&path).unwrap();
            db.record_answer(&key("s1", 3), &AnswerValue::Rating(5), now)
                .unwrap();
            db.mark_completed(&SessionId::from("s1"), now).unwrap();
        }
        let db = SqliteAnswerStore::open_at(&path).unwrap();
        let session = SessionId::from("s1");
        assert_eq!(db.answers(&session).unwrap().len(), 1);
        assert_eq!(db.status(&session).unwrap(), Some(SessionStatus::Completed));
    }
}
