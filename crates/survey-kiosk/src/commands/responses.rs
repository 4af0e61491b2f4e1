use clap::Subcommand;
use survey_core::{Config, SessionId, SqliteAnswerStore};

#[derive(Subcommand)]
pub enum ResponsesAction {
    /// List stored sessions and their status
    List,
    /// Print one session's persisted records as JSON
    Show {
        /// Session token (e.g. "session_1760000000000_k3j9x0a1b")
        session: String,
    },
}

pub fn run(action: ResponsesAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = SqliteAnswerStore::open(config)?;

    match action {
        ResponsesAction::List => {
            let sessions = db.sessions()?;
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        ResponsesAction::Show { session } => {
            let session_id = SessionId::from(session);
            let answers = db.answers(&session_id)?;
            let status = db.status(&session_id)?;
            if answers.is_empty() && status.is_none() {
                return Err(format!("no records for session {session_id}").into());
            }
            let dump = serde_json::json!({
                "sessionId": session_id,
                "status": status,
                "answers": answers,
            });
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
    }
    Ok(())
}
