//! Typed commands from the kiosk prompt.

use survey_core::{AnswerValue, Intent, QuestionKind, ScreenView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Help,
    Quit,
    Empty,
}

/// Parse one prompt line in the context of the screen being shown.
///
/// Answers are typed against the current question: a rating question needs a
/// whole number, a free-text question takes the rest of the line verbatim.
pub fn parse_command(line: &str, view: &ScreenView) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(Command::Empty);
    }

    let (word, rest) = match trimmed.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    let intent = match word.to_ascii_lowercase().as_str() {
        "start" | "s" => Intent::Start,
        "next" | "n" | "finish" => Intent::Next,
        "prev" | "p" | "back" => Intent::Prev,
        "confirm" | "y" | "submit" => Intent::Confirm,
        "cancel" | "c" => Intent::Cancel,
        "retry" => Intent::RetrySave,
        "discard" => Intent::DiscardUnsaved,
        "answer" | "a" => Intent::Answer(parse_value(rest, view)?),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "q" | "exit" => return Ok(Command::Quit),
        _ if is_rating(view) => match trimmed.trim().parse::<i64>() {
            Ok(v) => Intent::Answer(AnswerValue::Rating(v)),
            Err(_) => return Err(unrecognised(word)),
        },
        _ => return Err(unrecognised(word)),
    };
    Ok(Command::Intent(intent))
}

fn is_rating(view: &ScreenView) -> bool {
    matches!(
        view.question.as_ref().map(|q| q.kind),
        Some(QuestionKind::Rating(_))
    )
}

fn parse_value(rest: &str, view: &ScreenView) -> Result<AnswerValue, String> {
    if is_rating(view) {
        rest.trim()
            .parse::<i64>()
            .map(AnswerValue::Rating)
            .map_err(|_| format!("'{}' is not a whole number", rest.trim()))
    } else {
        Ok(AnswerValue::Text(rest.to_string()))
    }
}

fn unrecognised(word: &str) -> String {
    format!("unrecognised command '{word}' (type help)")
}

pub const HELP: &str = "\
commands:
  start              begin the survey
  answer <value>     answer the current question (a <value>; a bare number works for ratings)
  next | prev        move between questions
  confirm | cancel   submit or go back from the confirmation dialog
  retry | discard    deal with an answer that could not be saved
  quit               leave the kiosk";
