//! Plain-text rendering of controller screens.

use std::fmt::Write;

use survey_core::{AnswerValue, FlowError, QuestionKind, ScreenKind, ScreenView, ValidationError};

pub fn render(view: &ScreenView) -> String {
    let mut out = String::new();
    match view.kind {
        ScreenKind::Welcome => {
            out.push_str("Welcome to our Survey\n");
            out.push_str("We value your feedback! Please take a moment to share your thoughts.\n");
            out.push_str("[start] Start Survey\n");
        }
        ScreenKind::InProgress => {
            render_question(&mut out, view);
            let prev = if view.is_first() {
                "(Previous)"
            } else {
                "[prev] Previous"
            };
            let next = if view.is_last() {
                "[next] Finish"
            } else {
                "[next] Next"
            };
            let _ = writeln!(out, "{prev}    {next}");
        }
        ScreenKind::Confirming => {
            out.push_str("Submit Survey\n");
            out.push_str("Are you sure you want to submit your survey responses?\n");
            out.push_str("[cancel] Cancel    [confirm] Submit\n");
        }
        ScreenKind::Completed => {
            out.push_str("Thank You!\n");
            out.push_str("We appreciate your valuable feedback.\n");
            out.push_str("Redirecting to welcome screen...\n");
        }
    }
    out
}

fn render_question(out: &mut String, view: &ScreenView) {
    let (Some(question), Some(cursor), Some(total)) = (&view.question, view.cursor, view.total)
    else {
        return;
    };
    let _ = writeln!(out, "Question {} of {}", cursor + 1, total);
    let _ = writeln!(out, "{}", question.text);

    match question.kind {
        QuestionKind::Rating(scale) => {
            let selected = view.answer.as_ref().and_then(AnswerValue::as_rating);
            let buttons: Vec<String> = scale
                .values()
                .map(|v| {
                    if Some(v) == selected {
                        format!("[{v}]")
                    } else {
                        format!(" {v} ")
                    }
                })
                .collect();
            let _ = writeln!(out, "{}", buttons.join(" "));
        }
        QuestionKind::FreeText => {
            let current = view
                .answer
                .as_ref()
                .and_then(AnswerValue::as_text)
                .unwrap_or("");
            if current.is_empty() {
                out.push_str("> (type: answer <your text>)\n");
            } else {
                let _ = writeln!(out, "> {current}");
            }
        }
    }

    if view.unsaved.is_some() {
        out.push_str("! Your answer was not saved. [retry] or [discard]\n");
    }
}

/// Respondent-facing text for a rejected intent.
pub fn feedback(err: &FlowError) -> String {
    match err {
        FlowError::Validation(ValidationError::OutOfRange { min, max, .. }) => {
            format!("Please choose a value between {min} and {max}.")
        }
        FlowError::Validation(ValidationError::WrongKind { expected, .. }) => {
            format!("This question needs a {} answer.", expected.replace('_', " "))
        }
        FlowError::Persistence(e) => {
            format!("Your answer could not be saved ({e}). Type retry or discard.")
        }
        FlowError::UnsavedAnswer { .. } => {
            "Your last answer has not been saved yet. Type retry or discard.".to_string()
        }
        FlowError::InvalidTransition { .. } => "That action isn't available here.".to_string(),
    }
}
