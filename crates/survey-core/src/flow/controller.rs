//! Survey flow controller.
//!
//! A single-respondent state machine. Every intent is handled to completion
//! before the next one: the intent is first planned against the current
//! state (guards and validation, no side effects), then the planned
//! side effect runs, and only if it succeeds is the new state committed.
//!
//! ## State Transitions
//!
//! ```text
//! Welcome -> InProgress(0..n) -> Confirming -> Completed -> (timer) -> Welcome
//!                  ^                  |
//!                  +---- Cancel ------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut flow = SurveyController::new(QuestionCatalog::default(), store);
//! flow.submit(Intent::Start)?;
//! flow.submit(Intent::Answer(AnswerValue::Rating(4)))?;
//! // In the UI loop:
//! flow.tick(); // Returns true when the auto-reset fired
//! ```

use chrono::{DateTime, Duration, Utc};

use super::reset_timer::ResetTimer;
use super::state::{ActiveSession, FlowState, Intent, ScreenView, UnsavedAnswer};
use crate::answer::{AnswerKey, AnswerValue};
use crate::catalog::{QuestionCatalog, QuestionId};
use crate::clock::{Clock, SystemClock};
use crate::error::FlowError;
use crate::events::SurveyEvent;
use crate::session::Session;
use crate::storage::AnswerStore;

/// Delay between completion and the return to the welcome screen.
pub const DEFAULT_RESET_DELAY_SECS: i64 = 5;

/// Planned outcome of an intent, before any side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Transition {
    Begin,
    Record {
        question_id: QuestionId,
        value: AnswerValue,
    },
    Discard,
    MoveTo(usize),
    /// Boundary clamp: accepted, nothing changes.
    Stay,
    RequestConfirm,
    CancelConfirm,
    Complete,
}

pub struct SurveyController<S, C = SystemClock> {
    catalog: QuestionCatalog,
    store: S,
    clock: C,
    state: FlowState,
    timer: ResetTimer,
    reset_delay: Duration,
    events: Vec<SurveyEvent>,
}

impl<S: AnswerStore> SurveyController<S> {
    pub fn new(catalog: QuestionCatalog, store: S) -> Self {
        Self::with_clock(catalog, store, SystemClock)
    }
}

impl<S: AnswerStore, C: Clock> SurveyController<S, C> {
    pub fn with_clock(catalog: QuestionCatalog, store: S, clock: C) -> Self {
        Self {
            catalog,
            store,
            clock,
            state: FlowState::Welcome,
            timer: ResetTimer::new(),
            reset_delay: Duration::seconds(DEFAULT_RESET_DELAY_SECS),
            events: Vec::new(),
        }
    }

    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn reset_delay(&self) -> Duration {
        self.reset_delay
    }

    /// Pending auto-reset deadline, if the flow is on the completed screen.
    pub fn reset_deadline(&self) -> Option<DateTime<Utc>> {
        self.timer.deadline()
    }

    /// Time left before the auto-reset fires.
    pub fn reset_remaining(&self) -> Option<Duration> {
        self.timer.remaining(self.clock.now())
    }

    /// Events produced since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SurveyEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn current_screen(&self) -> ScreenView {
        let mut view = ScreenView::bare(self.state.kind());
        let total = self.catalog.count();

        let position = match &self.state {
            FlowState::Welcome => None,
            FlowState::InProgress { session, cursor } => Some((session, *cursor)),
            FlowState::Confirming { session } => Some((session, self.catalog.last_index())),
            FlowState::Completed { session } => {
                view.session_id = Some(session.id().clone());
                view.reset_at = self.timer.deadline();
                None
            }
        };

        if let Some((session, cursor)) = position {
            let question = self.catalog.get(cursor).cloned();
            view.answer = question
                .as_ref()
                .and_then(|q| session.answers.get(&q.id).cloned());
            view.unsaved = session.unsaved.as_ref().map(|u| u.value.clone());
            view.question = question;
            view.cursor = Some(cursor);
            view.total = Some(total);
            view.session_id = Some(session.id().clone());
        }
        view
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply one intent. On failure the state is unchanged (apart from an
    /// unsaved answer being held after a persistence failure) and the error
    /// describes why.
    pub fn submit(&mut self, intent: Intent) -> Result<ScreenView, FlowError> {
        let now = self.clock.now();
        let from = self.state.kind();
        let name = intent.name();

        let outcome = self
            .plan(intent)
            .and_then(|transition| self.execute(transition, now));

        match outcome {
            Ok(()) => {
                tracing::debug!(
                    intent = name,
                    from = from.name(),
                    to = self.state.kind().name(),
                    cursor = ?self.state.cursor(),
                    "intent accepted"
                );
                Ok(self.current_screen())
            }
            Err(e) => {
                tracing::warn!(intent = name, screen = from.name(), error = %e, "intent rejected");
                Err(e)
            }
        }
    }

    /// Poll the auto-reset timer. Returns true if the flow went back to
    /// Welcome.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        if !self.timer.poll(now) {
            return false;
        }
        if matches!(self.state, FlowState::Completed { .. }) {
            self.reset_at(now);
            true
        } else {
            false
        }
    }

    /// Return to Welcome immediately from any screen, cancelling a pending
    /// auto-reset. Persisted records are not touched.
    pub fn reset(&mut self) {
        let now = self.clock.now();
        self.reset_at(now);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn plan(&self, intent: Intent) -> Result<Transition, FlowError> {
        let invalid = |intent: &Intent| FlowError::InvalidTransition {
            screen: self.state.kind().name(),
            intent: intent.name(),
        };
        let last = self.catalog.last_index();

        match (&self.state, intent) {
            (FlowState::Welcome, Intent::Start) => Ok(Transition::Begin),

            (FlowState::InProgress { cursor, .. }, Intent::Answer(value)) => {
                let Some(question) = self.catalog.get(*cursor) else {
                    return Err(invalid(&Intent::Answer(value)));
                };
                question.validate(&value)?;
                Ok(Transition::Record {
                    question_id: question.id,
                    value,
                })
            }

            (
                FlowState::InProgress {
                    session: ActiveSession {
                        unsaved: Some(unsaved),
                        ..
                    },
                    ..
                },
                Intent::Next | Intent::Prev,
            ) => Err(FlowError::UnsavedAnswer {
                question_id: unsaved.question_id,
            }),

            (FlowState::InProgress { cursor, .. }, Intent::Next) => {
                if *cursor < last {
                    Ok(Transition::MoveTo(cursor + 1))
                } else {
                    Ok(Transition::RequestConfirm)
                }
            }

            (FlowState::InProgress { cursor, .. }, Intent::Prev) => {
                if *cursor > 0 {
                    Ok(Transition::MoveTo(cursor - 1))
                } else {
                    Ok(Transition::Stay)
                }
            }

            (FlowState::InProgress { session, .. }, intent @ Intent::RetrySave) => {
                match &session.unsaved {
                    Some(u) => Ok(Transition::Record {
                        question_id: u.question_id,
                        value: u.value.clone(),
                    }),
                    None => Err(invalid(&intent)),
                }
            }

            (FlowState::InProgress { session, .. }, intent @ Intent::DiscardUnsaved) => {
                if session.unsaved.is_some() {
                    Ok(Transition::Discard)
                } else {
                    Err(invalid(&intent))
                }
            }

            (FlowState::Confirming { .. }, Intent::Cancel) => Ok(Transition::CancelConfirm),
            (FlowState::Confirming { .. }, Intent::Confirm) => Ok(Transition::Complete),

            (_, intent) => Err(invalid(&intent)),
        }
    }

    fn execute(&mut self, transition: Transition, now: DateTime<Utc>) -> Result<(), FlowError> {
        match transition {
            Transition::Begin => {
                let session = Session::begin(now);
                tracing::info!(session = %session.id, "session started");
                self.events.push(SurveyEvent::SessionStarted {
                    session_id: session.id.clone(),
                    at: now,
                });
                self.state = FlowState::InProgress {
                    session: ActiveSession::new(session),
                    cursor: 0,
                };
            }

            Transition::Record { question_id, value } => {
                let Some(session) = self.state.session_mut() else {
                    return Ok(());
                };
                let key = AnswerKey::new(session.id().clone(), question_id);
                if let Err(e) = self.store.record_answer(&key, &value, now) {
                    tracing::warn!(
                        session = %key.session_id,
                        question = %question_id,
                        error = %e,
                        "answer not persisted, holding as unsaved"
                    );
                    session.unsaved = Some(UnsavedAnswer { question_id, value });
                    return Err(e.into());
                }
                session.unsaved = None;
                session.answers.insert(question_id, value.clone());
                self.events.push(SurveyEvent::AnswerRecorded {
                    session_id: key.session_id,
                    question_id,
                    value,
                    at: now,
                });
            }

            Transition::Discard => {
                if let Some(session) = self.state.session_mut() {
                    if let Some(dropped) = session.unsaved.take() {
                        tracing::warn!(
                            session = %session.id(),
                            question = %dropped.question_id,
                            "unsaved answer discarded"
                        );
                        self.events.push(SurveyEvent::AnswerDiscarded {
                            session_id: session.id().clone(),
                            question_id: dropped.question_id,
                            at: now,
                        });
                    }
                }
            }

            Transition::MoveTo(to) => {
                if let FlowState::InProgress { cursor, .. } = &mut self.state {
                    let from = *cursor;
                    *cursor = to;
                    self.events.push(SurveyEvent::CursorMoved { from, to, at: now });
                }
            }

            Transition::Stay => {}

            Transition::RequestConfirm => {
                if let Some(session) = self.state.take_session() {
                    self.state = FlowState::Confirming { session };
                    self.events.push(SurveyEvent::ConfirmRequested { at: now });
                }
            }

            Transition::CancelConfirm => {
                if let Some(session) = self.state.take_session() {
                    self.state = FlowState::InProgress {
                        session,
                        cursor: self.catalog.last_index(),
                    };
                    self.events.push(SurveyEvent::ConfirmCancelled { at: now });
                }
            }

            Transition::Complete => {
                let Some(session_id) = self.state.session().map(|s| s.id().clone()) else {
                    return Ok(());
                };
                self.store.mark_completed(&session_id, now)?;

                if let Some(session) = self.state.take_session() {
                    let answered = session.answers.len();
                    self.state = FlowState::Completed { session };
                    let reset_at = self.timer.start(self.reset_delay, now);
                    tracing::info!(session = %session_id, answered, "session completed");
                    self.events.push(SurveyEvent::SessionCompleted {
                        session_id,
                        answered,
                        reset_at,
                        at: now,
                    });
                }
            }
        }
        Ok(())
    }

    fn reset_at(&mut self, now: DateTime<Utc>) {
        let cancelled = self.timer.cancel();
        if cancelled {
            tracing::debug!("pending auto-reset cancelled");
        }
        let cleared = self.state.take_session();
        if let Some(session) = &cleared {
            tracing::info!(session = %session.id(), "flow reset to welcome");
        }
        if cancelled || cleared.is_some() {
            self.events.push(SurveyEvent::FlowReset { at: now });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Question;
    use crate::clock::ManualClock;
    use crate::error::{StoreError, ValidationError};
    use crate::flow::ScreenKind;
    use crate::session::SessionId;
    use crate::storage::MemoryAnswerStore;

    type Flow = SurveyController<MemoryAnswerStore, ManualClock>;

    fn flow() -> (Flow, ManualClock) {
        let clock = ManualClock::default();
        let flow = SurveyController::with_clock(
            QuestionCatalog::customer_satisfaction(),
            MemoryAnswerStore::new(),
            clock.clone(),
        );
        (flow, clock)
    }

    fn session_id(flow: &Flow) -> SessionId {
        flow.state().session().unwrap().id().clone()
    }

    fn rating(v: i64) -> Intent {
        Intent::Answer(AnswerValue::Rating(v))
    }

    /// Store that refuses writes while `failing` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryAnswerStore,
        failing: bool,
    }

    impl AnswerStore for FlakyStore {
        fn record_answer(
            &mut self,
            key: &AnswerKey,
            value: &AnswerValue,
            at: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            if self.failing {
                return Err(StoreError::WriteFailed("disk full".into()));
            }
            self.inner.record_answer(key, value, at)
        }

        fn mark_completed(
            &mut self,
            session_id: &crate::session::SessionId,
            at: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            if self.failing {
                return Err(StoreError::WriteFailed("disk full".into()));
            }
            self.inner.mark_completed(session_id, at)
        }
    }

    #[test]
    fn start_opens_session_at_first_question() {
        let (mut flow, _) = flow();
        assert_eq!(flow.current_screen().kind, ScreenKind::Welcome);

        let view = flow.submit(Intent::Start).unwrap();
        assert_eq!(view.kind, ScreenKind::InProgress);
        assert_eq!(view.cursor, Some(0));
        assert_eq!(view.total, Some(5));
        assert_eq!(view.question.unwrap().id, QuestionId(1));
        assert!(view.session_id.is_some());
        assert!(matches!(
            flow.drain_events().as_slice(),
            [SurveyEvent::SessionStarted { .. }]
        ));
    }

    #[test]
    fn full_walkthrough_completes_session() {
        let (mut flow, _) = flow();
        flow.submit(Intent::Start).unwrap();
        let id = session_id(&flow);

        for v in [4, 5, 3, 9] {
            flow.submit(rating(v)).unwrap();
            flow.submit(Intent::Next).unwrap();
        }
        flow.submit(Intent::Answer(AnswerValue::Text("Faster checkout".into())))
            .unwrap();
        let view = flow.submit(Intent::Next).unwrap();
        assert_eq!(view.kind, ScreenKind::Confirming);

        let view = flow.submit(Intent::Confirm).unwrap();
        assert_eq!(view.kind, ScreenKind::Completed);
        assert!(view.reset_at.is_some());

        let store = flow.store();
        assert_eq!(store.status(&id), Some(crate::storage::SessionStatus::Completed));
        let answers: Vec<AnswerValue> = store.answers(&id).into_iter().map(|r| r.answer).collect();
        assert_eq!(
            answers,
            vec![
                AnswerValue::Rating(4),
                AnswerValue::Rating(5),
                AnswerValue::Rating(3),
                AnswerValue::Rating(9),
                AnswerValue::Text("Faster checkout".into()),
            ]
        );
    }

    #[test]
    fn next_without_answer_writes_nothing() {
        let (mut flow, _) = flow();
        flow.submit(Intent::Start).unwrap();
        let view = flow.submit(Intent::Next).unwrap();
        assert_eq!(view.cursor, Some(1));
        assert!(flow.store().is_empty());
    }

    #[test]
    fn prev_at_first_question_is_clamped() {
        let (mut flow, _) = flow();
        flow.submit(Intent::Start).unwrap();
        let view = flow.submit(Intent::Prev).unwrap();
        assert_eq!(view.cursor, Some(0));
        assert_eq!(view.kind, ScreenKind::InProgress);
    }

    #[test]
    fn cancel_returns_to_last_question_without_status() {
        let (mut flow, _) = flow();
        flow.submit(Intent::Start).unwrap();
        let id = session_id(&flow);
        for _ in 0..5 {
            flow.submit(Intent::Next).unwrap();
        }
        assert_eq!(flow.current_screen().kind, ScreenKind::Confirming);

        let view = flow.submit(Intent::Cancel).unwrap();
        assert_eq!(view.kind, ScreenKind::InProgress);
        assert_eq!(view.cursor, Some(4));
        assert_eq!(flow.store().status(&id), None);
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let (mut flow, _) = flow();
        flow.submit(Intent::Start).unwrap();
        let before = flow.state().clone();
        flow.drain_events();

        let err = flow.submit(rating(11)).unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::OutOfRange { value: 11, min: 1, max: 5, .. })
        ));
        assert_eq!(flow.state(), &before);
        assert!(flow.store().is_empty());
        assert!(flow.drain_events().is_empty());
    }

    #[test]
    fn text_on_rating_question_is_rejected() {
        let (mut flow, _) = flow();
        flow.submit(Intent::Start).unwrap();
        let err = flow
            .submit(Intent::Answer(AnswerValue::Text("five".into())))
            .unwrap_err();
        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::WrongKind { .. })
        ));
    }

    #[test]
    fn revising_an_answer_overwrites() {
        let (mut flow, _) = flow();
        flow.submit(Intent::Start).unwrap();
        let id = session_id(&flow);
        flow.submit(rating(2)).unwrap();
        flow.submit(Intent::Next).unwrap();
        flow.submit(Intent::Prev).unwrap();
        let view = flow.submit(rating(5)).unwrap();
        assert_eq!(view.answer, Some(AnswerValue::Rating(5)));

        let records = flow.store().answers(&id);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].answer, AnswerValue::Rating(5));
    }

    #[test]
    fn view_shows_mirrored_answer_after_navigation() {
        let (mut flow, _) = flow();
        flow.submit(Intent::Start).unwrap();
        flow.submit(rating(3)).unwrap();
        let view = flow.submit(Intent::Next).unwrap();
        assert_eq!(view.answer, None);
        let view = flow.submit(Intent::Prev).unwrap();
        assert_eq!(view.answer, Some(AnswerValue::Rating(3)));
    }

    #[test]
    fn submission_allowed_with_missing_answers() {
        let (mut flow, _) = flow();
        flow.submit(Intent::Start).unwrap();
        for _ in 0..5 {
            flow.submit(Intent::Next).unwrap();
        }
        let view = flow.submit(Intent::Confirm).unwrap();
        assert_eq!(view.kind, ScreenKind::Completed);
    }

    #[test]
    fn invalid_transitions_are_reported_and_ignored() {
        let (mut flow, _) = flow();
        let err = flow.submit(Intent::Confirm).unwrap_err();
        assert!(matches!(
            err,
            FlowError::InvalidTransition { screen: "welcome", intent: "confirm" }
        ));
        assert_eq!(flow.state(), &FlowState::Welcome);

        flow.submit(Intent::Start).unwrap();
        assert!(matches!(
            flow.submit(Intent::Start),
            Err(FlowError::InvalidTransition { .. })
        ));
        assert!(matches!(
            flow.submit(Intent::Cancel),
            Err(FlowError::InvalidTransition { .. })
        ));
        assert!(matches!(
            flow.submit(Intent::RetrySave),
            Err(FlowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn completed_session_accepts_no_answers() {
        let (mut flow, _) = flow();
        flow.submit(Intent::Start).unwrap();
        let id = session_id(&flow);
        flow.submit(rating(1)).unwrap();
        for _ in 0..5 {
            flow.submit(Intent::Next).unwrap();
        }
        flow.submit(Intent::Confirm).unwrap();

        assert!(matches!(
            flow.submit(rating(4)),
            Err(FlowError::InvalidTransition { screen: "completed", .. })
        ));
        assert!(flow.submit(Intent::Confirm).is_err());
        assert_eq!(flow.store().answers(&id)[0].answer, AnswerValue::Rating(1));
    }

    #[test]
    fn timer_resets_to_welcome_and_keeps_records() {
        let (mut flow, clock) = flow();
        flow.submit(Intent::Start).unwrap();
        let id = session_id(&flow);
        flow.submit(rating(4)).unwrap();
        for _ in 0..5 {
            flow.submit(Intent::Next).unwrap();
        }
        flow.submit(Intent::Confirm).unwrap();

        clock.advance(Duration::seconds(4));
        assert!(!flow.tick());
        assert_eq!(flow.current_screen().kind, ScreenKind::Completed);

        clock.advance(Duration::seconds(1));
        assert!(flow.tick());
        let view = flow.current_screen();
        assert_eq!(view.kind, ScreenKind::Welcome);
        assert_eq!(view.cursor, None);
        assert!(flow.state().session().is_none());
        assert!(flow.reset_deadline().is_none());

        assert_eq!(flow.store().answers(&id).len(), 1);
        assert!(flow.store().status(&id).is_some());

        // A new respondent gets a new session.
        flow.submit(Intent::Start).unwrap();
        assert_ne!(session_id(&flow), id);
    }

    #[test]
    fn manual_reset_cancels_pending_timer() {
        let (mut flow, clock) = flow();
        flow.submit(Intent::Start).unwrap();
        for _ in 0..5 {
            flow.submit(Intent::Next).unwrap();
        }
        flow.submit(Intent::Confirm).unwrap();
        assert!(flow.reset_deadline().is_some());

        flow.reset();
        assert!(flow.reset_deadline().is_none());
        flow.submit(Intent::Start).unwrap();

        clock.advance(Duration::seconds(10));
        assert!(!flow.tick());
        assert_eq!(flow.current_screen().kind, ScreenKind::InProgress);
    }

    #[test]
    fn custom_reset_delay_is_honoured() {
        let (flow, clock) = flow();
        let mut flow = flow.with_reset_delay(Duration::seconds(30));
        flow.submit(Intent::Start).unwrap();
        for _ in 0..5 {
            flow.submit(Intent::Next).unwrap();
        }
        flow.submit(Intent::Confirm).unwrap();
        assert_eq!(flow.reset_remaining(), Some(Duration::seconds(30)));
        clock.advance(Duration::seconds(29));
        assert!(!flow.tick());
        clock.advance(Duration::seconds(1));
        assert!(flow.tick());
    }

    #[test]
    fn persistence_failure_holds_answer_and_blocks_navigation() {
        let clock = ManualClock::default();
        let mut flow = SurveyController::with_clock(
            QuestionCatalog::customer_satisfaction(),
            FlakyStore::default(),
            clock,
        );
        flow.submit(Intent::Start).unwrap();
        let id = session_id_of(&flow);

        flow_store_failing(&mut flow, true);
        let err = flow.submit(rating(4)).unwrap_err();
        assert!(matches!(err, FlowError::Persistence(_)));
        assert_eq!(flow.current_screen().unsaved, Some(AnswerValue::Rating(4)));
        assert_eq!(flow.current_screen().answer, None);

        assert!(matches!(
            flow.submit(Intent::Next),
            Err(FlowError::UnsavedAnswer { question_id: QuestionId(1) })
        ));
        assert_eq!(flow.state().cursor(), Some(0));

        flow_store_failing(&mut flow, false);
        let view = flow.submit(Intent::RetrySave).unwrap();
        assert_eq!(view.unsaved, None);
        assert_eq!(view.answer, Some(AnswerValue::Rating(4)));
        assert_eq!(flow.store().inner.answers(&id).len(), 1);
        assert_eq!(flow.submit(Intent::Next).unwrap().cursor, Some(1));
    }

    #[test]
    fn discarding_unsaved_answer_unblocks_navigation() {
        let mut flow = SurveyController::with_clock(
            QuestionCatalog::customer_satisfaction(),
            FlakyStore {
                failing: true,
                ..FlakyStore::default()
            },
            ManualClock::default(),
        );
        flow.submit(Intent::Start).unwrap();
        assert!(flow.submit(rating(2)).is_err());
        flow.drain_events();

        flow.submit(Intent::DiscardUnsaved).unwrap();
        assert!(matches!(
            flow.drain_events().as_slice(),
            [SurveyEvent::AnswerDiscarded { question_id: QuestionId(1), .. }]
        ));
        assert_eq!(flow.submit(Intent::Next).unwrap().cursor, Some(1));
        assert!(flow.store().inner.is_empty());
    }

    #[test]
    fn failed_completion_stays_confirming() {
        let mut flow = SurveyController::with_clock(
            QuestionCatalog::customer_satisfaction(),
            FlakyStore::default(),
            ManualClock::default(),
        );
        flow.submit(Intent::Start).unwrap();
        for _ in 0..5 {
            flow.submit(Intent::Next).unwrap();
        }
        flow_store_failing(&mut flow, true);
        assert!(matches!(
            flow.submit(Intent::Confirm),
            Err(FlowError::Persistence(_))
        ));
        assert_eq!(flow.current_screen().kind, ScreenKind::Confirming);
        assert!(flow.reset_deadline().is_none());

        flow_store_failing(&mut flow, false);
        assert_eq!(
            flow.submit(Intent::Confirm).unwrap().kind,
            ScreenKind::Completed
        );
    }

    #[test]
    fn single_question_catalog_goes_straight_to_confirm() {
        let catalog = QuestionCatalog::new(vec![Question::free_text(7, "Anything else?")]).unwrap();
        let mut flow =
            SurveyController::with_clock(catalog, MemoryAnswerStore::new(), ManualClock::default());
        flow.submit(Intent::Start).unwrap();
        flow.submit(Intent::Answer(AnswerValue::Text(String::new())))
            .unwrap();
        assert_eq!(flow.submit(Intent::Prev).unwrap().cursor, Some(0));
        assert_eq!(
            flow.submit(Intent::Next).unwrap().kind,
            ScreenKind::Confirming
        );
    }

    #[test]
    fn events_follow_the_walkthrough() {
        let (mut flow, _) = flow();
        flow.submit(Intent::Start).unwrap();
        flow.submit(rating(4)).unwrap();
        flow.submit(Intent::Next).unwrap();
        let kinds: Vec<&str> = flow
            .drain_events()
            .iter()
            .map(|e| match e {
                SurveyEvent::SessionStarted { .. } => "started",
                SurveyEvent::AnswerRecorded { .. } => "recorded",
                SurveyEvent::CursorMoved { .. } => "moved",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["started", "recorded", "moved"]);
        assert!(flow.drain_events().is_empty());
    }

    #[test]
    fn oversized_reset_delay_saturates_instead_of_overflowing() {
        let (flow, _) = flow();
        let mut flow = flow.with_reset_delay(Duration::seconds(10_000_000_000_000));
        flow.submit(Intent::Start).unwrap();
        for _ in 0..5 {
            flow.submit(Intent::Next).unwrap();
        }
        let view = flow.submit(Intent::Confirm).unwrap();
        assert_eq!(view.kind, ScreenKind::Completed);
        assert_eq!(view.reset_at, Some(DateTime::<Utc>::MAX_UTC));
        assert!(!flow.tick());
        assert!(flow.reset_remaining().unwrap() > Duration::zero());
    }

    #[test]
    fn reset_on_welcome_emits_nothing() {
        let (mut flow, _) = flow();
        flow.reset();
        assert!(flow.drain_events().is_empty());

        flow.submit(Intent::Start).unwrap();
        flow.drain_events();
        flow.reset();
        assert!(matches!(
            flow.drain_events().as_slice(),
            [SurveyEvent::FlowReset { .. }]
        ));
    }

    fn session_id_of(flow: &SurveyController<FlakyStore, ManualClock>) -> SessionId {
        flow.state().session().unwrap().id().clone()
    }

    fn flow_store_failing(flow: &mut SurveyController<FlakyStore, ManualClock>, failing: bool) {
        flow.store.failing = failing;
    }
}
