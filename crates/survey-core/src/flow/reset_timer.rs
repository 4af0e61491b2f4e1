//! One-shot auto-reset timer.
//!
//! Like the rest of the engine this has no thread of its own: it stores a
//! deadline and the owner polls it. Firing is reported at most once per
//! `start`.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetTimer {
    deadline: Option<DateTime<Utc>>,
}

impl ResetTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `delay` after `now`, replacing any pending
    /// deadline. A deadline past the representable range saturates.
    /// Returns the armed deadline.
    pub fn start(&mut self, delay: Duration, now: DateTime<Utc>) -> DateTime<Utc> {
        let deadline = now.checked_add_signed(delay).unwrap_or(if delay < Duration::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });
        self.deadline = Some(deadline);
        deadline
    }

    /// Disarm. Returns true if a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Time left until firing, zero once due.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.deadline.map(|d| (d - now).max(Duration::zero()))
    }

    /// Returns true exactly once when the deadline has passed, and disarms.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
