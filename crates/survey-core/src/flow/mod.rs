mod controller;
mod reset_timer;
mod state;

pub use controller::{SurveyController, DEFAULT_RESET_DELAY_SECS};
pub use reset_timer::ResetTimer;
pub use state::{ActiveSession, FlowState, Intent, ScreenKind, ScreenView, UnsavedAnswer};
