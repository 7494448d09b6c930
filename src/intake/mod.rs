//! Guided learning intake: a forward-only conversation that fills in a
//! `LearningProfile`.
//!
//! The engine walks a fixed table of steps. Each step accepts one kind of
//! input (free text, a level, provider toggles, hours, a timeframe), merges
//! the normalized answer into the profile, and appends the exchange to the
//! transcript. The finished profile is handed to a `CompletionHandler`.

pub mod engine;
pub mod handoff;
pub mod log;
pub mod model;
pub mod session;
pub mod steps;
pub mod transcript;

pub use engine::{ActionOutcome, DialogState, IntakeAction, IntakeEngine};
pub use handoff::{CompletionHandler, JsonProfileWriter, PlannerProfile};
pub use log::{LoggedMessage, TranscriptLog};
pub use model::{
    CurrentLevel, HoursChoice, LearningProfile, Provider, SkillLevel, TimeCommitment,
    TimeframeChoice, split_comma_list, toggle_membership,
};
pub use session::IntakeSession;
pub use steps::{Modality, STEPS, StepDescriptor, StepId, TextField};
pub use transcript::{Message, Role, Transcript};
