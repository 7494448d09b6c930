//! IntakeEngine: applies actions to the dialog state according to the step
//! table.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::IntakeError;

use super::model::{
    toggle_membership, HoursChoice, LearningProfile, Provider, SkillLevel, TimeframeChoice,
};
use super::steps::{Modality, StepDescriptor, StepId};
use super::transcript::Transcript;

/// An input the caller can submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeAction {
    SubmitText(String),
    ChooseLevel(SkillLevel),
    ToggleProvider(Provider),
    ConfirmProviders,
    ChooseHours(HoursChoice),
    /// `None` means no deadline.
    ChooseTimeframe(Option<TimeframeChoice>),
    Complete,
}

impl IntakeAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitText(_) => "submit_text",
            Self::ChooseLevel(_) => "choose_level",
            Self::ToggleProvider(_) => "toggle_provider",
            Self::ConfirmProviders => "confirm_providers",
            Self::ChooseHours(_) => "choose_hours",
            Self::ChooseTimeframe(_) => "choose_timeframe",
            Self::Complete => "complete",
        }
    }
}

/// What an accepted action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The answer was merged and the intake moved to `to`.
    Advanced { from: StepId, to: StepId },
    /// A provider was toggled; `selected` is its new membership.
    Toggled { provider: Provider, selected: bool },
    /// The intake is finished; the profile is ready for handoff.
    Completed(LearningProfile),
}

/// Everything the engine owns: step pointer, transcript, profile so far, and
/// the unsent input buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogState {
    pub step: StepId,
    pub transcript: Transcript,
    pub profile: LearningProfile,
    pub pending_input: String,
}

impl Default for DialogState {
    fn default() -> Self {
        let step = StepId::default();
        let mut transcript = Transcript::new();
        transcript.push_assistant(step.descriptor().prompt);
        Self {
            step,
            transcript,
            profile: LearningProfile::default(),
            pending_input: String::new(),
        }
    }
}

impl DialogState {
    /// Whether every answering step has been passed.
    pub fn is_ready(&self) -> bool {
        self.step.is_terminal()
    }
}

/// Single-writer controller for one intake conversation.
///
/// Every action is validated against the current step before anything is
/// touched, so a rejected action leaves the state exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct IntakeEngine {
    state: DialogState,
}

impl IntakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> DialogState {
        self.state.clone()
    }

    pub fn step(&self) -> StepId {
        self.state.step
    }

    pub fn current_step(&self) -> &'static StepDescriptor {
        self.state.step.descriptor()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.state.transcript
    }

    pub fn profile(&self) -> &LearningProfile {
        &self.state.profile
    }

    /// Replace the unsent input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.pending_input = text.into();
    }

    /// Submit whatever is in the input buffer as free text.
    pub fn submit_input(&mut self) -> Result<ActionOutcome, IntakeError> {
        let text = self.state.pending_input.clone();
        self.submit_text(&text)
    }

    pub fn submit_text(&mut self, raw: &str) -> Result<ActionOutcome, IntakeError> {
        self.apply(IntakeAction::SubmitText(raw.to_string()))
    }

    pub fn choose_level(&mut self, level: SkillLevel) -> Result<ActionOutcome, IntakeError> {
        self.apply(IntakeAction::ChooseLevel(level))
    }

    pub fn toggle_provider(&mut self, provider: Provider) -> Result<ActionOutcome, IntakeError> {
        self.apply(IntakeAction::ToggleProvider(provider))
    }

    pub fn confirm_providers(&mut self) -> Result<ActionOutcome, IntakeError> {
        self.apply(IntakeAction::ConfirmProviders)
    }

    pub fn choose_hours(&mut self, hours: HoursChoice) -> Result<ActionOutcome, IntakeError> {
        self.apply(IntakeAction::ChooseHours(hours))
    }

    pub fn choose_timeframe(
        &mut self,
        timeframe: Option<TimeframeChoice>,
    ) -> Result<ActionOutcome, IntakeError> {
        self.apply(IntakeAction::ChooseTimeframe(timeframe))
    }

    /// Hand back the finished profile. Only offered on the summary step and
    /// does not touch the transcript.
    pub fn complete(&mut self) -> Result<LearningProfile, IntakeError> {
        match self.apply(IntakeAction::Complete)? {
            ActionOutcome::Completed(profile) => Ok(profile),
            // Complete only ever produces Completed
            _ => Err(IntakeError::InvalidStepAction {
                action: "complete",
                step: self.state.step,
            }),
        }
    }

    /// Apply one action to the current step.
    pub fn apply(&mut self, action: IntakeAction) -> Result<ActionOutcome, IntakeError> {
        let descriptor = self.current_step();
        if !descriptor.modality.accepts(&action) {
            debug!(
                step = %descriptor.id,
                action = action.name(),
                "Rejected action not offered at this step"
            );
            return Err(IntakeError::InvalidStepAction {
                action: action.name(),
                step: descriptor.id,
            });
        }

        let action_name = action.name();
        let profile = &mut self.state.profile;
        let shown = match (descriptor.modality, action) {
            (Modality::FreeText { field, allow_empty }, IntakeAction::SubmitText(raw)) => {
                let answer = raw.trim();
                if answer.is_empty() && !allow_empty {
                    debug!(step = %descriptor.id, "Rejected empty answer");
                    return Err(IntakeError::EmptyAnswerRejected {
                        step: descriptor.id,
                    });
                }
                field.merge(profile, answer);
                if answer.is_empty() {
                    "None".to_string()
                } else {
                    answer.to_string()
                }
            }
            (_, IntakeAction::ChooseLevel(level)) => {
                profile.current_level.overall = level;
                level.label().to_string()
            }
            (_, IntakeAction::ToggleProvider(provider)) => {
                profile.preferred_providers =
                    toggle_membership(&profile.preferred_providers, provider.label());
                let selected = profile
                    .preferred_providers
                    .iter()
                    .any(|p| p == provider.label());
                debug!(provider = provider.label(), selected, "Toggled provider");
                return Ok(ActionOutcome::Toggled { provider, selected });
            }
            (_, IntakeAction::ConfirmProviders) => {
                if profile.preferred_providers.is_empty() {
                    "No preference".to_string()
                } else {
                    profile.preferred_providers.join(", ")
                }
            }
            (_, IntakeAction::ChooseHours(hours)) => {
                profile.time_commitment.hours_per_week = hours.hours();
                format!("{} hours / week", hours.hours())
            }
            (_, IntakeAction::ChooseTimeframe(timeframe)) => {
                let weeks = timeframe.map(|t| t.weeks());
                profile.time_commitment.timeframe_weeks = weeks;
                match weeks {
                    Some(w) => format!("{w} weeks"),
                    None => "No deadline".to_string(),
                }
            }
            (_, IntakeAction::Complete) => {
                info!(name = %profile.name, "Intake complete, handing off profile");
                return Ok(ActionOutcome::Completed(profile.clone()));
            }
            (_, IntakeAction::SubmitText(_)) => {
                return Err(IntakeError::InvalidStepAction {
                    action: action_name,
                    step: descriptor.id,
                });
            }
        };

        Ok(self.advance(descriptor, shown))
    }

    /// Record the user's answer, enter the next step, and post its prompt.
    fn advance(&mut self, from: &'static StepDescriptor, shown: String) -> ActionOutcome {
        // Only the terminal step has no successor, and it never advances.
        let to = from.next.unwrap_or(from.id);

        self.state.transcript.push_user(shown);
        self.state.transcript.push_assistant(to.descriptor().prompt);
        self.state.step = to;
        self.state.pending_input.clear();

        debug!(from = %from.id, to = %to, "Advanced intake step");
        if to.is_terminal() {
            info!("Intake reached summary step");
        }

        ActionOutcome::Advanced { from: from.id, to }
    }
}
