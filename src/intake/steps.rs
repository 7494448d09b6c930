//! Intake step table: one descriptor per step, looked up by the current
//! step instead of branching on a bare index.

use serde::{Deserialize, Serialize};

use super::engine::IntakeAction;
use super::model::{split_comma_list, LearningProfile};

/// The steps of the intake conversation.
///
/// Route: Name → Goals → Topics → Level → Providers → Requirements → Hours →
/// Timeframe → Summary. The index is the stable step number exposed to
/// callers and does not follow the route order between Level and Hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Name,
    Goals,
    Topics,
    Level,
    Requirements,
    Providers,
    Hours,
    Timeframe,
    Summary,
}

impl StepId {
    pub const ALL: [StepId; 9] = [
        Self::Name,
        Self::Goals,
        Self::Topics,
        Self::Level,
        Self::Requirements,
        Self::Providers,
        Self::Hours,
        Self::Timeframe,
        Self::Summary,
    ];

    pub fn index(&self) -> usize {
        match self {
            Self::Name => 0,
            Self::Goals => 1,
            Self::Topics => 2,
            Self::Level => 3,
            Self::Requirements => 4,
            Self::Providers => 5,
            Self::Hours => 6,
            Self::Timeframe => 7,
            Self::Summary => 8,
        }
    }

    pub fn from_index(index: usize) -> Option<StepId> {
        Self::ALL.get(index).copied()
    }

    pub fn descriptor(&self) -> &'static StepDescriptor {
        &STEPS[self.index()]
    }

    /// The step entered after this one, if any.
    pub fn next(&self) -> Option<StepId> {
        self.descriptor().next
    }

    /// Whether `target` directly follows `self` on the route.
    pub fn can_transition_to(&self, target: StepId) -> bool {
        self.next() == Some(target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.descriptor().modality, Modality::Terminal)
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::Name
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Goals => "goals",
            Self::Topics => "topics",
            Self::Level => "level",
            Self::Requirements => "requirements",
            Self::Providers => "providers",
            Self::Hours => "hours",
            Self::Timeframe => "timeframe",
            Self::Summary => "summary",
        };
        write!(f, "{s}")
    }
}

/// Profile field a free-text step writes, with its normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    LearningGoals,
    LearningTopics,
    SpecialRequirements,
}

impl TextField {
    /// Merge an already-trimmed answer into the profile.
    pub fn merge(&self, profile: &mut LearningProfile, answer: &str) {
        match self {
            Self::Name => profile.name = answer.to_string(),
            Self::LearningGoals => profile.learning_goals = split_comma_list(answer),
            Self::LearningTopics => profile.learning_topics = split_comma_list(answer),
            Self::SpecialRequirements => {
                profile.special_requirements = split_comma_list(answer)
            }
        }
    }
}

/// The kind of input a step accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    FreeText { field: TextField, allow_empty: bool },
    LevelChoice,
    /// Toggles stay on the step; confirm advances.
    ProviderSelect,
    HoursChoice,
    /// Weeks or no deadline.
    TimeframeChoice,
    Terminal,
}

impl Modality {
    /// Whether `action` is offered at a step of this modality.
    pub fn accepts(&self, action: &IntakeAction) -> bool {
        matches!(
            (self, action),
            (Self::FreeText { .. }, IntakeAction::SubmitText(_))
                | (Self::LevelChoice, IntakeAction::ChooseLevel(_))
                | (Self::ProviderSelect, IntakeAction::ToggleProvider(_))
                | (Self::ProviderSelect, IntakeAction::ConfirmProviders)
                | (Self::HoursChoice, IntakeAction::ChooseHours(_))
                | (Self::TimeframeChoice, IntakeAction::ChooseTimeframe(_))
                | (Self::Terminal, IntakeAction::Complete)
        )
    }

    pub fn is_free_text(&self) -> bool {
        matches!(self, Self::FreeText { .. })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StepDescriptor {
    pub id: StepId,
    pub modality: Modality,
    /// Assistant prompt appended when the step is entered.
    pub prompt: &'static str,
    pub next: Option<StepId>,
}

/// Indexed by `StepId::index`.
pub static STEPS: [StepDescriptor; 9] = [
    StepDescriptor {
        id: StepId::Name,
        modality: Modality::FreeText {
            field: TextField::Name,
            allow_empty: false,
        },
        prompt: "Before we start, what should I call you?",
        next: Some(StepId::Goals),
    },
    StepDescriptor {
        id: StepId::Goals,
        modality: Modality::FreeText {
            field: TextField::LearningGoals,
            allow_empty: false,
        },
        prompt: "What are you learning for right now? You can mention more than one goal.",
        next: Some(StepId::Topics),
    },
    StepDescriptor {
        id: StepId::Topics,
        modality: Modality::FreeText {
            field: TextField::LearningTopics,
            allow_empty: false,
        },
        prompt: "What topics do you want to focus on? You can list multiple areas.",
        next: Some(StepId::Level),
    },
    StepDescriptor {
        id: StepId::Level,
        modality: Modality::LevelChoice,
        prompt: "How would you describe your current level overall?",
        next: Some(StepId::Providers),
    },
    StepDescriptor {
        id: StepId::Requirements,
        modality: Modality::FreeText {
            field: TextField::SpecialRequirements,
            allow_empty: true,
        },
        prompt: "Any special requirements? (certifications, language, tools, etc.)",
        next: Some(StepId::Hours),
    },
    StepDescriptor {
        id: StepId::Providers,
        modality: Modality::ProviderSelect,
        prompt: "Do you have preferred course providers? (You can choose multiple.)",
        next: Some(StepId::Requirements),
    },
    StepDescriptor {
        id: StepId::Hours,
        modality: Modality::HoursChoice,
        prompt: "How many hours per week can you realistically commit?",
        next: Some(StepId::Timeframe),
    },
    StepDescriptor {
        id: StepId::Timeframe,
        modality: Modality::TimeframeChoice,
        prompt: "Do you have a target timeframe?",
        next: Some(StepId::Summary),
    },
    StepDescriptor {
        id: StepId::Summary,
        modality: Modality::Terminal,
        prompt: "Here's what I've understood. Ready to generate your plan?",
        next: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::model::SkillLevel;

    #[test]
    fn table_is_indexed_by_step() {
        for (i, step) in STEPS.iter().enumerate() {
            assert_eq!(step.id.index(), i, "{} is at the wrong slot", step.id);
            assert_eq!(StepId::from_index(i), Some(step.id));
        }
        assert_eq!(StepId::from_index(9), None);
    }

    #[test]
    fn route_visits_every_step_once() {
        let mut seen = vec![StepId::Name];
        let mut current = StepId::Name;
        while let Some(next) = current.next() {
            assert!(!seen.contains(&next), "{next} visited twice");
            seen.push(next);
            current = next;
        }
        assert_eq!(seen.len(), STEPS.len());
        assert_eq!(current, StepId::Summary);
        assert!(current.is_terminal());
    }

    #[test]
    fn level_leads_to_providers() {
        assert!(StepId::Level.can_transition_to(StepId::Providers));
        assert!(StepId::Providers.can_transition_to(StepId::Requirements));
        assert!(StepId::Requirements.can_transition_to(StepId::Hours));
        // no skipping or going back
        assert!(!StepId::Level.can_transition_to(StepId::Requirements));
        assert!(!StepId::Goals.can_transition_to(StepId::Name));
        assert!(!StepId::Summary.can_transition_to(StepId::Name));
    }

    #[test]
    fn only_requirements_allows_empty_text() {
        for step in &STEPS {
            if let Modality::FreeText { allow_empty, .. } = step.modality {
                assert_eq!(allow_empty, step.id == StepId::Requirements);
            }
        }
    }

    #[test]
    fn modality_accepts_only_its_actions() {
        let level = Modality::LevelChoice;
        assert!(level.accepts(&IntakeAction::ChooseLevel(SkillLevel::Mixed)));
        assert!(!level.accepts(&IntakeAction::SubmitText("Mixed".into())));
        assert!(!level.accepts(&IntakeAction::Complete));

        let select = Modality::ProviderSelect;
        assert!(select.accepts(&IntakeAction::ConfirmProviders));
        assert!(!select.accepts(&IntakeAction::ChooseTimeframe(None)));
    }

    #[test]
    fn display_matches_serde() {
        for step in StepId::ALL {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{step}\""), json);
        }
    }
}
