//! Learning profile data model and the normalization helpers that feed it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IntakeError;

/// Hours per week assumed until the hours step overwrites it.
pub const DEFAULT_HOURS_PER_WEEK: u32 = 6;

/// Self-assessed overall level, chosen from a fixed menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Mixed,
}

impl SkillLevel {
    /// Menu order.
    pub const ALL: [SkillLevel; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Mixed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Mixed => "Mixed",
        }
    }
}

impl Default for SkillLevel {
    fn default() -> Self {
        Self::Beginner
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SkillLevel {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| IntakeError::UnknownOption {
                field: "current_level",
                value: trimmed.to_string(),
            })
    }
}

/// Course providers offered on the multi-select step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    Coursera,
    #[serde(rename = "edX")]
    EdX,
    Udemy,
    YouTube,
    #[serde(rename = "Kaggle Learn")]
    KaggleLearn,
    #[serde(rename = "No preference")]
    NoPreference,
}

impl Provider {
    /// Menu order.
    pub const ALL: [Provider; 6] = [
        Self::Coursera,
        Self::EdX,
        Self::Udemy,
        Self::YouTube,
        Self::KaggleLearn,
        Self::NoPreference,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Coursera => "Coursera",
            Self::EdX => "edX",
            Self::Udemy => "Udemy",
            Self::YouTube => "YouTube",
            Self::KaggleLearn => "Kaggle Learn",
            Self::NoPreference => "No preference",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Provider {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| IntakeError::UnknownOption {
                field: "preferred_providers",
                value: trimmed.to_string(),
            })
    }
}

/// Weekly study time offered on the hours step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoursChoice {
    Four,
    Six,
    Ten,
}

impl HoursChoice {
    pub const ALL: [HoursChoice; 3] = [Self::Four, Self::Six, Self::Ten];

    pub fn hours(&self) -> u32 {
        match self {
            Self::Four => 4,
            Self::Six => 6,
            Self::Ten => 10,
        }
    }
}

impl TryFrom<u32> for HoursChoice {
    type Error = IntakeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.hours() == value)
            .ok_or_else(|| IntakeError::UnknownOption {
                field: "hours_per_week",
                value: value.to_string(),
            })
    }
}

/// Target timeframe offered on the timeframe step. "No deadline" is the
/// absence of a choice (`None`), not a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeframeChoice {
    FourWeeks,
    EightWeeks,
    TwelveWeeks,
}

impl TimeframeChoice {
    pub const ALL: [TimeframeChoice; 3] = [Self::FourWeeks, Self::EightWeeks, Self::TwelveWeeks];

    pub fn weeks(&self) -> u32 {
        match self {
            Self::FourWeeks => 4,
            Self::EightWeeks => 8,
            Self::TwelveWeeks => 12,
        }
    }
}

impl TryFrom<u32> for TimeframeChoice {
    type Error = IntakeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.weeks() == value)
            .ok_or_else(|| IntakeError::UnknownOption {
                field: "timeframe_weeks",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentLevel {
    pub overall: SkillLevel,
    /// Never populated by the intake flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeCommitment {
    pub hours_per_week: u32,
    /// `None` means no deadline.
    pub timeframe_weeks: Option<u32>,
}

impl Default for TimeCommitment {
    fn default() -> Self {
        Self {
            hours_per_week: DEFAULT_HOURS_PER_WEEK,
            timeframe_weeks: None,
        }
    }
}

/// The structured record built up across the intake.
///
/// Serializes to the payload shape handed to the plan generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningProfile {
    pub name: String,
    pub learning_goals: Vec<String>,
    pub learning_topics: Vec<String>,
    pub current_level: CurrentLevel,
    /// Insertion-ordered, no duplicates.
    pub preferred_providers: Vec<String>,
    pub special_requirements: Vec<String>,
    pub time_commitment: TimeCommitment,
}

impl LearningProfile {
    /// Render what has been collected so far as a short markdown summary.
    pub fn summary(&self) -> String {
        let mut parts = vec!["# Learning Profile".to_string()];

        parts.push(format!("- **Name:** {}", self.name));

        if !self.learning_goals.is_empty() {
            parts.push(format!("- **Goals:** {}", self.learning_goals.join(", ")));
        }
        if !self.learning_topics.is_empty() {
            parts.push(format!("- **Topics:** {}", self.learning_topics.join(", ")));
        }

        parts.push(format!("- **Level:** {}", self.current_level.overall));

        if self.preferred_providers.is_empty() {
            parts.push("- **Providers:** No preference".to_string());
        } else {
            parts.push(format!(
                "- **Providers:** {}",
                self.preferred_providers.join(", ")
            ));
        }

        if !self.special_requirements.is_empty() {
            parts.push(format!(
                "- **Requirements:** {}",
                self.special_requirements.join(", ")
            ));
        }

        parts.push(format!(
            "- **Time:** {} hours / week",
            self.time_commitment.hours_per_week
        ));
        match self.time_commitment.timeframe_weeks {
            Some(weeks) => parts.push(format!("- **Timeframe:** {weeks} weeks")),
            None => parts.push("- **Timeframe:** No deadline".to_string()),
        }

        parts.join("\n")
    }
}

/// Split on commas and trim each segment.
///
/// Only the empty string yields an empty list; anything else yields at least
/// one element, and empty segments between commas are kept.
pub fn split_comma_list(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(',').map(|s| s.trim().to_string()).collect()
}

/// Remove `value` if present, otherwise append it. The rest keeps its order.
pub fn toggle_membership(set: &[String], value: &str) -> Vec<String> {
    if set.iter().any(|v| v == value) {
        set.iter().filter(|v| *v != value).cloned().collect()
    } else {
        let mut next = set.to_vec();
        next.push(value.to_string());
        next
    }
}
