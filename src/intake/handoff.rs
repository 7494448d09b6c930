//! Completion boundary: where a finished profile leaves the intake.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::model::LearningProfile;

/// Receives the finished profile (e.g. to generate a learning plan).
///
/// Errors are the implementor's to define; the session only reports them.
#[async_trait]
pub trait CompletionHandler: Send + Sync {
    async fn on_complete(&self, profile: &LearningProfile) -> anyhow::Result<()>;
}

/// Writes the profile as pretty JSON to a file, or to stdout.
#[derive(Debug, Clone, Default)]
pub struct JsonProfileWriter {
    path: Option<PathBuf>,
}

impl JsonProfileWriter {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn stdout() -> Self {
        Self { path: None }
    }
}

#[async_trait]
impl CompletionHandler for JsonProfileWriter {
    async fn on_complete(&self, profile: &LearningProfile) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(profile)?;
        match &self.path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
                tokio::fs::write(path, format!("{json}\n")).await?;
                tracing::info!("Wrote learning profile to {}", path.display());
            }
            None => println!("{json}"),
        }
        Ok(())
    }
}

/// The planner's view of a learner, with its fallbacks filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerProfile {
    pub name: String,
    pub learning_goal: String,
    pub interested_topics: Vec<String>,
    pub current_level: String,
    pub provider_requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_time_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe_weeks: Option<u32>,
    pub phased_focus: Vec<String>,
    pub special_requirements: Vec<String>,
}

impl PlannerProfile {
    pub const DEFAULT_NAME: &'static str = "Learner";
    pub const DEFAULT_GOAL: &'static str = "Grow data skills";
    pub const DEFAULT_TOPIC: &'static str = "python";
    pub const DEFAULT_PROVIDER: &'static str = "DataCamp";

    pub fn from_payload(payload: &LearningProfile) -> Self {
        let name = if payload.name.trim().is_empty() {
            Self::DEFAULT_NAME.to_string()
        } else {
            payload.name.clone()
        };
        let learning_goal = if payload.learning_goals.is_empty() {
            Self::DEFAULT_GOAL.to_string()
        } else {
            payload.learning_goals.join(", ")
        };
        let interested_topics = if payload.learning_topics.is_empty() {
            vec![Self::DEFAULT_TOPIC.to_string()]
        } else {
            payload.learning_topics.clone()
        };
        let provider_requirements = if payload.preferred_providers.is_empty() {
            vec![Self::DEFAULT_PROVIDER.to_string()]
        } else {
            payload.preferred_providers.clone()
        };

        Self {
            name,
            learning_goal,
            interested_topics,
            current_level: payload.current_level.overall.label().to_string(),
            provider_requirements,
            weekly_time_hours: Some(payload.time_commitment.hours_per_week),
            timeframe_weeks: payload.time_commitment.timeframe_weeks,
            phased_focus: Vec::new(),
            special_requirements: payload.special_requirements.clone(),
        }
    }
}

impl From<&LearningProfile> for PlannerProfile {
    fn from(payload: &LearningProfile) -> Self {
        Self::from_payload(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::model::{CurrentLevel, SkillLevel, TimeCommitment};
    use tempfile::TempDir;

    #[test]
    fn empty_payload_gets_planner_fallbacks() {
        let planner = PlannerProfile::from_payload(&LearningProfile::default());
        assert_eq!(planner.name, "Learner");
        assert_eq!(planner.learning_goal, "Grow data skills");
        assert_eq!(planner.interested_topics, vec!["python".to_string()]);
        assert_eq!(planner.provider_requirements, vec!["DataCamp".to_string()]);
        assert_eq!(planner.current_level, "Beginner");
        assert_eq!(planner.weekly_time_hours, Some(6));
        assert_eq!(planner.timeframe_weeks, None);
        assert!(planner.phased_focus.is_empty());
    }

    #[test]
    fn filled_payload_carries_through() {
        let payload = LearningProfile {
            name: "Ada".to_string(),
            learning_goals: vec!["ML projects".to_string(), "new job".to_string()],
            learning_topics: vec!["pandas".to_string()],
            current_level: CurrentLevel {
                overall: SkillLevel::Intermediate,
                notes: None,
            },
            preferred_providers: vec!["edX".to_string()],
            special_requirements: vec!["certificate".to_string()],
            time_commitment: TimeCommitment {
                hours_per_week: 10,
                timeframe_weeks: Some(8),
            },
        };
        let planner = PlannerProfile::from(&payload);
        assert_eq!(planner.name, "Ada");
        assert_eq!(planner.learning_goal, "ML projects, new job");
        assert_eq!(planner.interested_topics, vec!["pandas".to_string()]);
        assert_eq!(planner.current_level, "Intermediate");
        assert_eq!(planner.provider_requirements, vec!["edX".to_string()]);
        assert_eq!(planner.weekly_time_hours, Some(10));
        assert_eq!(planner.timeframe_weeks, Some(8));
        assert_eq!(planner.special_requirements, vec!["certificate".to_string()]);
    }

    #[tokio::test]
    async fn json_writer_writes_payload_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/profile.json");
        let writer = JsonProfileWriter::new(Some(path.clone()));

        let profile = LearningProfile {
            name: "Ada".to_string(),
            ..Default::default()
        };
        writer.on_complete(&profile).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: LearningProfile = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, profile);
    }
}
