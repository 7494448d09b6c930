//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

pub const ENV_TRANSCRIPT_LOG: &str = "LEARNING_INTAKE_TRANSCRIPT_LOG";
pub const ENV_PROFILE_OUT: &str = "LEARNING_INTAKE_PROFILE_OUT";
pub const ENV_LOG: &str = "LEARNING_INTAKE_LOG";

/// Intake runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    /// JSONL file mirroring every transcript message. Disabled when `None`.
    pub transcript_log: Option<PathBuf>,
    /// Where the finished profile is written. Stdout when `None`.
    pub profile_output: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            transcript_log: None,
            profile_output: None,
            log_filter: "info".to_string(),
        }
    }
}

impl IntakeConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup. A key that is set but empty is
    /// rejected rather than treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| -> Result<Option<String>, ConfigError> {
            match lookup(key) {
                Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must not be empty".to_string(),
                }),
                other => Ok(other),
            }
        };

        let defaults = Self::default();
        Ok(Self {
            transcript_log: non_empty(ENV_TRANSCRIPT_LOG)?.map(PathBuf::from),
            profile_output: non_empty(ENV_PROFILE_OUT)?.map(PathBuf::from),
            log_filter: non_empty(ENV_LOG)?.unwrap_or(defaults.log_filter),
        })
    }
}
