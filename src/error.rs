//! Error types for the learning intake.

use crate::intake::StepId;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    #[error("Transcript log error: {0}")]
    TranscriptLog(#[from] TranscriptLogError),

    #[error("Handoff error: {0}")]
    Handoff(#[from] HandoffError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Rejected intake actions. None of these change the dialog state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("Action {action} is not available at step {step}")]
    InvalidStepAction { action: &'static str, step: StepId },

    #[error("Empty answer rejected at step {step}")]
    EmptyAnswerRejected { step: StepId },

    #[error("Unknown option for {field}: {value:?}")]
    UnknownOption { field: &'static str, value: String },

    #[error("Intake already completed")]
    AlreadyCompleted,
}

/// Transcript log I/O errors.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The completion handler failed to accept the profile.
#[derive(Debug, thiserror::Error)]
#[error("Completion handler failed: {0}")]
pub struct HandoffError(pub anyhow::Error);

/// Result type alias for the intake.
pub type Result<T> = std::result::Result<T, Error>;
