//! Learning Intake: guided conversational intake that builds a learning
//! profile.

pub mod cli;
pub mod config;
pub mod error;
pub mod intake;
