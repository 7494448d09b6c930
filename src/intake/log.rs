//! JSON-Lines transcript log: an on-disk audit trail of intake conversations.
//!
//! One record per line:
//! `{"session_id": "...", "role": "user", "content": "...", "timestamp": "..."}`

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::TranscriptLogError;

use super::transcript::{Message, Role};

/// A transcript message stamped with its session and time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedMessage {
    pub session_id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl LoggedMessage {
    pub fn new(session_id: Uuid, message: &Message) -> Self {
        Self {
            session_id,
            role: message.role,
            content: message.content.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only JSONL file of logged messages.
#[derive(Debug, Clone)]
pub struct TranscriptLog {
    path: PathBuf,
}

impl TranscriptLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, message: &LoggedMessage) -> Result<(), TranscriptLogError> {
        self.extend(std::slice::from_ref(message)).await
    }

    /// Append several records with a single write.
    pub async fn extend(&self, messages: &[LoggedMessage]) -> Result<(), TranscriptLogError> {
        if messages.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut buf = String::new();
        for message in messages {
            buf.push_str(&serde_json::to_string(message)?);
            buf.push('\n');
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Read every record back. A missing file is an empty log.
    pub async fn load(&self) -> Result<Vec<LoggedMessage>, TranscriptLogError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).await?;

        let mut messages = Vec::new();
        for (i, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let message = serde_json::from_str(line)
                .map_err(|source| TranscriptLogError::Malformed { line: i + 1, source })?;
            messages.push(message);
        }
        Ok(messages)
    }

    /// Records belonging to one session, in log order.
    pub async fn load_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<LoggedMessage>, TranscriptLogError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|m| m.session_id == session_id)
            .collect())
    }
}
