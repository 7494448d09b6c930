//! Append-only record of the prompts and answers exchanged during an intake.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assistant => write!(f, "assistant"),
            Self::User => write!(f, "user"),
        }
    }
}

/// A single exchanged message. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Ordered conversation history. Exposes appends and reads only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    pub(crate) fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Messages appended at or after position `from`.
    pub fn since(&self, from: usize) -> &[Message] {
        self.messages.get(from..).unwrap_or(&[])
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_preserve_order() {
        let mut t = Transcript::new();
        t.push_assistant("hello?");
        t.push_user("hi");
        t.push_assistant("next?");

        let roles: Vec<Role> = t.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(t.last().unwrap().content, "next?");
    }

    #[test]
    fn since_returns_tail() {
        let mut t = Transcript::new();
        t.push_assistant("a");
        t.push_user("b");
        assert_eq!(t.since(1), &[Message::user("b")]);
        assert!(t.since(2).is_empty());
        assert!(t.since(10).is_empty());
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut t = Transcript::new();
        t.push_user("Ada");
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json, serde_json::json!([{"role": "user", "content": "Ada"}]));
    }
}
