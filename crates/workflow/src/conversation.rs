//! Append-only conversation log.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced an exchange entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// One turn in the conversation. Fields are private; an entry never changes
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeEntry {
    role: Role,
    text: String,
}

impl ExchangeEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Chronological sequence of exchange entries for one session.
///
/// The only mutation is [`ConversationLog::append`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationLog {
    entries: Vec<ExchangeEntry>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: ExchangeEntry) {
        tracing::trace!(role = %entry.role, len = entry.text.len(), "Appending exchange entry");
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ExchangeEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ExchangeEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&ExchangeEntry> {
        self.entries.last()
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a ExchangeEntry;
    type IntoIter = std::slice::Iter<'a, ExchangeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
