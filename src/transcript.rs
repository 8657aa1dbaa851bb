//! Conversation transcript
//!
//! The ordered, append-only history of turns for one session. Turns are
//! never edited or reordered once appended; the only way to shrink the
//! transcript is `clear`.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

/// One message unit in the transcript
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Role::Bot, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// Timestamps are display metadata; two turns are the same turn when the
// speaker and the text match.
impl PartialEq for Turn {
    fn eq(&self, other: &Self) -> bool {
        self.role == other.role && self.content == other.content
    }
}

impl Eq for Turn {}

/// Ordered history of turns (insertion order = display order)
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end. Content is stored verbatim.
    ///
    /// Returns the index of the new turn.
    pub fn append(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    /// Drop every turn. Clearing an empty transcript is a no-op.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Read-only view of the current turns
    #[allow(dead_code)] // Borrowing accessor, used by tests
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Owned copy of the current turns, detached from later appends
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    #[allow(dead_code)] // API completeness
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[allow(dead_code)] // API completeness
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[allow(dead_code)] // API completeness
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
