//! ConversationMemory — bounded, per-session chat history.
//!
//! Purpose:
//! - Give the model short-term context without growing the prompt forever.
//! - Stay session-local: every chat session owns its own memory, nothing is
//!   shared across sessions or stored globally.
//!
//! Entries are stored pre-formatted as `"Role: text"` and evicted FIFO once
//! the configured capacity is exceeded.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Default number of entries kept (five user/assistant exchanges)
pub const DEFAULT_MEMORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

impl Role {
    /// Lower-case wire name used by chat completion APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("User"),
            Role::Assistant => f.write_str("Assistant"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationMemory {
    capacity: usize,
    entries: VecDeque<String>,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }
}

impl ConversationMemory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Push a `"Role: text"` entry, dropping the oldest when full.
    pub fn append(&mut self, role: Role, text: &str) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(format!("{role}: {text}"));
    }

    /// All entries, oldest first, one per line.
    pub fn render_context(&self) -> String {
        self.entries().collect::<Vec<_>>().join("\n")
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
