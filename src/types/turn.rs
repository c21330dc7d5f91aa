//! Turn model for pair extraction
//!
//! - Turn = one message as read from the source
//! - Conversation = the turns of one source file, in source order
//! - ExtractedPair = other-party prompt followed by the target speaker's reply

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use crate::types::Stage;

/// One message as it appears in an exported conversation file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub timestamp_ms: Option<i64>,
}

/// Top-level structure of an exported conversation file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConversation {
    pub messages: Vec<RawMessage>,
}

/// A single message within a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Sender identity, absent in some exports
    pub sender: Option<String>,
    /// Message body, absent for attachments and reactions
    pub text: Option<String>,
    /// Position within the conversation (0-based)
    pub ordinal: usize,
    /// When the message was sent
    pub sent_at: Option<DateTime<Utc>>,
}

impl Turn {
    /// Create a turn without a timestamp
    pub fn new(sender: impl Into<String>, text: impl Into<String>, ordinal: usize) -> Self {
        Self {
            sender: Some(sender.into()),
            text: Some(text.into()),
            ordinal,
            sent_at: None,
        }
    }

    /// Was this turn sent by `speaker`?
    pub fn is_from(&self, speaker: &str) -> bool {
        self.sender.as_deref() == Some(speaker)
    }
}

/// Ordered turns from one source file
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    /// Where the conversation came from (file name)
    pub source: String,
    turns: Vec<Turn>,
}

impl Conversation {
    /// Build from turns already in source order
    pub fn new(source: impl Into<String>, turns: Vec<Turn>) -> Self {
        Self { source: source.into(), turns }
    }

    /// Convenience constructor from (sender, text) tuples
    pub fn from_pairs(source: impl Into<String>, messages: &[(&str, &str)]) -> Self {
        let turns = messages
            .iter()
            .enumerate()
            .map(|(i, (sender, text))| Turn::new(*sender, *text, i))
            .collect();
        Self::new(source, turns)
    }

    /// Convert a parsed export. Order is kept exactly as given.
    pub fn from_raw(source: impl Into<String>, raw: RawConversation) -> Self {
        let turns = raw
            .messages
            .into_iter()
            .enumerate()
            .map(|(ordinal, m)| Turn {
                sender: m.sender_name,
                text: m.content,
                ordinal,
                sent_at: m.timestamp_ms.and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            })
            .collect();
        Self::new(source, turns)
    }

    /// All turns, oldest first as given by the source
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Prompt/response pair ready to become a training record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPair {
    /// Cleaned text of the other party's turn
    pub prompt: String,
    /// Cleaned text of the target speaker's reply
    pub response: String,
    /// Stage label assigned to the reply
    pub stage: Stage,
    /// Send time of the reply, if the source had one
    pub responded_at: Option<DateTime<Utc>>,
}

// =============================================================================
// TESTS
// =============================================================================
