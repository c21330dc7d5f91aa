//! Training record structures, one per JSONL line

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::types::Stage;
use crate::STAGE_SEGMENT_NAME;

/// Chat role of a record segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Tool,
    User,
    Assistant,
}

/// One role-tagged piece of a training record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub role: Role,
    /// Only set on tool segments
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    pub content: String,
}

impl Segment {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, name: None, content: content.into() }
    }

    /// Machine-readable stage tag
    pub fn stage(stage: Stage) -> Self {
        Self {
            role: Role::Tool,
            name: Some(STAGE_SEGMENT_NAME.to_string()),
            content: stage.as_str().to_string(),
        }
    }
}

/// Optional per-record metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Stage from the stateless pattern detector
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stage: Option<Stage>,
    /// Source file the record came from
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
    /// When the response was sent
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub responded_at: Option<DateTime<Utc>>,
}

impl RecordMetadata {
    pub fn is_empty(&self) -> bool {
        self.stage.is_none() && self.source.is_none() && self.responded_at.is_none()
    }
}

/// The emitted unit of the corpus.
///
/// Segments are ordered: system framing, optional stage tag, optional prompt,
/// response. Records are never mutated; variants are built with
/// [`TrainingRecord::with_response`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    messages: Vec<Segment>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    metadata: Option<RecordMetadata>,
}

impl TrainingRecord {
    /// Build a record from its parts
    pub fn new(
        system: &str,
        stage: Option<Stage>,
        prompt: Option<&str>,
        response: &str,
        metadata: RecordMetadata,
    ) -> Self {
        let mut messages = vec![Segment::new(Role::System, system)];
        if let Some(stage) = stage {
            messages.push(Segment::stage(stage));
        }
        if let Some(prompt) = prompt {
            messages.push(Segment::new(Role::User, prompt));
        }
        messages.push(Segment::new(Role::Assistant, response));

        let metadata = if metadata.is_empty() { None } else { Some(metadata) };
        Self { messages, metadata }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.messages
    }

    pub fn metadata(&self) -> Option<&RecordMetadata> {
        self.metadata.as_ref()
    }

    /// Text of the assistant segment (always the last one)
    pub fn response(&self) -> &str {
        self.messages.last().map(|s| s.content.as_str()).unwrap_or("")
    }

    /// Text of the user segment, if the record was built from a pair
    pub fn prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|s| s.role == Role::User)
            .map(|s| s.content.as_str())
    }

    /// Stage from the tool segment, falling back to metadata
    pub fn stage(&self) -> Option<Stage> {
        self.messages
            .iter()
            .find(|s| s.role == Role::Tool && s.name.as_deref() == Some(STAGE_SEGMENT_NAME))
            .and_then(|s| Stage::from_label(&s.content))
            .or_else(|| self.metadata.as_ref().and_then(|m| m.stage))
    }

    /// Copy of this record with a different response
    pub fn with_response(&self, response: impl Into<String>) -> Self {
        let mut copy = self.clone();
        if let Some(last) = copy.messages.last_mut() {
            last.content = response.into();
        }
        copy
    }

    /// One JSONL line (without the newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
