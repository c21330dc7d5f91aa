//! Core types for persona-corpus

mod stage;
mod turn;
mod record;
mod reason;
mod config;
mod error;

pub use stage::Stage;
pub use turn::{Turn, Conversation, ExtractedPair, RawConversation, RawMessage};
pub use record::{TrainingRecord, Segment, Role, RecordMetadata};
pub use reason::{DropReason, DropTally};
pub use config::{PipelineConfig, ExtractionMode, StageMode};
pub use error::CorpusError;
