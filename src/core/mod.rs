//! Core modules for persona-corpus

pub mod repair;
pub mod redact;
pub mod dedup;
pub mod stage;
pub mod patterns;
pub mod style;
pub mod extract;
pub mod source;
pub mod pipeline;

pub use repair::TextRepairer;
pub use redact::PiiRedactor;
pub use dedup::Deduplicator;
pub use stage::{StageClassifier, Transition, STAGE_KEYWORDS};
pub use patterns::PatternStageDetector;
pub use style::{StyleAugmenter, STYLE_IDIOMS};
pub use extract::{PairExtractor, Pairs};
pub use source::{discover_sources, load_conversation, is_source_file};
pub use pipeline::{Pipeline, RunOutput, RunSummary, write_jsonl};
