//! persona-corpus: conversation logs in, persona training records out
//!
//! Pipeline: source file → Conversation → PairExtractor (repair, redact,
//! stage) → TrainingRecord → optional style augmentation → JSONL

pub mod core;
pub mod types;

// =============================================================================
// PERSONA DEFAULTS
// =============================================================================

/// Sender whose messages become the training labels
pub const DEFAULT_TARGET_SPEAKER: &str = "Luke Davis";

/// System framing template, `{speaker}` is substituted
pub const SYSTEM_PROMPT_TEMPLATE: &str =
    "You are {speaker}, responding in your own conversational style.";

// =============================================================================
// SOURCE LAYOUT
// =============================================================================

/// Conversation files start with this prefix
pub const SOURCE_FILE_PREFIX: &str = "message_";

/// ...and carry this extension
pub const SOURCE_FILE_EXTENSION: &str = "json";

// =============================================================================
// TEXT REPAIR
// =============================================================================

/// Upper bound on Latin-1 → UTF-8 round-trips per string
pub const MAX_REPAIR_PASSES: usize = 3;

/// Characters that show up when UTF-8 bytes were read as a single-byte encoding
pub const MOJIBAKE_MARKERS: &[char] = &['â', 'Ã', 'ð'];

/// Substrings that mark text as still corrupt after repair
pub const CORRUPTION_MARKERS: &[&str] = &["ðŸ", "Ã", "Â", "\u{FFFD}"];

// =============================================================================
// OUTPUT
// =============================================================================

/// Name of the tool segment carrying the stage label
pub const STAGE_SEGMENT_NAME: &str = "stage";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
