//! Stage classifier: keyword-driven state machine over target-speaker turns
//!
//! Transitions:
//! - greeting → rapport_building: unconditional, first reply after the opener
//! - any other state → first keyword set hit, tested Q1, Q2, Q3, Q4, booking
//! - no hit → state unchanged
//! - qualified → label is emitted, carried cursor becomes nurture

use std::collections::HashSet;
use crate::types::Stage;

pub const Q1_KEYWORDS: &[&str] = &["understanding", "company", "services"];
pub const Q2_KEYWORDS: &[&str] = &["interest", "spark"];
pub const Q3_KEYWORDS: &[&str] = &["portfolio", "size", "invest", "$", "k"];
pub const Q4_KEYWORDS: &[&str] = &["challenge", "pain", "struggle"];
pub const BOOKING_KEYWORDS: &[&str] = &["booking", "schedule", "consult", "link", "calendar"];

/// Keyword sets in priority order; the first intersecting set wins
pub const STAGE_KEYWORDS: &[(&[&str], Stage)] = &[
    (Q1_KEYWORDS, Stage::AnsweringQ1),
    (Q2_KEYWORDS, Stage::AnsweringQ2),
    (Q3_KEYWORDS, Stage::AnsweringQ3),
    (Q4_KEYWORDS, Stage::AnsweringQ4),
    (BOOKING_KEYWORDS, Stage::Qualified),
];

/// Outcome of classifying one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Label emitted for this turn
    pub label: Stage,
    /// Cursor to pass into the next call
    pub next: Stage,
}

/// Stage classifier. Holds no state; the cursor is threaded by the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct StageClassifier;

impl StageClassifier {
    /// Create new classifier
    pub fn new() -> Self {
        Self
    }

    /// Cursor value at the start of every conversation
    pub fn initial(&self) -> Stage {
        Stage::Greeting
    }

    /// Classify one target-speaker turn given the current cursor
    pub fn step(&self, cursor: Stage, text: &str) -> Transition {
        let label = self.label(cursor, text);
        let next = if label == Stage::Qualified { Stage::Nurture } else { label };
        Transition { label, next }
    }

    /// Label only, ignoring the qualified reset
    pub fn label(&self, cursor: Stage, text: &str) -> Stage {
        if cursor == Stage::Greeting {
            return Stage::RapportBuilding;
        }

        let lower = text.to_lowercase();
        let words: HashSet<&str> = lower.split_whitespace().collect();

        STAGE_KEYWORDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| words.contains(k)))
            .map(|(_, stage)| *stage)
            .unwrap_or(cursor)
    }

    /// Label a whole conversation's worth of replies from the initial state
    pub fn classify_all<'a>(&self, replies: impl IntoIterator<Item = &'a str>) -> Vec<Stage> {
        let mut cursor = self.initial();
        replies
            .into_iter()
            .map(|text| {
                let t = self.step(cursor, text);
                cursor = t.next;
                t.label
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
