//! Reason codes for skipped turns, pairs and files

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Why an item did not make it into the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum DropReason {
    // =========================================================================
    // D001: Content
    // =========================================================================
    /// Turn has no text field
    D001_MISSING_CONTENT,
    /// Text is empty after repair and redaction
    D001_EMPTY_CONTENT,

    // =========================================================================
    // D002: Encoding
    // =========================================================================
    /// Text still shows mojibake after repair
    D002_RESIDUAL_CORRUPTION,

    // =========================================================================
    // D003: Deduplication
    // =========================================================================
    /// Exact repeat of an earlier line
    D003_DUPLICATE,

    // =========================================================================
    // D004: Sources
    // =========================================================================
    /// Source file could not be read or parsed
    D004_SOURCE_SKIPPED,
}

impl DropReason {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::D001_MISSING_CONTENT => "D001_MISSING_CONTENT",
            Self::D001_EMPTY_CONTENT => "D001_EMPTY_CONTENT",
            Self::D002_RESIDUAL_CORRUPTION => "D002_RESIDUAL_CORRUPTION",
            Self::D003_DUPLICATE => "D003_DUPLICATE",
            Self::D004_SOURCE_SKIPPED => "D004_SOURCE_SKIPPED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::D001_MISSING_CONTENT => "No text content",
            Self::D001_EMPTY_CONTENT => "Empty after cleaning",
            Self::D002_RESIDUAL_CORRUPTION => "Unrepairable encoding",
            Self::D003_DUPLICATE => "Duplicate line",
            Self::D004_SOURCE_SKIPPED => "Source file skipped",
        }
    }
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

/// Per-reason drop counts for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTally {
    counts: BTreeMap<DropReason, usize>,
}

impl DropTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one drop
    pub fn record(&mut self, reason: DropReason) {
        *self.counts.entry(reason).or_insert(0) += 1;
    }

    /// Fold another tally into this one
    pub fn merge(&mut self, other: &DropTally) {
        for (reason, n) in &other.counts {
            *self.counts.entry(*reason).or_insert(0) += n;
        }
    }

    pub fn count(&self, reason: DropReason) -> usize {
        self.counts.get(&reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Non-zero counts, ordered by reason
    pub fn iter(&self) -> impl Iterator<Item = (DropReason, usize)> + '_ {
        self.counts.iter().map(|(r, n)| (*r, *n))
    }
}
