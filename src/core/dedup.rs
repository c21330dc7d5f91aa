//! Exact-match deduplication for the lines mode

use std::collections::HashSet;

/// Set of strings already emitted during this run.
///
/// Keys are compared exactly; no case folding or whitespace collapsing.
#[derive(Debug, Default, Clone)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time `text` is offered; marks it seen
    pub fn is_new(&mut self, text: &str) -> bool {
        if self.seen.contains(text) {
            return false;
        }
        self.seen.insert(text.to_string());
        true
    }
}
