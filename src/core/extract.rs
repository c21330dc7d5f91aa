//! Pair extraction: (other party → target speaker) adjacency pairs
//!
//! A pair (i, i+1) qualifies when turn i is NOT from the target, turn i+1
//! IS, and both texts survive repair + redaction. The stage cursor starts
//! fresh for every conversation and advances only on qualifying pairs.

use tracing::trace;
use crate::core::{Deduplicator, PiiRedactor, StageClassifier, TextRepairer};
use crate::types::{Conversation, CorpusError, DropReason, DropTally, ExtractedPair, Stage, Turn};

/// Turns conversations into cleaned, stage-labeled pairs
#[derive(Debug, Clone)]
pub struct PairExtractor {
    target: String,
    repairer: TextRepairer,
    redactor: PiiRedactor,
    classifier: StageClassifier,
}

impl PairExtractor {
    /// Extractor for `target` with the built-in redaction names
    pub fn new(target: impl Into<String>) -> Self {
        Self::with_redactor(target, PiiRedactor::new())
    }

    /// Extractor for `target`, redacting `extra_names` on top of the built-ins
    pub fn with_extra_names(
        target: impl Into<String>,
        extra_names: &[String],
    ) -> Result<Self, CorpusError> {
        Ok(Self::with_redactor(target, PiiRedactor::with_names(extra_names)?))
    }

    fn with_redactor(target: impl Into<String>, redactor: PiiRedactor) -> Self {
        Self {
            target: target.into(),
            repairer: TextRepairer::new(),
            redactor,
            classifier: StageClassifier::new(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Repair, reject corrupt text, redact, reject empty text
    pub fn clean(&self, raw: &str) -> Result<String, DropReason> {
        let repaired = self.repairer.repair(raw);
        if self.repairer.looks_corrupt(&repaired) {
            return Err(DropReason::D002_RESIDUAL_CORRUPTION);
        }
        let redacted = self.redactor.redact(&repaired);
        if redacted.is_empty() {
            return Err(DropReason::D001_EMPTY_CONTENT);
        }
        Ok(redacted)
    }

    /// Lazy pairs for one conversation
    pub fn pairs<'a>(&'a self, conversation: &'a Conversation) -> Pairs<'a> {
        Pairs {
            extractor: self,
            turns: conversation.turns(),
            index: 0,
            cursor: self.classifier.initial(),
            dropped: DropTally::new(),
        }
    }

    /// Unique target-speaker lines, no pairing.
    ///
    /// `seen` is shared across conversations for the whole run.
    pub fn target_lines(
        &self,
        conversation: &Conversation,
        seen: &mut Deduplicator,
        dropped: &mut DropTally,
    ) -> Vec<String> {
        let mut lines = Vec::new();

        for turn in conversation.turns().iter().filter(|t| t.is_from(&self.target)) {
            let Some(text) = turn.text.as_deref() else {
                dropped.record(DropReason::D001_MISSING_CONTENT);
                continue;
            };
            let flattened = text.replace('\n', " ");
            let flattened = flattened.trim();
            if flattened.is_empty() {
                dropped.record(DropReason::D001_EMPTY_CONTENT);
                continue;
            }

            let line = match self.clean(flattened) {
                Ok(line) => line,
                Err(reason) => {
                    trace!(ordinal = turn.ordinal, code = reason.code(), "line dropped");
                    dropped.record(reason);
                    continue;
                }
            };

            if seen.is_new(&line) {
                lines.push(line);
            } else {
                dropped.record(DropReason::D003_DUPLICATE);
            }
        }

        lines
    }

    /// Is (prompt, reply) an other → target adjacency at all?
    fn is_adjacent(&self, prompt: &Turn, reply: &Turn) -> bool {
        !prompt.is_from(&self.target) && reply.is_from(&self.target)
    }

    /// Cleaned texts of an adjacent pair, or why its content was rejected
    fn qualify(&self, prompt: &Turn, reply: &Turn) -> Result<(String, String), DropReason> {
        let (Some(prompt_text), Some(reply_text)) = (prompt.text.as_deref(), reply.text.as_deref())
        else {
            return Err(DropReason::D001_MISSING_CONTENT);
        };
        Ok((self.clean(prompt_text)?, self.clean(reply_text)?))
    }
}

/// Iterator over the qualifying pairs of one conversation.
///
/// Consumed once; the stage cursor lives here and dies with it.
#[derive(Debug)]
pub struct Pairs<'a> {
    extractor: &'a PairExtractor,
    turns: &'a [Turn],
    index: usize,
    cursor: Stage,
    dropped: DropTally,
}

impl<'a> Pairs<'a> {
    /// Adjacent pairs rejected for their content so far
    pub fn dropped(&self) -> &DropTally {
        &self.dropped
    }
}

impl<'a> Iterator for Pairs<'a> {
    type Item = ExtractedPair;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index + 1 < self.turns.len() {
            let prompt = &self.turns[self.index];
            let reply = &self.turns[self.index + 1];
            self.index += 1;

            if !self.extractor.is_adjacent(prompt, reply) {
                continue;
            }

            let (prompt_text, reply_text) = match self.extractor.qualify(prompt, reply) {
                Ok(texts) => texts,
                Err(reason) => {
                    trace!(ordinal = prompt.ordinal, code = reason.code(), "pair skipped");
                    self.dropped.record(reason);
                    continue;
                }
            };

            let transition = self.extractor.classifier.step(self.cursor, &reply_text);
            self.cursor = transition.next;

            return Some(ExtractedPair {
                prompt: prompt_text,
                response: reply_text,
                stage: transition.label,
                responded_at: reply.sent_at,
            });
        }
        None
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ME: &str = "Luke Davis";

    #[test]
    fn test_alternating_conversation() {
        let ex = PairExtractor::new(ME);
        let conv = Conversation::from_pairs(
            "c",
            &[("Sam", "A"), (ME, "B"), ("Sam", "C"), (ME, "D")],
        );
        let pairs: Vec<_> = ex.pairs(&conv).collect();

        assert_eq!(pairs.len(), 2);
        assert_eq!((pairs[0].prompt.as_str(), pairs[0].response.as_str()), ("A", "B"));
        assert_eq!((pairs[1].prompt.as_str(), pairs[1].response.as_str()), ("C", "D"));
    }

    #[test]
    fn test_target_only_yields_nothing() {
        let ex = PairExtractor::new(ME);
        let conv = Conversation::from_pairs("c", &[(ME, "A"), (ME, "B")]);
        assert_eq!(ex.pairs(&conv).count(), 0);
    }

    #[test]
    fn test_sender_mismatch_is_not_a_drop() {
        let ex = PairExtractor::new(ME);
        let conv = Conversation::from_pairs(
            "c",
            &[(ME, "a"), (ME, "b"), ("Sam", "c"), ("Sam", "d"), (ME, "e")],
        );
        let mut pairs = ex.pairs(&conv);

        assert_eq!(pairs.next().map(|p| p.prompt), Some("d".to_string()));
        assert!(pairs.next().is_none());
        assert_eq!(pairs.dropped().total(), 0);
    }

    #[test]
    fn test_missing_sender_counts_as_other_party() {
        let ex = PairExtractor::new(ME);
        let mut turns = vec![Turn::new(ME, "hey", 1)];
        turns.insert(0, Turn { sender: None, text: Some("yo".into()), ordinal: 0, sent_at: None });
        let conv = Conversation::new("c", turns);
        assert_eq!(ex.pairs(&conv).count(), 1);
    }

    #[test]
    fn test_empty_after_redaction_skipped_without_advancing() {
        let ex = PairExtractor::new(ME);
        let conv = Conversation::from_pairs(
            "c",
            &[("Sam", "hi"), (ME, "   "), ("Sam", "ok"), (ME, "cool")],
        );
        let mut pairs = ex.pairs(&conv);
        let first = pairs.next().unwrap();

        assert_eq!(first.response, "cool");
        // first qualifying reply is still the post-greeting one
        assert_eq!(first.stage, Stage::RapportBuilding);
        assert!(pairs.next().is_none());
        assert_eq!(pairs.dropped().count(DropReason::D001_EMPTY_CONTENT), 1);
    }

    #[test]
    fn test_corrupt_reply_dropped() {
        let ex = PairExtractor::new(ME);
        let conv = Conversation::from_pairs("c", &[("Sam", "hi"), (ME, "bad \u{FFFD}")]);
        let mut pairs = ex.pairs(&conv);

        assert!(pairs.next().is_none());
        assert_eq!(pairs.dropped().count(DropReason::D002_RESIDUAL_CORRUPTION), 1);
    }

    #[test]
    fn test_cursor_reset_per_conversation() {
        let ex = PairExtractor::new(ME);
        let conv = Conversation::from_pairs(
            "c",
            &[("Sam", "hi"), (ME, "hey"), ("Sam", "yes"), (ME, "what's your portfolio size")],
        );

        let first_run: Vec<Stage> = ex.pairs(&conv).map(|p| p.stage).collect();
        let second_run: Vec<Stage> = ex.pairs(&conv).map(|p| p.stage).collect();

        assert_eq!(first_run, vec![Stage::RapportBuilding, Stage::AnsweringQ3]);
        assert_eq!(first_run, second_run);
    }

    #[test]
    fn test_repair_and_redaction_applied() {
        let ex = PairExtractor::new(ME);
        let conv = Conversation::from_pairs(
            "c",
            &[("Sam", "call me 0412 345 678"), (ME, "got it Cameron, it\u{e2}\u{80}\u{99}s done")],
        );
        let pair = ex.pairs(&conv).next().unwrap();

        assert_eq!(pair.prompt, "call me <PHONE>");
        assert_eq!(pair.response, "got it <NAME>, it\u{2019}s done");
    }

    #[test]
    fn test_target_lines_dedup_across_conversations() {
        let ex = PairExtractor::new(ME);
        let mut seen = Deduplicator::new();
        let mut dropped = DropTally::new();

        let a = Conversation::from_pairs("a", &[(ME, "x"), ("Sam", "q"), (ME, "y"), (ME, "x")]);
        let b = Conversation::from_pairs("b", &[(ME, "z\nline"), (ME, "y")]);

        let mut kept = ex.target_lines(&a, &mut seen, &mut dropped);
        kept.extend(ex.target_lines(&b, &mut seen, &mut dropped));

        assert_eq!(kept, vec!["x", "y", "z line"]);
        assert_eq!(dropped.count(DropReason::D003_DUPLICATE), 2);
    }

    #[test]
    fn test_corrupt_line_not_marked_seen() {
        let ex = PairExtractor::new(ME);
        let mut seen = Deduplicator::new();
        let mut dropped = DropTally::new();
        let conv = Conversation::from_pairs("a", &[(ME, "Ã")]);

        assert!(ex.target_lines(&conv, &mut seen, &mut dropped).is_empty());
        assert_eq!(dropped.count(DropReason::D002_RESIDUAL_CORRUPTION), 1);
        assert!(seen.is_new("Ã"));
    }
}
