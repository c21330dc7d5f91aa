//! Pipeline: sources → conversations → records → (augmentation) → JSONL

use std::io::Write;
use std::path::Path;
use serde::Serialize;
use tracing::{debug, info, warn};
use crate::core::{
    discover_sources, load_conversation, Deduplicator, PairExtractor, PatternStageDetector,
    StyleAugmenter,
};
use crate::types::{
    Conversation, CorpusError, DropReason, DropTally, ExtractedPair, ExtractionMode,
    PipelineConfig, RecordMetadata, StageMode, TrainingRecord,
};

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Source files found under the root
    pub files_found: usize,
    /// Files skipped because they could not be read or parsed
    pub files_skipped: usize,
    /// Conversations that were processed
    pub conversations: usize,
    /// Records built from the sources
    pub records: usize,
    /// Style-augmented duplicates appended
    pub augmented: usize,
    /// Everything that was left out, by reason
    pub dropped: DropTally,
}

impl RunSummary {
    /// Records in the final output
    pub fn total_records(&self) -> usize {
        self.records + self.augmented
    }
}

/// Records of a finished run plus its summary
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub records: Vec<TrainingRecord>,
    pub summary: RunSummary,
}

/// One pipeline run. The SeenSet lives here; stage cursors do not.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    extractor: PairExtractor,
    detector: PatternStageDetector,
    augmenter: StyleAugmenter,
    seen: Deduplicator,
}

impl Pipeline {
    /// Create a pipeline; fails only on an unusable redaction name list
    pub fn new(config: PipelineConfig) -> Result<Self, CorpusError> {
        let extractor = PairExtractor::with_extra_names(&config.target_speaker, &config.extra_names)?;
        Ok(Self {
            config,
            extractor,
            detector: PatternStageDetector::new(),
            augmenter: StyleAugmenter::new(),
            seen: Deduplicator::new(),
        })
    }

    /// Walk `root`, build every record, then run augmentation if enabled
    pub fn run(&mut self, root: &Path) -> Result<RunOutput, CorpusError> {
        let sources =
            discover_sources(root, &self.config.file_prefix, &self.config.file_extension)?;
        info!("Found {} source files under {}", sources.len(), root.display());

        let mut summary = RunSummary { files_found: sources.len(), ..Default::default() };
        let mut records = Vec::new();

        for path in &sources {
            let conversation = match load_conversation(path) {
                Ok(c) => c,
                Err(e) => {
                    warn!("Skipped {}: {}", path.display(), e);
                    summary.files_skipped += 1;
                    summary.dropped.record(DropReason::D004_SOURCE_SKIPPED);
                    continue;
                }
            };
            records.extend(self.process_conversation(&conversation, &mut summary));
        }

        summary.records = records.len();

        if self.config.augment {
            let variants = self.augment(&records);
            summary.augmented = variants.len();
            records.extend(variants);
        }

        info!(
            "Built {} records ({} augmented) from {} conversations",
            summary.total_records(),
            summary.augmented,
            summary.conversations
        );
        Ok(RunOutput { records, summary })
    }

    /// Records for one conversation, in emission order
    pub fn process_conversation(
        &mut self,
        conversation: &Conversation,
        summary: &mut RunSummary,
    ) -> Vec<TrainingRecord> {
        summary.conversations += 1;
        if conversation.is_empty() {
            debug!(source = %conversation.source, "conversation has no turns");
            return Vec::new();
        }

        let records = match self.config.mode {
            ExtractionMode::Pairs => {
                let mut pairs = self.extractor.pairs(conversation);
                let mut records = Vec::new();
                for pair in pairs.by_ref() {
                    records.push(self.pair_record(&pair, conversation));
                }
                summary.dropped.merge(pairs.dropped());
                records
            }
            ExtractionMode::Lines => {
                let lines =
                    self.extractor.target_lines(conversation, &mut self.seen, &mut summary.dropped);
                lines
                    .iter()
                    .map(|line| self.line_record(line, conversation))
                    .collect()
            }
        };

        debug!(
            source = %conversation.source,
            turns = conversation.len(),
            records = records.len(),
            "conversation processed"
        );
        records
    }

    /// One styled duplicate per record whose response lacks an idiom
    pub fn augment(&self, records: &[TrainingRecord]) -> Vec<TrainingRecord> {
        records
            .iter()
            .filter_map(|record| {
                let original = record.response();
                let styled = self.augmenter.augment(original);
                (styled != original).then(|| record.with_response(styled))
            })
            .collect()
    }

    fn pair_record(&self, pair: &ExtractedPair, conversation: &Conversation) -> TrainingRecord {
        let mut metadata = self.base_metadata(conversation);
        let tag = match self.config.stage_mode {
            StageMode::Sequential => Some(pair.stage),
            StageMode::Pattern => {
                metadata.stage = Some(self.detector.detect(&pair.response));
                None
            }
            StageMode::None => None,
        };
        if self.config.include_metadata {
            metadata.responded_at = pair.responded_at;
        }

        TrainingRecord::new(
            &self.config.system_prompt,
            tag,
            Some(&pair.prompt),
            &pair.response,
            metadata,
        )
    }

    fn line_record(&self, line: &str, conversation: &Conversation) -> TrainingRecord {
        TrainingRecord::new(
            &self.config.system_prompt,
            None,
            None,
            line,
            self.base_metadata(conversation),
        )
    }

    fn base_metadata(&self, conversation: &Conversation) -> RecordMetadata {
        if self.config.include_metadata {
            let source = Path::new(&conversation.source)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            RecordMetadata { source, ..Default::default() }
        } else {
            RecordMetadata::default()
        }
    }
}

/// Write records as JSON Lines, returning how many were written
pub fn write_jsonl<W: Write>(records: &[TrainingRecord], mut out: W) -> Result<usize, CorpusError> {
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(records.len())
}

// =============================================================================
// TESTS
// =============================================================================
