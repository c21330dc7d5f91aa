//! Pipeline configuration

use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::{
    DEFAULT_TARGET_SPEAKER, SOURCE_FILE_EXTENSION, SOURCE_FILE_PREFIX, SYSTEM_PROMPT_TEMPLATE,
};

/// How turns are turned into records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Other-party prompt + target reply, stage labeled
    Pairs,
    /// Unique target-speaker lines only, no prompt
    Lines,
}

/// Which stage labeler runs in pairs mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageMode {
    /// Stateful keyword classifier, label in a tool segment
    Sequential,
    /// Stateless regex detector, label in metadata
    Pattern,
    /// No stage label
    None,
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pairs" => Ok(ExtractionMode::Pairs),
            "lines" => Ok(ExtractionMode::Lines),
            other => Err(format!("unknown mode '{}' (expected pairs or lines)", other)),
        }
    }
}

impl FromStr for StageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(StageMode::Sequential),
            "pattern" => Ok(StageMode::Pattern),
            "none" => Ok(StageMode::None),
            other => Err(format!(
                "unknown stage mode '{}' (expected sequential, pattern or none)",
                other
            )),
        }
    }
}

/// Everything the pipeline needs to know for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sender whose replies are the training labels
    pub target_speaker: String,
    /// System framing segment
    pub system_prompt: String,
    pub mode: ExtractionMode,
    pub stage_mode: StageMode,
    /// Append one style-augmented duplicate per eligible record
    pub augment: bool,
    /// Attach source file and send time to each record
    pub include_metadata: bool,
    /// Names redacted on top of the built-in list
    pub extra_names: Vec<String>,
    pub file_prefix: String,
    pub file_extension: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::for_speaker(DEFAULT_TARGET_SPEAKER)
    }
}

impl PipelineConfig {
    /// Defaults with a different target speaker; the system prompt follows the name
    pub fn for_speaker(speaker: impl Into<String>) -> Self {
        let speaker = speaker.into();
        Self {
            system_prompt: SYSTEM_PROMPT_TEMPLATE.replace("{speaker}", &speaker),
            target_speaker: speaker,
            mode: ExtractionMode::Pairs,
            stage_mode: StageMode::Sequential,
            augment: false,
            include_metadata: false,
            extra_names: Vec::new(),
            file_prefix: SOURCE_FILE_PREFIX.to_string(),
            file_extension: SOURCE_FILE_EXTENSION.to_string(),
        }
    }
}
