//! Error types for source loading and output

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpusError {
    /// The input root itself cannot be read; the only fatal condition
    #[error("Cannot read source root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed conversation {path}: {source}")]
    SourceParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid redaction name list: {0}")]
    InvalidNames(#[from] regex::Error),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CorpusError {
    /// Errors that only cost one source file
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CorpusError::SourceRead { .. } | CorpusError::SourceParse { .. })
    }
}
