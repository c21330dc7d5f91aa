//! Source discovery and loading
//!
//! Walks the input root for `<prefix>*.<extension>` files and parses each
//! into a Conversation. Only an unreadable root is fatal; anything below it
//! is skipped with a warning.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use crate::types::{Conversation, CorpusError, RawConversation};

/// Recursively collect source files under `root`, sorted by path
pub fn discover_sources(
    root: &Path,
    prefix: &str,
    extension: &str,
) -> Result<Vec<PathBuf>, CorpusError> {
    let entries = fs::read_dir(root).map_err(|source| CorpusError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut found = Vec::new();
    let mut pending: Vec<fs::ReadDir> = vec![entries];

    while let Some(dir) = pending.pop() {
        for entry in dir {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            if path.is_dir() {
                match fs::read_dir(&path) {
                    Ok(sub) => pending.push(sub),
                    Err(e) => warn!("Skipping directory {}: {}", path.display(), e),
                }
            } else if is_source_file(&path, prefix, extension) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

/// Does the file name match `<prefix>*.<extension>`?
pub fn is_source_file(path: &Path, prefix: &str, extension: &str) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.starts_with(prefix));
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e == extension);
    name_ok && ext_ok
}

/// Read and parse one conversation file
pub fn load_conversation(path: &Path) -> Result<Conversation, CorpusError> {
    let json = fs::read_to_string(path).map_err(|source| CorpusError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;

    let raw: RawConversation =
        serde_json::from_str(&json).map_err(|source| CorpusError::SourceParse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Conversation::from_raw(path.display().to_string(), raw))
}

// =============================================================================
// TESTS
// =============================================================================
