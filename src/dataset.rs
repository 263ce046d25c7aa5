//! Static benchmark corpus, loaded once at startup.
//!
//! The corpus is a JSONL snapshot (one JSON object per line, each carrying a
//! `text` field) of the chunked-passage dataset the benchmark samples from.
//! It is read-only for the process lifetime; a load failure is fatal because
//! the service has nothing to measure without it.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::types::MAX_SAMPLE;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not read corpus file: {0}")]
    Io(#[from] std::io::Error),
    #[error("corpus line {line} is not a valid record: {source}")]
    Parse { line: usize, source: serde_json::Error },
    #[error("corpus has {0} entries, need at least {MAX_SAMPLE} to draw a sample")]
    TooSmall(usize),
}

#[derive(Deserialize)]
struct Record {
    text: String,
}

/// In-memory corpus of text passages with random access by index.
#[derive(Debug)]
pub struct Dataset {
    entries: Vec<String>,
}

impl Dataset {
    /// Load a JSONL corpus from disk. Blank lines are skipped.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path)?;
        let mut entries = Vec::new();
        for (i, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(line)
                .map_err(|source| DatasetError::Parse { line: i + 1, source })?;
            entries.push(record.text);
        }
        if entries.len() < MAX_SAMPLE {
            return Err(DatasetError::TooSmall(entries.len()));
        }
        info!(path = %path.display(), entries = entries.len(), "Corpus loaded");
        Ok(Self { entries })
    }

    /// Build a corpus directly from entries. Callers must respect the same
    /// minimum-size constraint as [`Dataset::load`] before running benchmarks.
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Passage text at `index`. Callers guarantee `index < len()`; the
    /// sampling discipline in the runner never draws out of range.
    pub fn get(&self, index: usize) -> &str {
        &self.entries[index]
    }
}
