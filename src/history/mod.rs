pub mod storage;
pub mod types;

pub use storage::{get_history_path, load_history, save_history};
pub use types::{HistoryEntry, HistoryState};

use anyhow::Result;
use std::path::PathBuf;

use crate::config::HistoryConfig;

/// Somewhere evaluations can be recorded after the fact.
pub trait ResultSink {
    fn record(&self, entry: HistoryEntry) -> Result<()>;
}

/// History kept in a single JSON file, capped at `max_entries`.
#[derive(Debug, Clone)]
pub struct FileHistory {
    path: PathBuf,
    max_entries: usize,
}

impl FileHistory {
    pub fn new(path: PathBuf, max_entries: usize) -> Self {
        Self { path, max_entries }
    }

    pub fn from_config(config: &HistoryConfig) -> Result<Self> {
        let path = match &config.path {
            Some(p) => p.clone(),
            None => get_history_path()?,
        };
        Ok(Self::new(path, config.max_entries()))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<HistoryState> {
        load_history(&self.path)
    }
}

impl ResultSink for FileHistory {
    fn record(&self, entry: HistoryEntry) -> Result<()> {
        let mut state = self.load()?;
        state.push(entry, self.max_entries);
        save_history(&self.path, &state)
    }
}

/// Record an entry, logging and swallowing any failure.
/// History is best-effort and never fails the evaluation that produced it.
pub fn record_best_effort(sink: &dyn ResultSink, entry: HistoryEntry) {
    match sink.record(entry) {
        Ok(()) => tracing::debug!("Recorded evaluation in history"),
        Err(e) => tracing::warn!("Failed to record evaluation history: {:#}", e),
    }
}
