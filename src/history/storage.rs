use super::types::{HistoryState, HISTORY_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// History lives next to the config file unless `history.path` says otherwise.
pub fn get_history_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("history.json"))
}

/// Read recorded evaluations. No file yet means no evaluations; a file
/// written by another format version is refused rather than reinterpreted.
pub fn load_history(path: &Path) -> Result<HistoryState> {
    if !path.exists() {
        return Ok(HistoryState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Could not open history at {}", path.display()))?;

    let state: HistoryState = serde_json::from_reader(file)
        .with_context(|| format!("History at {} is not valid JSON", path.display()))?;

    if state.version != HISTORY_VERSION {
        anyhow::bail!(
            "History at {} uses format version {}, expected {}",
            path.display(),
            state.version,
            HISTORY_VERSION
        );
    }

    Ok(state)
}

/// Replace the history file in one step, so a crash mid-write leaves the
/// previous evaluations intact.
pub fn save_history(path: &Path, state: &HistoryState) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Could not stage history write to {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Could not encode history")?;
    file.commit()
        .with_context(|| format!("Could not replace history at {}", path.display()))
}
