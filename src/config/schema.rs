use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::grading::GradingPolicy;

pub const DEFAULT_HISTORY_MAX_ENTRIES: usize = 500;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub grading: Option<GradingPolicy>,
    #[serde(default)]
    pub history: Option<HistoryConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Defaults to ~/.config/grade-calc/history.json
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub max_entries: Option<usize>,
}

fn default_enabled() -> bool {
    true
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            max_entries: None,
        }
    }
}

impl HistoryConfig {
    pub fn max_entries(&self) -> usize {
        self.max_entries.unwrap_or(DEFAULT_HISTORY_MAX_ENTRIES)
    }
}
