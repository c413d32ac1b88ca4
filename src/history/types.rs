use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::grading::{ComponentResult, EvaluationResult, GradeSettings};

pub const HISTORY_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryState {
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<HistoryEntry>,
}

/// One recorded evaluation together with the inputs it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub recorded_at: DateTime<Utc>,
    pub components: Vec<ComponentResult>,
    pub pre_final_grade: f64,
    pub is_exempt: bool,
    pub required_final_exam_score: Option<f64>,
    /// Blend settings in force for this evaluation; absent when none were given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<GradeSettings>,
}

impl HistoryEntry {
    pub fn from_result(result: &EvaluationResult, settings: Option<&GradeSettings>) -> Self {
        Self {
            recorded_at: Utc::now(),
            components: result.breakdown.clone(),
            pre_final_grade: result.pre_final_grade,
            is_exempt: result.is_exempt,
            required_final_exam_score: result.required_final_exam_score,
            settings: settings.filter(|s| **s != GradeSettings::default()).cloned(),
        }
    }
}

impl Default for HistoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryState {
    pub fn new() -> Self {
        Self {
            version: HISTORY_VERSION,
            entries: Vec::new(),
        }
    }

    /// Append an entry, dropping the oldest ones beyond `max_entries`.
    pub fn push(&mut self, entry: HistoryEntry, max_entries: usize) {
        self.entries.push(entry);
        if self.entries.len() > max_entries {
            let excess = self.entries.len() - max_entries;
            self.entries.drain(..excess);
        }
    }

    /// Entries newest first, optionally only those younger than `since`.
    pub fn recent(&self, since: Option<Duration>) -> Vec<&HistoryEntry> {
        let cutoff = since.map(|d| Utc::now() - d);
        self.entries
            .iter()
            .rev()
            .filter(|e| cutoff.map_or(true, |c| e.recorded_at >= c))
            .collect()
    }
}
