use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::metric::PhaseMetricTable;
use crate::models::phase::Phase;

/// Similarity scores for one session, the quantities tracked between
/// sessions for progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionScores {
    pub overall_score: f64,
    pub phase_weighted_score: f64,
    pub phase_scores: BTreeMap<Phase, f64>,
}

/// Persisted per-session summary (`summary.json`). Carries everything the
/// next session needs for progress deltas and drill outcome tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub recorded_at: DateTime<Utc>,
    pub scores: SessionScores,
    pub phase_metrics: PhaseMetricTable,
}

/// Session ids are timestamps formatted so lexicographic order equals
/// chronological order.
pub fn generate_session_id(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Whether a directory name has the `YYYY-MM-DD_HH-MM-SS` session shape.
pub fn looks_like_session_id(name: &str) -> bool {
    name.len() == 19 && name.as_bytes()[10] == b'_'
}
