//! Cross-session progress tracking.
//!
//! Finds the previous session under the output root, loads its persisted
//! summary, and computes per-score deltas tagged with a trend. A missing
//! or unreadable prior session is the expected first-session state, never
//! an error of the current analysis.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::models::phase::Phase;
use crate::models::session::{looks_like_session_id, SessionScores, SessionSummary};

pub const SUMMARY_FILE: &str = "summary.json";

/// Direction of change between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Improved,
    Stable,
    Regressed,
}

/// Polarity of the quantity being compared: scores improve upward, errors
/// improve downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricPolarity {
    ScoreLike,
    ErrorLike,
}

const TREND_THRESHOLD: f64 = 3.0;

pub fn classify_trend(delta: f64, polarity: MetricPolarity) -> Trend {
    let delta = match polarity {
        MetricPolarity::ScoreLike => delta,
        MetricPolarity::ErrorLike => -delta,
    };
    if delta >= TREND_THRESHOLD {
        Trend::Improved
    } else if delta <= -TREND_THRESHOLD {
        Trend::Regressed
    } else {
        Trend::Stable
    }
}

/// One compared quantity between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub current: f64,
    pub previous: f64,
    pub delta: f64,
    pub trend: Trend,
}

impl ScoreDelta {
    fn score_like(current: f64, previous: f64) -> Self {
        let delta = current - previous;
        Self {
            current,
            previous,
            delta,
            trend: classify_trend(delta, MetricPolarity::ScoreLike),
        }
    }
}

/// Deltas between the current and previous session. Empty maps/None mean
/// the quantity was not comparable, not that it was unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressDeltas {
    pub overall: Option<ScoreDelta>,
    pub phase_weighted: Option<ScoreDelta>,
    pub phases: BTreeMap<Phase, ScoreDelta>,
}

impl ProgressDeltas {
    /// Progress delta for one phase, 0.0 when no comparison exists. The
    /// priority scorer treats 0.0 as "no progress signal".
    pub fn phase_delta(&self, phase: Phase) -> f64 {
        self.phases.get(&phase).map(|d| d.delta).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.overall.is_none() && self.phase_weighted.is_none() && self.phases.is_empty()
    }
}

/// Result of looking for a prior session to compare against.
#[derive(Debug, Clone)]
pub enum Baseline {
    /// A prior session with a readable summary.
    Found(SessionSummary),
    /// No prior session directory exists.
    FirstSession,
    /// A prior session exists but its summary is missing or corrupt.
    Unreadable { session_id: String },
}

impl Baseline {
    pub fn summary(&self) -> Option<&SessionSummary> {
        match self {
            Baseline::Found(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Serializable view of how the baseline lookup went, for the analysis
/// output. Distinguishes "never trained before" from "prior data is bad".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BaselineStatus {
    Found { session_id: String },
    FirstSession,
    Unreadable { session_id: String },
}

impl From<&Baseline> for BaselineStatus {
    fn from(baseline: &Baseline) -> Self {
        match baseline {
            Baseline::Found(summary) => BaselineStatus::Found {
                session_id: summary.session_id.clone(),
            },
            Baseline::FirstSession => BaselineStatus::FirstSession,
            Baseline::Unreadable { session_id } => BaselineStatus::Unreadable {
                session_id: session_id.clone(),
            },
        }
    }
}

/// Most recent session directory strictly before `current_session_id`.
/// Lexicographic order on the timestamp-shaped names is chronological.
pub fn find_previous_session(root: &Path, current_session_id: &str) -> Option<String> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return None,
    };

    let mut best: Option<String> = None;
    for entry in entries.flatten() {
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !looks_like_session_id(&name) || name.as_str() >= current_session_id {
            continue;
        }
        if best.as_deref().map_or(true, |b| name.as_str() > b) {
            best = Some(name);
        }
    }
    best
}

fn read_summary(root: &Path, session_id: &str) -> Result<SessionSummary> {
    let path = root.join(session_id).join(SUMMARY_FILE);
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read summary from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse summary at {}", path.display()))
}

/// Locate and load the previous session's summary.
pub fn load_baseline(root: &Path, current_session_id: &str) -> Baseline {
    let Some(previous_id) = find_previous_session(root, current_session_id) else {
        debug!("no prior session under {}", root.display());
        return Baseline::FirstSession;
    };

    match read_summary(root, &previous_id) {
        Ok(summary) => Baseline::Found(summary),
        Err(err) => {
            warn!("prior session {previous_id} has no usable summary: {err:#}");
            Baseline::Unreadable {
                session_id: previous_id,
            }
        }
    }
}

/// Persist the current session's summary for the next run.
pub fn save_summary(root: &Path, summary: &SessionSummary) -> Result<()> {
    let dir = root.join(&summary.session_id);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create session dir {}", dir.display()))?;
    let path = dir.join(SUMMARY_FILE);
    let serialized = serde_json::to_string_pretty(summary)?;
    fs::write(&path, serialized)
        .with_context(|| format!("failed to write summary to {}", path.display()))
}

/// Deltas for every quantity present in both score sets.
pub fn compute_deltas(current: &SessionScores, previous: &SessionScores) -> ProgressDeltas {
    let mut phases = BTreeMap::new();
    for (phase, score) in &current.phase_scores {
        if let Some(prev) = previous.phase_scores.get(phase) {
            phases.insert(*phase, ScoreDelta::score_like(*score, *prev));
        }
    }

    ProgressDeltas {
        overall: Some(ScoreDelta::score_like(
            current.overall_score,
            previous.overall_score,
        )),
        phase_weighted: Some(ScoreDelta::score_like(
            current.phase_weighted_score,
            previous.phase_weighted_score,
        )),
        phases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    fn scores(overall: f64, weighted: f64, contact: f64) -> SessionScores {
        let mut phase_scores = BTreeMap::new();
        phase_scores.insert(Phase::Contact, contact);
        SessionScores {
            overall_score: overall,
            phase_weighted_score: weighted,
            phase_scores,
        }
    }

    fn summary(session_id: &str) -> SessionSummary {
        SessionSummary {
            session_id: session_id.to_string(),
            recorded_at: Utc::now(),
            scores: scores(60.0, 62.0, 70.0),
            phase_metrics: BTreeMap::new(),
        }
    }

    #[test]
    fn trend_boundaries() {
        assert_eq!(classify_trend(3.0, MetricPolarity::ScoreLike), Trend::Improved);
        assert_eq!(classify_trend(2.9, MetricPolarity::ScoreLike), Trend::Stable);
        assert_eq!(classify_trend(-3.0, MetricPolarity::ScoreLike), Trend::Regressed);
        // Error-type quantities improve when they go down.
        assert_eq!(classify_trend(-3.0, MetricPolarity::ErrorLike), Trend::Improved);
        assert_eq!(classify_trend(3.0, MetricPolarity::ErrorLike), Trend::Regressed);
        assert_eq!(classify_trend(0.0, MetricPolarity::ErrorLike), Trend::Stable);
    }

    #[test]
    fn previous_session_is_lexicographic_max_below_current() {
        let dir = tempdir().unwrap();
        for id in [
            "2026-01-10_09-00-00",
            "2026-02-01_10-00-00",
            "2026-03-05_08-00-00",
        ] {
            fs::create_dir(dir.path().join(id)).unwrap();
        }
        fs::create_dir(dir.path().join("not_a_session")).unwrap();

        let found = find_previous_session(dir.path(), "2026-03-01_00-00-00");
        assert_eq!(found.as_deref(), Some("2026-02-01_10-00-00"));

        // Current session itself is excluded.
        let found = find_previous_session(dir.path(), "2026-01-10_09-00-00");
        assert_eq!(found, None);
    }

    #[test]
    fn first_session_baseline() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_baseline(dir.path(), "2026-03-01_00-00-00"),
            Baseline::FirstSession
        ));
    }

    #[test]
    fn corrupt_summary_is_unreadable_not_fatal() {
        let dir = tempdir().unwrap();
        let prev = dir.path().join("2026-01-10_09-00-00");
        fs::create_dir(&prev).unwrap();
        fs::write(prev.join(SUMMARY_FILE), "{ not json").unwrap();

        match load_baseline(dir.path(), "2026-03-01_00-00-00") {
            Baseline::Unreadable { session_id } => {
                assert_eq!(session_id, "2026-01-10_09-00-00")
            }
            other => panic!("expected Unreadable, got {other:?}"),
        }
    }

    #[test]
    fn summary_roundtrip_and_deltas() {
        let dir = tempdir().unwrap();
        save_summary(dir.path(), &summary("2026-01-10_09-00-00")).unwrap();

        let baseline = load_baseline(dir.path(), "2026-02-01_00-00-00");
        let prev = baseline.summary().expect("baseline should load");

        let current = scores(66.5, 64.0, 64.0);
        let deltas = compute_deltas(&current, &prev.scores);
        assert_eq!(deltas.overall.as_ref().unwrap().trend, Trend::Improved);
        assert_eq!(deltas.phase_weighted.as_ref().unwrap().trend, Trend::Stable);
        assert_eq!(deltas.phases[&Phase::Contact].trend, Trend::Regressed);
        assert!((deltas.phase_delta(Phase::Contact) + 6.0).abs() < 1e-9);
        assert_eq!(deltas.phase_delta(Phase::Load), 0.0);
    }
}
