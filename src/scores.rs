//! Technique similarity scoring against the reference.
//!
//! Produces the per-phase and overall scores that progress tracking
//! compares across sessions. Scores are tolerance-weighted: each metric
//! deviation maps to 0-100 where zero deviation is 100 and twice the
//! tolerance is 0.

use std::collections::BTreeMap;

use crate::models::metric::PhaseMetricTable;
use crate::models::phase::Phase;
use crate::models::session::SessionScores;

/// Neutral score when nothing usable is available to compare.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// (metric, tolerance, weight). Tolerance is the deviation that costs half
/// the score; weight is the metric's share in the weighted average.
const METRIC_TOLERANCES: [(&str, f64, f64); 9] = [
    ("left_elbow_angle", 30.0, 1.0),
    ("right_elbow_angle", 30.0, 1.0),
    ("left_knee_angle", 25.0, 1.0),
    ("right_knee_angle", 25.0, 1.0),
    ("hip_rotation", 20.0, 1.5),
    ("spine_lean", 15.0, 1.0),
    ("stance_width_normalized", 2.0, 1.2),
    ("left_shoulder_angle", 35.0, 0.8),
    ("right_shoulder_angle", 35.0, 0.8),
];

fn phase_weight(phase: Phase) -> f64 {
    match phase {
        Phase::Preparation => 0.15,
        Phase::Load => 0.25,
        Phase::Contact => 0.35,
        Phase::FollowThrough => 0.25,
    }
}

/// Weighted similarity between two metric maps. Metrics missing on either
/// side are skipped; with zero usable metrics the neutral 50.0 is returned.
pub fn similarity_score(user: &BTreeMap<String, f64>, reference: &BTreeMap<String, f64>) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for (metric, tolerance, weight) in METRIC_TOLERANCES {
        let (Some(user_val), Some(ref_val)) = (user.get(metric), reference.get(metric)) else {
            continue;
        };
        if !user_val.is_finite() || !ref_val.is_finite() {
            continue;
        }
        let deviation = (user_val - ref_val).abs();
        let similarity = (100.0 * (1.0 - deviation / (2.0 * tolerance))).max(0.0);
        weighted_sum += similarity * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        NEUTRAL_SCORE
    }
}

/// Per-phase similarity for every phase present in both tables.
pub fn phase_scores(user: &PhaseMetricTable, reference: &PhaseMetricTable) -> BTreeMap<Phase, f64> {
    let mut out = BTreeMap::new();
    for phase in Phase::ALL {
        if let (Some(u), Some(r)) = (user.get(&phase), reference.get(&phase)) {
            out.insert(phase, similarity_score(u, r));
        }
    }
    out
}

/// Importance-weighted average over present phases; contact dominates.
pub fn phase_weighted_score(scores: &BTreeMap<Phase, f64>) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (phase, score) in scores {
        let w = phase_weight(*phase);
        weighted_sum += score * w;
        total_weight += w;
    }
    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        NEUTRAL_SCORE
    }
}

/// Full score set for one session: overall similarity at impact plus
/// per-phase and phase-weighted scores.
pub fn session_scores(
    user_impact: &BTreeMap<String, f64>,
    ref_impact: &BTreeMap<String, f64>,
    user_phases: &PhaseMetricTable,
    ref_phases: &PhaseMetricTable,
) -> SessionScores {
    let per_phase = phase_scores(user_phases, ref_phases);
    SessionScores {
        overall_score: similarity_score(user_impact, ref_impact),
        phase_weighted_score: phase_weighted_score(&per_phase),
        phase_scores: per_phase,
    }
}
