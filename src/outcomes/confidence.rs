//! Historical drill effectiveness scoring.
//!
//! Read-only over the accumulated outcome history: groups records by drill
//! name and blends improvement magnitude, measurement reliability, outcome
//! consistency and sample size into a 0-1 confidence score. The result is
//! diagnostic and never consulted by the live recommendation path.

use crate::models::metric::{mean, std_dev};
use crate::models::outcome::{ConfidenceLevel, DrillConfidence, OutcomeRecord};
use crate::reliability::ReliabilityLevel;

const IMPROVEMENT_WEIGHT: f64 = 0.40;
const RELIABILITY_WEIGHT: f64 = 0.25;
const CONSISTENCY_WEIGHT: f64 = 0.25;
const SAMPLE_WEIGHT: f64 = 0.10;

/// Samples at which the sample-size component saturates.
const FULL_SAMPLE_COUNT: f64 = 5.0;

fn confidence_level(score: f64) -> ConfidenceLevel {
    if score >= 0.75 {
        ConfidenceLevel::High
    } else if score >= 0.50 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

fn score_drill(deltas: &[f64], high_reliability: usize) -> DrillConfidence {
    let usage_count = deltas.len();
    let avg_delta = mean(deltas);
    let std_delta = std_dev(deltas);
    let high_reliability_ratio = high_reliability as f64 / usage_count as f64;

    // Consistency: inverse coefficient of variation when the mean effect
    // is meaningfully non-zero, absolute spread otherwise.
    let consistency = if avg_delta.abs() > 0.1 {
        (1.0 - (std_delta / avg_delta.abs()).min(1.0)).max(0.0)
    } else {
        (1.0 - (std_delta / 10.0).min(1.0)).max(0.0)
    };

    // Negative delta is improvement; deltas of +-20 map onto [0, 1].
    let improvement_score = (0.5 - avg_delta / 40.0).clamp(0.0, 1.0);
    let sample_score = (usage_count as f64 / FULL_SAMPLE_COUNT).min(1.0);

    let confidence_score = IMPROVEMENT_WEIGHT * improvement_score
        + RELIABILITY_WEIGHT * high_reliability_ratio
        + CONSISTENCY_WEIGHT * consistency
        + SAMPLE_WEIGHT * sample_score;

    DrillConfidence {
        usage_count,
        avg_delta,
        std_delta,
        high_reliability_ratio,
        consistency,
        confidence_score,
        confidence_level: confidence_level(confidence_score),
    }
}

/// Confidence per drill, in first-appearance order of the history.
pub fn confidence_scores(records: &[OutcomeRecord]) -> Vec<(String, DrillConfidence)> {
    let mut groups: Vec<(String, Vec<f64>, usize)> = Vec::new();

    for record in records {
        let high = matches!(record.reliability, Some(ReliabilityLevel::High)) as usize;
        match groups.iter_mut().find(|(name, _, _)| *name == record.drill_name) {
            Some((_, deltas, high_count)) => {
                deltas.push(record.delta);
                *high_count += high;
            }
            None => groups.push((record.drill_name.clone(), vec![record.delta], high)),
        }
    }

    groups
        .into_iter()
        .map(|(name, deltas, high)| {
            let confidence = score_drill(&deltas, high);
            (name, confidence)
        })
        .collect()
}

/// Top `n` drills by confidence score, descending; ties keep the
/// first-appearance order from the history.
pub fn top_effective_drills(records: &[OutcomeRecord], n: usize) -> Vec<(String, DrillConfidence)> {
    let mut scored = confidence_scores(records);
    scored.sort_by(|a, b| {
        b.1.confidence_score
            .partial_cmp(&a.1.confidence_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::drill::{Intensity, Urgency};
    use crate::models::phase::Phase;
    use chrono::Utc;

    fn record(drill: &str, delta: f64, reliability: Option<ReliabilityLevel>) -> OutcomeRecord {
        OutcomeRecord {
            previous_session_id: "2026-01-10_09-00-00".into(),
            current_session_id: "2026-01-17_09-00-00".into(),
            metric_name: "hip_rotation".into(),
            phase: Phase::Contact,
            drill_name: drill.into(),
            intensity: Intensity::Moderate,
            classification: Urgency::Moderate,
            pre_value: 0.0,
            post_value: delta,
            delta,
            reliability,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn five_good_outcomes_score_high() {
        let records: Vec<_> = [-10.0, -12.0, -8.0, -11.0, -9.0]
            .into_iter()
            .map(|d| record("X", d, Some(ReliabilityLevel::High)))
            .collect();

        let scored = confidence_scores(&records);
        assert_eq!(scored.len(), 1);
        let (name, c) = &scored[0];
        assert_eq!(name, "X");
        assert_eq!(c.usage_count, 5);
        assert!((c.avg_delta + 10.0).abs() < 1e-9);
        assert!((c.std_delta - 2.0_f64.sqrt()).abs() < 1e-9);
        assert_eq!(c.high_reliability_ratio, 1.0);
        assert!((c.consistency - (1.0 - 2.0_f64.sqrt() / 10.0)).abs() < 1e-9);
        // 0.4*0.75 + 0.25*1.0 + 0.25*consistency + 0.1*1.0
        let expected = 0.3 + 0.25 + 0.25 * (1.0 - 2.0_f64.sqrt() / 10.0) + 0.1;
        assert!((c.confidence_score - expected).abs() < 1e-9);
        assert_eq!(c.confidence_level, ConfidenceLevel::High);
    }

    #[test]
    fn score_stays_in_unit_interval() {
        let cases = [
            vec![record("A", 50.0, None)],
            vec![record("B", -50.0, Some(ReliabilityLevel::High))],
            vec![
                record("C", 30.0, Some(ReliabilityLevel::Low)),
                record("C", -30.0, Some(ReliabilityLevel::High)),
            ],
        ];
        for records in cases {
            for (_, c) in confidence_scores(&records) {
                assert!((0.0..=1.0).contains(&c.confidence_score));
                assert!((0.0..=1.0).contains(&c.consistency));
            }
        }
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(confidence_level(0.75), ConfidenceLevel::High);
        assert_eq!(confidence_level(0.7499), ConfidenceLevel::Medium);
        assert_eq!(confidence_level(0.50), ConfidenceLevel::Medium);
        assert_eq!(confidence_level(0.4999), ConfidenceLevel::Low);
    }

    #[test]
    fn near_zero_mean_uses_absolute_spread() {
        let records = vec![record("A", 0.05, None), record("A", -0.05, None)];
        let (_, c) = &confidence_scores(&records)[0];
        // avg 0, std 0.05 -> consistency 1 - 0.05/10
        assert!((c.consistency - (1.0 - 0.005)).abs() < 1e-9);
    }

    #[test]
    fn single_record_has_zero_std() {
        let records = vec![record("A", -5.0, None)];
        let (_, c) = &confidence_scores(&records)[0];
        assert_eq!(c.std_delta, 0.0);
        assert_eq!(c.usage_count, 1);
        assert!((c.consistency - 1.0).abs() < 1e-9);
    }

    #[test]
    fn idempotent_over_unchanged_history() {
        let records: Vec<_> = [-4.0, -6.0, 2.0]
            .into_iter()
            .map(|d| record("X", d, Some(ReliabilityLevel::Medium)))
            .collect();
        let a = confidence_scores(&records);
        let b = confidence_scores(&records);
        assert_eq!(a.len(), b.len());
        for ((na, ca), (nb, cb)) in a.iter().zip(b.iter()) {
            assert_eq!(na, nb);
            assert_eq!(ca.confidence_score, cb.confidence_score);
        }
    }

    #[test]
    fn top_drills_sorted_with_stable_ties() {
        let records = vec![
            record("first", -10.0, Some(ReliabilityLevel::High)),
            record("second", -10.0, Some(ReliabilityLevel::High)),
            record("weak", 10.0, None),
        ];
        let top = top_effective_drills(&records, 2);
        assert_eq!(top.len(), 2);
        // Identical scores: insertion order preserved.
        assert_eq!(top[0].0, "first");
        assert_eq!(top[1].0, "second");
    }
}
