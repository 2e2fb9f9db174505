//! Intra-phase movement stability.
//!
//! Scores how consistent each tracked metric stays within a single stroke
//! phase. A consistent deviation is real technique, not measurement noise,
//! so stability feeds the priority scorer's consistency component.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::metric::{mean, std_dev, FrameTable};
use crate::models::phase::{Phase, PhaseMap};

/// Metrics whose in-phase variance defines phase stability.
pub const STABILITY_METRICS: [&str; 6] = [
    "left_shoulder_angle",
    "right_shoulder_angle",
    "left_elbow_angle",
    "right_elbow_angle",
    "hip_rotation",
    "spine_lean",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricSpread {
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
}

/// Stability of one phase: 0-100 overall score plus per-metric spread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseStability {
    pub overall_score: f64,
    pub per_metric: BTreeMap<String, MetricSpread>,
}

fn score_for_cv(cv: f64) -> f64 {
    if cv < 0.1 {
        100.0
    } else if cv < 0.2 {
        90.0
    } else if cv < 0.3 {
        75.0
    } else if cv < 0.5 {
        60.0
    } else {
        50.0
    }
}

/// Stability per phase over the fixed metric subset. A metric with fewer
/// than 2 in-phase samples is excluded; a phase with no eligible metrics
/// is omitted from the result.
pub fn analyze_phases(table: &FrameTable, phases: &PhaseMap) -> BTreeMap<Phase, PhaseStability> {
    let mut out = BTreeMap::new();

    for (phase, span) in phases.iter() {
        let mut per_metric = BTreeMap::new();
        let mut scores = Vec::new();

        for metric in STABILITY_METRICS {
            let values = table.values_in_span(metric, span);
            if values.len() < 2 {
                continue;
            }
            let std = std_dev(&values);
            let m = mean(&values);
            let cv = if m != 0.0 { std / m.abs() } else { 0.0 };

            per_metric.insert(
                metric.to_string(),
                MetricSpread {
                    std_dev: std,
                    coefficient_of_variation: cv,
                },
            );
            scores.push(score_for_cv(cv));
        }

        if !scores.is_empty() {
            out.insert(
                phase,
                PhaseStability {
                    overall_score: mean(&scores),
                    per_metric,
                },
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::phase::PhaseSpan;

    fn phase_map() -> PhaseMap {
        let spans = Phase::ALL
            .into_iter()
            .zip([(0usize, 4usize), (5, 9), (10, 14), (15, 19)])
            .map(|(p, (start, end))| (p, PhaseSpan { start, end }))
            .collect();
        PhaseMap::new(spans).unwrap()
    }

    fn column(base: f64, wiggle: f64) -> Vec<Option<f64>> {
        (0..20)
            .map(|i| Some(base + if i % 2 == 0 { wiggle } else { -wiggle }))
            .collect()
    }

    #[test]
    fn cv_ladder_maps_to_discrete_scores() {
        assert_eq!(score_for_cv(0.05), 100.0);
        assert_eq!(score_for_cv(0.15), 90.0);
        assert_eq!(score_for_cv(0.25), 75.0);
        assert_eq!(score_for_cv(0.4), 60.0);
        assert_eq!(score_for_cv(0.9), 50.0);
    }

    #[test]
    fn overall_score_averages_eligible_metrics() {
        let mut table = FrameTable::default();
        // CV 0.05 -> 100 and CV 0.25 -> 75; phase score 87.5.
        table.series.insert("hip_rotation".into(), column(100.0, 5.0));
        table.series.insert("spine_lean".into(), column(20.0, 5.0));

        let stability = analyze_phases(&table, &phase_map());
        let contact = &stability[&Phase::Contact];
        assert_eq!(contact.per_metric.len(), 2);
        assert!((contact.overall_score - 87.5).abs() < 1e-9);
    }

    #[test]
    fn short_series_excluded_and_empty_phase_omitted() {
        let mut table = FrameTable::default();
        // Only one non-missing sample inside preparation, nothing later.
        let mut col: Vec<Option<f64>> = vec![None; 20];
        col[2] = Some(90.0);
        table.series.insert("left_elbow_angle".into(), col);

        let stability = analyze_phases(&table, &phase_map());
        assert!(stability.is_empty());
    }

    #[test]
    fn negative_mean_uses_absolute_value_for_cv() {
        let mut table = FrameTable::default();
        table.series.insert("hip_rotation".into(), column(-100.0, 5.0));
        let stability = analyze_phases(&table, &phase_map());
        let prep = &stability[&Phase::Preparation];
        let spread = &prep.per_metric["hip_rotation"];
        assert!(spread.coefficient_of_variation > 0.0);
        assert_eq!(prep.overall_score, 100.0);
    }
}
