//! Deviation-to-issue detection.
//!
//! Compares the user's phase-averaged metrics against the reference and
//! emits at most one `CoachingIssue` per (metric, phase) pair whose signed
//! deviation exceeds the metric's significance threshold. Cue text is
//! looked up from a static table keyed by metric and deviation direction.

use crate::models::issue::CoachingIssue;
use crate::models::metric::PhaseMetricTable;
use crate::models::phase::Phase;

struct CueRule {
    metric: &'static str,
    threshold: f64,
    /// Cue when the user's value is above the reference.
    high: &'static str,
    /// Cue when the user's value is below the reference.
    low: &'static str,
}

const CUE_RULES: [CueRule; 9] = [
    CueRule {
        metric: "left_elbow_angle",
        threshold: 15.0,
        high: "Bend your left elbow more. Your arm is too straight, reducing control and power transfer.",
        low: "Extend your left elbow slightly more. A bit more extension will add reach and power.",
    },
    CueRule {
        metric: "right_elbow_angle",
        threshold: 15.0,
        high: "Keep your right elbow closer to your body for better stability. Think compact arms.",
        low: "Allow your right elbow to extend more through the hitting zone for better racquet speed.",
    },
    CueRule {
        metric: "left_knee_angle",
        threshold: 15.0,
        high: "Bend your knees more. Lower stance means more power from the ground up.",
        low: "Don't over-crouch. Too much knee bend slows your recovery.",
    },
    CueRule {
        metric: "right_knee_angle",
        threshold: 15.0,
        high: "Bend your knees more. Lower stance means more power from the ground up.",
        low: "Don't over-crouch. Too much knee bend slows your recovery.",
    },
    CueRule {
        metric: "hip_rotation",
        threshold: 5.0,
        high: "Control your hip rotation. Over-rotation can throw off your timing and balance.",
        low: "Rotate your hips more into the shot. Your upper body is doing most of the work.",
    },
    CueRule {
        metric: "spine_lean",
        threshold: 8.0,
        high: "Stay more upright through contact. You're leaning too much, which affects balance.",
        low: "Lean into the shot slightly more for better weight transfer through the ball.",
    },
    CueRule {
        metric: "stance_width_normalized",
        threshold: 0.3,
        high: "Narrow your stance slightly. Too wide limits your hip rotation and recovery speed.",
        low: "Widen your stance for a more stable base. You'll generate more power from your legs.",
    },
    CueRule {
        metric: "left_shoulder_angle",
        threshold: 25.0,
        high: "Relax your shoulder turn slightly; over-rotating the shoulders costs you timing.",
        low: "Turn your shoulders earlier and more completely during the setup.",
    },
    CueRule {
        metric: "right_shoulder_angle",
        threshold: 25.0,
        high: "Relax your shoulder turn slightly; over-rotating the shoulders costs you timing.",
        low: "Turn your shoulders earlier and more completely during the setup.",
    },
];

const DEFAULT_THRESHOLD: f64 = 10.0;

fn rule_for(metric: &str) -> Option<&'static CueRule> {
    CUE_RULES.iter().find(|r| r.metric == metric)
}

fn cue_for(metric: &str, phase: Phase, deviation: f64) -> String {
    match rule_for(metric) {
        Some(rule) if deviation > 0.0 => rule.high.to_string(),
        Some(rule) => rule.low.to_string(),
        None => format!(
            "Work on your {} during the {} phase.",
            metric.replace('_', " "),
            phase
        ),
    }
}

fn threshold_for(metric: &str) -> f64 {
    rule_for(metric).map(|r| r.threshold).unwrap_or(DEFAULT_THRESHOLD)
}

/// Detect issues across every phase present in both tables. Metrics absent
/// on either side are skipped (missing data means no issue, not a zero).
pub fn detect_issues(user: &PhaseMetricTable, reference: &PhaseMetricTable) -> Vec<CoachingIssue> {
    let mut issues = Vec::new();

    for phase in Phase::ALL {
        let (Some(user_metrics), Some(ref_metrics)) = (user.get(&phase), reference.get(&phase))
        else {
            continue;
        };

        for (metric, user_val) in user_metrics {
            let Some(ref_val) = ref_metrics.get(metric) else {
                continue;
            };
            if !user_val.is_finite() || !ref_val.is_finite() {
                continue;
            }
            let deviation = user_val - ref_val;
            if deviation.abs() > threshold_for(metric) {
                issues.push(CoachingIssue {
                    metric: metric.clone(),
                    phase,
                    deviation,
                    cue: cue_for(metric, phase, deviation),
                });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn table(phase: Phase, pairs: &[(&str, f64)]) -> PhaseMetricTable {
        let mut t = PhaseMetricTable::new();
        t.insert(
            phase,
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        );
        t
    }

    #[test]
    fn deviation_below_threshold_is_not_an_issue() {
        let user = table(Phase::Contact, &[("hip_rotation", 48.0)]);
        let reference = table(Phase::Contact, &[("hip_rotation", 45.0)]);
        assert!(detect_issues(&user, &reference).is_empty());
    }

    #[test]
    fn signed_deviation_selects_cue_direction() {
        let user = table(Phase::Contact, &[("hip_rotation", 30.0)]);
        let reference = table(Phase::Contact, &[("hip_rotation", 45.0)]);
        let issues = detect_issues(&user, &reference);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].deviation, -15.0);
        assert!(issues[0].cue.contains("Rotate your hips more"));

        let user = table(Phase::Contact, &[("hip_rotation", 60.0)]);
        let issues = detect_issues(&user, &reference);
        assert!(issues[0].cue.contains("Control your hip rotation"));
    }

    #[test]
    fn metric_missing_on_reference_side_is_skipped() {
        let user = table(Phase::Load, &[("hip_rotation", 90.0), ("spine_lean", 30.0)]);
        let reference = table(Phase::Load, &[("hip_rotation", 45.0)]);
        let issues = detect_issues(&user, &reference);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].metric, "hip_rotation");
    }

    #[test]
    fn unknown_metric_gets_default_threshold_and_generic_cue() {
        let user = table(Phase::Load, &[("wrist_snap", 25.0)]);
        let reference = table(Phase::Load, &[("wrist_snap", 5.0)]);
        let issues = detect_issues(&user, &reference);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].cue.contains("wrist snap"));
        assert!(issues[0].cue.contains("load"));
    }

    #[test]
    fn one_issue_per_metric_phase_pair() {
        let mut user = table(Phase::Load, &[("hip_rotation", 20.0)]);
        user.insert(
            Phase::Contact,
            [("hip_rotation".to_string(), 20.0)].into_iter().collect(),
        );
        let mut reference = table(Phase::Load, &[("hip_rotation", 45.0)]);
        reference.insert(
            Phase::Contact,
            [("hip_rotation".to_string(), 50.0)].into_iter().collect(),
        );

        let issues = detect_issues(&user, &reference);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.phase == Phase::Load));
        assert!(issues.iter().any(|i| i.phase == Phase::Contact));
    }
}
