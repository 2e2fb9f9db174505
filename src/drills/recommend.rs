//! Drill selection from classified issues.
//!
//! Policy: critical issues each get the category's lead drill at intensive
//! intensity, the top three priority issues get the category's second drill
//! (or the lead when there is only one) at moderate, and up to two monitor
//! issues that are actively improving get a light maintenance drill.
//! Suppressed issues are only counted. The set is never empty: with no
//! critical or priority drills, a general-technique drill is injected.

use crate::drills::catalog::{DrillCatalog, DrillCategory};
use crate::models::drill::{DrillPrescription, Intensity, RecommendationSet, Urgency};
use crate::models::issue::{Classification, ClassifiedIssue};
use crate::models::metric::MetricKind;

const PRIORITY_DRILL_LIMIT: usize = 3;
const MAINTENANCE_DRILL_LIMIT: usize = 2;
const IMPROVING_DELTA_MAX: f64 = -5.0;
const FALLBACK_SCORE: f64 = 50.0;

fn deviation_text(issue: &ClassifiedIssue) -> String {
    let unit = match MetricKind::of(&issue.issue.metric) {
        MetricKind::Angle => "\u{b0}",
        MetricKind::Ratio => "",
    };
    format!("{:.1}{unit}", issue.issue.deviation.abs())
}

fn prescribe(
    issue: &ClassifiedIssue,
    drill: &crate::drills::catalog::Drill,
    intensity: Intensity,
    urgency: Urgency,
    reason: String,
) -> DrillPrescription {
    DrillPrescription {
        target_metric: issue.issue.metric.clone(),
        target_phase: Some(issue.issue.phase),
        drill_name: drill.name.to_string(),
        description: drill.description.to_string(),
        intensity,
        prescription: drill.prescription(intensity).to_string(),
        rationale: drill.rationale.to_string(),
        priority_score: issue.score.total,
        urgency,
        reason,
    }
}

/// Build the recommendation set from issues already ranked by priority
/// score (descending). Ranking order decides which priority/monitor issues
/// make the per-tier cut.
pub fn recommend(ranked: &[ClassifiedIssue], catalog: &DrillCatalog) -> RecommendationSet {
    let mut set = RecommendationSet::default();

    for issue in ranked
        .iter()
        .filter(|i| i.classification == Classification::Critical)
    {
        let category = DrillCategory::for_metric(&issue.issue.metric);
        let drills = catalog.drills_for(category);
        if let Some(drill) = drills.first() {
            let reason = format!(
                "Critical issue: {} deviation, {} reliability",
                deviation_text(issue),
                issue.reliability.as_str()
            );
            set.critical.push(prescribe(
                issue,
                drill,
                Intensity::Intensive,
                Urgency::High,
                reason,
            ));
        }
    }

    for issue in ranked
        .iter()
        .filter(|i| i.classification == Classification::Priority)
        .take(PRIORITY_DRILL_LIMIT)
    {
        let category = DrillCategory::for_metric(&issue.issue.metric);
        let drills = catalog.drills_for(category);
        // Prefer a different drill than the one critical issues took.
        let drill = drills.get(1).or_else(|| drills.first());
        if let Some(drill) = drill {
            let reason = format!(
                "Priority issue: {} deviation, needs focused work",
                deviation_text(issue)
            );
            set.priority.push(prescribe(
                issue,
                drill,
                Intensity::Moderate,
                Urgency::Moderate,
                reason,
            ));
        }
    }

    for issue in ranked
        .iter()
        .filter(|i| i.classification == Classification::Monitor)
        .take(MAINTENANCE_DRILL_LIMIT)
    {
        // Maintenance drills only for issues that are actively improving;
        // low-reliability monitors get nothing.
        if issue.progress_delta >= IMPROVING_DELTA_MAX {
            continue;
        }
        let category = DrillCategory::for_metric(&issue.issue.metric);
        if let Some(drill) = catalog.drills_for(category).first() {
            set.maintenance.push(prescribe(
                issue,
                drill,
                Intensity::Light,
                Urgency::Maintenance,
                "Currently improving - maintain progress with light practice".to_string(),
            ));
        }
    }

    set.suppressed_count = ranked
        .iter()
        .filter(|i| i.classification == Classification::Suppress)
        .count();

    if set.critical.is_empty() && set.priority.is_empty() {
        if let Some(drill) = catalog
            .drills_for(DrillCategory::GeneralTechnique)
            .first()
        {
            set.priority.push(DrillPrescription {
                target_metric: "general".to_string(),
                target_phase: None,
                drill_name: drill.name.to_string(),
                description: drill.description.to_string(),
                intensity: Intensity::Moderate,
                prescription: drill.prescription(Intensity::Moderate).to_string(),
                rationale: drill.rationale.to_string(),
                priority_score: FALLBACK_SCORE,
                urgency: Urgency::Moderate,
                reason: "General technique refinement".to_string(),
            });
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::issue::{CoachingIssue, PriorityScore};
    use crate::models::phase::Phase;
    use crate::reliability::ReliabilityLevel;

    fn issue(
        metric: &str,
        classification: Classification,
        total: f64,
        progress_delta: f64,
    ) -> ClassifiedIssue {
        ClassifiedIssue {
            issue: CoachingIssue {
                metric: metric.to_string(),
                phase: Phase::Contact,
                deviation: 30.0,
                cue: String::new(),
            },
            score: PriorityScore {
                total,
                severity: 30.0,
                reliability: 25.0,
                phase_importance: 20.0,
                consistency: 10.0,
                progress_modifier: 0.0,
            },
            classification,
            advice: String::new(),
            reliability: ReliabilityLevel::High,
            phase_stability: 80.0,
            progress_delta,
        }
    }

    #[test]
    fn critical_issues_get_intensive_lead_drill() {
        let ranked = vec![issue("hip_rotation", Classification::Critical, 95.0, 0.0)];
        let set = recommend(&ranked, &DrillCatalog::default());
        assert_eq!(set.critical.len(), 1);
        let p = &set.critical[0];
        assert_eq!(p.drill_name, "Medicine Ball Rotational Throws");
        assert_eq!(p.intensity, Intensity::Intensive);
        assert_eq!(p.urgency, Urgency::High);
        assert_eq!(p.target_phase, Some(Phase::Contact));
        assert!(p.reason.contains("30.0\u{b0}"));
    }

    #[test]
    fn priority_issues_capped_at_three_and_prefer_second_drill() {
        let ranked: Vec<_> = (0..5)
            .map(|i| {
                issue(
                    "left_elbow_angle",
                    Classification::Priority,
                    90.0 - i as f64,
                    0.0,
                )
            })
            .collect();
        let set = recommend(&ranked, &DrillCatalog::default());
        assert_eq!(set.priority.len(), 3);
        assert_eq!(set.priority[0].drill_name, "Elbow-to-Body Connection");
        assert_eq!(set.priority[0].intensity, Intensity::Moderate);
    }

    #[test]
    fn single_drill_category_falls_back_to_lead_drill() {
        let ranked = vec![issue("spine_lean", Classification::Priority, 70.0, 0.0)];
        let set = recommend(&ranked, &DrillCatalog::default());
        assert_eq!(set.priority[0].drill_name, "Mirror Posture Check");
    }

    #[test]
    fn maintenance_only_for_improving_monitors() {
        let ranked = vec![
            issue("hip_rotation", Classification::Monitor, 60.0, -8.0),
            issue("spine_lean", Classification::Monitor, 55.0, 0.0),
            issue("left_knee_angle", Classification::Critical, 95.0, 0.0),
        ];
        let set = recommend(&ranked, &DrillCatalog::default());
        assert_eq!(set.maintenance.len(), 1);
        assert_eq!(set.maintenance[0].target_metric, "hip_rotation");
        assert_eq!(set.maintenance[0].intensity, Intensity::Light);
    }

    #[test]
    fn suppressed_issues_counted_but_never_prescribed() {
        let ranked = vec![
            issue("hip_rotation", Classification::Suppress, 40.0, 0.0),
            issue("spine_lean", Classification::Suppress, 35.0, 0.0),
        ];
        let set = recommend(&ranked, &DrillCatalog::default());
        assert_eq!(set.suppressed_count, 2);
        assert_eq!(set.critical.len() + set.maintenance.len(), 0);
        // Fallback kicks in because nothing critical/priority was produced.
        assert_eq!(set.priority.len(), 1);
        assert_eq!(set.priority[0].target_metric, "general");
        assert_eq!(set.priority[0].target_phase, None);
    }

    #[test]
    fn fallback_not_injected_when_priority_drills_exist() {
        let ranked = vec![issue("hip_rotation", Classification::Priority, 70.0, 0.0)];
        let set = recommend(&ranked, &DrillCatalog::default());
        assert_eq!(set.priority.len(), 1);
        assert_ne!(set.priority[0].target_metric, "general");
    }
}
