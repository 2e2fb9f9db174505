//! Drill outcome recording.
//!
//! After a session is analyzed, each drill prescribed in the previous
//! session is checked against the phase-average value of its target metric
//! in both sessions; where both values exist, one outcome record is
//! emitted. Recording observes only, it never feeds back into the current
//! session's recommendations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::drill::DrillPrescription;
use crate::models::metric::PhaseMetricTable;
use crate::models::outcome::OutcomeRecord;
use crate::reliability::ReliabilityAssessment;

/// Outcome records for the drills prescribed in `previous` session.
/// General/all-phase drills have no concrete target and are skipped, as is
/// any (metric, phase) pair missing a value on either side.
pub fn track_outcomes(
    previous_session_id: &str,
    current_session_id: &str,
    prescriptions: &[DrillPrescription],
    previous_metrics: &PhaseMetricTable,
    current_metrics: &PhaseMetricTable,
    reliability: &BTreeMap<String, ReliabilityAssessment>,
    now: DateTime<Utc>,
) -> Vec<OutcomeRecord> {
    let mut outcomes = Vec::new();

    for prescription in prescriptions {
        let Some(phase) = prescription.target_phase else {
            continue;
        };

        let pre = previous_metrics
            .get(&phase)
            .and_then(|m| m.get(&prescription.target_metric));
        let post = current_metrics
            .get(&phase)
            .and_then(|m| m.get(&prescription.target_metric));
        let (Some(&pre_value), Some(&post_value)) = (pre, post) else {
            continue;
        };

        outcomes.push(OutcomeRecord {
            previous_session_id: previous_session_id.to_string(),
            current_session_id: current_session_id.to_string(),
            metric_name: prescription.target_metric.clone(),
            phase,
            drill_name: prescription.drill_name.clone(),
            intensity: prescription.intensity,
            classification: prescription.urgency,
            pre_value,
            post_value,
            delta: post_value - pre_value,
            reliability: reliability
                .get(&prescription.target_metric)
                .map(|a| a.level),
            timestamp: now,
        });
    }

    outcomes
}
