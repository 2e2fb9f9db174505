//! Five-component priority score for a coaching issue.
//!
//! Each component is independently bounded (severity 0-40, reliability
//! 5-25, phase importance 8-20, consistency 0-15, progress -10..+10); the
//! total is their sum and is meaningful only for relative ranking.

use crate::models::issue::PriorityScore;
use crate::models::metric::MetricKind;
use crate::models::phase::Phase;
use crate::priority::config::PriorityConfig;
use crate::reliability::ReliabilityLevel;

fn severity_points(kind: MetricKind, deviation: f64) -> f64 {
    let dev = deviation.abs();
    match kind {
        MetricKind::Angle => {
            if dev >= 80.0 {
                40.0
            } else if dev >= 50.0 {
                35.0
            } else if dev >= 30.0 {
                30.0
            } else if dev >= 20.0 {
                20.0
            } else if dev >= 10.0 {
                10.0
            } else {
                5.0
            }
        }
        MetricKind::Ratio => {
            if dev >= 4.0 {
                40.0
            } else if dev >= 3.0 {
                30.0
            } else if dev >= 2.0 {
                20.0
            } else if dev >= 1.0 {
                10.0
            } else {
                5.0
            }
        }
    }
}

fn reliability_points(level: ReliabilityLevel) -> f64 {
    match level {
        ReliabilityLevel::High => 25.0,
        ReliabilityLevel::Medium => 15.0,
        ReliabilityLevel::Low => 5.0,
    }
}

fn phase_points(phase: Phase) -> f64 {
    match phase {
        Phase::Contact => 20.0,
        Phase::Load => 15.0,
        Phase::FollowThrough => 12.0,
        Phase::Preparation => 8.0,
    }
}

/// Score one issue. `phase_stability` is 0-100; `progress_delta` is the
/// change in the issue's phase score since the previous session (positive
/// means the phase got worse for error-like tracking, see the classifier).
pub fn compute_priority(
    metric: &str,
    deviation: f64,
    phase: Phase,
    reliability: ReliabilityLevel,
    phase_stability: f64,
    progress_delta: f64,
    config: &PriorityConfig,
) -> PriorityScore {
    let severity = severity_points(MetricKind::of(metric), deviation);
    let reliability = reliability_points(reliability);
    let phase_importance = phase_points(phase);
    let consistency = (phase_stability / 100.0) * config.consistency_weight;

    let progress_modifier = if progress_delta > config.progress_gate {
        progress_delta.min(config.progress_cap)
    } else if progress_delta < -config.progress_gate {
        progress_delta.max(-config.progress_cap)
    } else {
        0.0
    };

    PriorityScore {
        total: severity + reliability + phase_importance + consistency + progress_modifier,
        severity,
        reliability,
        phase_importance,
        consistency,
        progress_modifier,
    }
}
