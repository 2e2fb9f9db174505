//! Coaching issue classification.
//!
//! A pure decision ladder over derived boolean signals; every session
//! reclassifies from scratch, there is no persisted issue identity. First
//! matching rule wins.

use serde::{Deserialize, Serialize};

use crate::models::issue::Classification;
use crate::models::metric::MetricKind;
use crate::priority::config::PriorityConfig;
use crate::reliability::ReliabilityLevel;

/// Boolean signals the classifier decides on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IssueSignals {
    pub is_severe: bool,
    pub is_moderate: bool,
    pub reliability: ReliabilityLevel,
    pub is_improving: bool,
    pub is_worsening: bool,
    pub is_consistent: bool,
}

impl IssueSignals {
    /// Derive signals from raw measurements. `progress_delta` of exactly
    /// 0.0 means no progress signal (first session), which can satisfy
    /// neither the improving nor the worsening gate.
    pub fn derive(
        metric: &str,
        deviation: f64,
        reliability: ReliabilityLevel,
        phase_stability: f64,
        progress_delta: f64,
        config: &PriorityConfig,
    ) -> Self {
        let dev = deviation.abs();
        let (severe_at, moderate_at) = match MetricKind::of(metric) {
            MetricKind::Angle => (config.severe_angle_deviation, config.moderate_angle_deviation),
            MetricKind::Ratio => (config.severe_ratio_deviation, config.moderate_ratio_deviation),
        };
        Self {
            is_severe: dev >= severe_at,
            is_moderate: dev >= moderate_at,
            reliability,
            is_improving: progress_delta < -config.progress_gate,
            is_worsening: progress_delta > config.progress_gate,
            is_consistent: phase_stability >= config.consistent_stability_min,
        }
    }
}

/// Classify one issue. Returns the classification together with the advice
/// line for the report; both CRITICAL branches classify identically and
/// differ only in that text.
pub fn classify(signals: &IssueSignals) -> (Classification, &'static str) {
    let is_reliable = matches!(
        signals.reliability,
        ReliabilityLevel::High | ReliabilityLevel::Medium
    );

    if signals.is_severe
        && signals.reliability == ReliabilityLevel::High
        && signals.is_consistent
    {
        if signals.is_worsening {
            (
                Classification::Critical,
                "Address immediately - severe issue getting worse",
            )
        } else {
            (
                Classification::Critical,
                "Address immediately - severe and consistent issue",
            )
        }
    } else if signals.is_severe && is_reliable {
        (
            Classification::Priority,
            "Focus on this - significant deviation from pro technique",
        )
    } else if signals.is_moderate && is_reliable && !signals.is_improving {
        (Classification::Priority, "Important area for improvement")
    } else if signals.is_improving && is_reliable {
        (
            Classification::Monitor,
            "Continue current approach - showing improvement",
        )
    } else if signals.reliability == ReliabilityLevel::Low && !signals.is_severe {
        (
            Classification::Suppress,
            "Low measurement confidence - may not be actionable",
        )
    } else if signals.is_moderate && signals.reliability == ReliabilityLevel::Low {
        (
            Classification::Monitor,
            "Verify measurement quality before focusing on this",
        )
    } else {
        (
            Classification::Monitor,
            "Track progress - minor issue or improving",
        )
    }
}
