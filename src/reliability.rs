//! Per-metric measurement reliability from within-session variance.
//!
//! A metric measured with low frame-to-frame variance is trusted more than
//! a noisy one; downstream scoring weighs issues by this level.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::metric::{mean, std_dev, FrameTable, MetricKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReliabilityLevel {
    High,
    Medium,
    Low,
}

impl ReliabilityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReliabilityLevel::High => "High",
            ReliabilityLevel::Medium => "Medium",
            ReliabilityLevel::Low => "Low",
        }
    }
}

/// Reliability of one metric's measurement over a session. Created once
/// from the full frame series, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityAssessment {
    pub level: ReliabilityLevel,
    pub mean: f64,
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
}

/// Assess one metric from its non-missing frame values. Returns `None`
/// when there are no samples at all: an unmeasured metric is omitted, not
/// defaulted to a level.
pub fn assess_metric(metric: &str, values: &[f64]) -> Option<ReliabilityAssessment> {
    if values.is_empty() {
        return None;
    }

    let m = mean(values);
    let std = std_dev(values);
    let cv = if m != 0.0 { std / m } else { 0.0 };

    let level = match MetricKind::of(metric) {
        // Degrees carry an absolute noise floor, so classify on raw std.
        MetricKind::Angle => {
            if std < 10.0 {
                ReliabilityLevel::High
            } else if std < 20.0 {
                ReliabilityLevel::Medium
            } else {
                ReliabilityLevel::Low
            }
        }
        MetricKind::Ratio => {
            if cv < 0.15 {
                ReliabilityLevel::High
            } else if cv < 0.30 {
                ReliabilityLevel::Medium
            } else {
                ReliabilityLevel::Low
            }
        }
    };

    Some(ReliabilityAssessment {
        level,
        mean: m,
        std_dev: std,
        coefficient_of_variation: cv,
    })
}

/// Assess every metric in the frame table.
pub fn assess_all(table: &FrameTable) -> BTreeMap<String, ReliabilityAssessment> {
    let mut out = BTreeMap::new();
    for metric in table.metric_names() {
        if let Some(assessment) = assess_metric(metric, &table.values(metric)) {
            out.insert(metric.to_string(), assessment);
        }
    }
    out
}
