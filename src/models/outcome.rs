use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::drill::{Intensity, Urgency};
use crate::models::phase::Phase;
use crate::reliability::ReliabilityLevel;

/// One drill-to-outcome observation, persisted append-only. Created when a
/// drill prescribed in one session has a measurable pre and post value for
/// its target (metric, phase) pair. Never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub previous_session_id: String,
    pub current_session_id: String,
    pub metric_name: String,
    pub phase: Phase,
    pub drill_name: String,
    pub intensity: Intensity,
    pub classification: Urgency,
    pub pre_value: f64,
    pub post_value: f64,
    /// post minus pre.
    pub delta: f64,
    #[serde(default)]
    pub reliability: Option<ReliabilityLevel>,
    pub timestamp: DateTime<Utc>,
}

/// Confidence tier for a drill's historical effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// Historical effectiveness estimate for one drill, recomputed on demand
/// from the full outcome history. Read-only and diagnostic; never feeds
/// back into live recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillConfidence {
    pub usage_count: usize,
    pub avg_delta: f64,
    pub std_delta: f64,
    pub high_reliability_ratio: f64,
    /// 0-1, higher means the drill's effect is consistent across uses.
    pub consistency: f64,
    /// 0-1 blend of improvement, reliability, consistency and sample size.
    pub confidence_score: f64,
    pub confidence_level: ConfidenceLevel,
}
