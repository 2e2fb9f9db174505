use serde::{Deserialize, Serialize};

use crate::models::phase::Phase;
use crate::reliability::ReliabilityLevel;

/// One detected deviation from the reference technique, ephemeral within
/// a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachingIssue {
    pub metric: String,
    pub phase: Phase,
    /// Signed difference, user minus reference.
    pub deviation: f64,
    pub cue: String,
}

/// Priority score breakdown for one issue. The total is the sum of the
/// five components and is used for relative ranking only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityScore {
    pub total: f64,
    pub severity: f64,
    pub reliability: f64,
    pub phase_importance: f64,
    pub consistency: f64,
    pub progress_modifier: f64,
}

/// Discrete coaching classification, re-derived from scratch every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Critical,
    Priority,
    Monitor,
    Suppress,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Critical => "CRITICAL",
            Classification::Priority => "PRIORITY",
            Classification::Monitor => "MONITOR",
            Classification::Suppress => "SUPPRESS",
        }
    }
}

/// A scored and classified issue, with the signals it was derived from,
/// ready for the report stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedIssue {
    pub issue: CoachingIssue,
    pub score: PriorityScore,
    pub classification: Classification,
    /// Human-readable advice line attached to the classification branch.
    pub advice: String,
    pub reliability: ReliabilityLevel,
    pub phase_stability: f64,
    pub progress_delta: f64,
}
