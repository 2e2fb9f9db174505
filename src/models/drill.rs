use serde::{Deserialize, Serialize};

use crate::models::phase::Phase;

/// Prescription intensity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    Moderate,
    Intensive,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Light => "light",
            Intensity::Moderate => "moderate",
            Intensity::Intensive => "intensive",
        }
    }
}

/// Urgency tier of a prescription, following the issue classification that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    High,
    Moderate,
    Maintenance,
}

/// One drill prescribed for a session. `target_phase` is `None` only for
/// the general-technique fallback, which targets the whole stroke and is
/// excluded from outcome tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillPrescription {
    pub target_metric: String,
    pub target_phase: Option<Phase>,
    pub drill_name: String,
    pub description: String,
    pub intensity: Intensity,
    /// Concrete sets/reps/duration text for the chosen intensity.
    pub prescription: String,
    pub rationale: String,
    pub priority_score: f64,
    pub urgency: Urgency,
    pub reason: String,
}

/// Drill recommendations for one session, partitioned by urgency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub critical: Vec<DrillPrescription>,
    pub priority: Vec<DrillPrescription>,
    pub maintenance: Vec<DrillPrescription>,
    pub suppressed_count: usize,
}

impl RecommendationSet {
    /// All prescriptions across urgency tiers, in tier order.
    pub fn all(&self) -> impl Iterator<Item = &DrillPrescription> {
        self.critical
            .iter()
            .chain(self.priority.iter())
            .chain(self.maintenance.iter())
    }
}
