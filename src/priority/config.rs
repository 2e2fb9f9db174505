/// Tunable thresholds for priority scoring and classification.
#[derive(Debug, Clone)]
pub struct PriorityConfig {
    /// Deviation above which an angle-family issue is severe (degrees).
    pub severe_angle_deviation: f64,
    /// Deviation above which a ratio-family issue is severe.
    pub severe_ratio_deviation: f64,
    /// Moderate thresholds, same split.
    pub moderate_angle_deviation: f64,
    pub moderate_ratio_deviation: f64,

    /// Phase stability at or above this counts as consistent.
    pub consistent_stability_min: f64,
    /// Maximum points the consistency component contributes.
    pub consistency_weight: f64,

    /// Progress deltas within this band are treated as neutral.
    pub progress_gate: f64,
    /// Cap on the progress modifier's magnitude.
    pub progress_cap: f64,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            severe_angle_deviation: 50.0,
            severe_ratio_deviation: 3.0,
            moderate_angle_deviation: 20.0,
            moderate_ratio_deviation: 1.5,
            consistent_stability_min: 70.0,
            consistency_weight: 15.0,
            progress_gate: 5.0,
            progress_cap: 10.0,
        }
    }
}
