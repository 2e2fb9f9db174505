use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::phase::{Phase, PhaseSpan};

/// Phase-averaged metric values: phase -> metric name -> value.
pub type PhaseMetricTable = BTreeMap<Phase, BTreeMap<String, f64>>;

/// Rough unit family of a metric, derived from its name. Angle-family
/// metrics are measured in degrees (angles, rotations, lean); everything
/// else is a dimensionless normalized value such as stance width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Angle,
    Ratio,
}

impl MetricKind {
    pub fn of(metric_name: &str) -> Self {
        let name = metric_name.to_ascii_lowercase();
        if name.contains("angle") || name.contains("rotation") || name.contains("lean") {
            MetricKind::Angle
        } else {
            MetricKind::Ratio
        }
    }
}

/// Per-frame metric series for one session. Rows are frame indices,
/// columns are named metrics; `None` marks frames where the pose stage
/// could not measure the metric (occlusion, failed detection).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameTable {
    pub series: BTreeMap<String, Vec<Option<f64>>>,
}

impl FrameTable {
    /// Non-missing values of one column across the whole session.
    pub fn values(&self, metric: &str) -> Vec<f64> {
        self.series
            .get(metric)
            .map(|col| col.iter().filter_map(|v| *v).collect())
            .unwrap_or_default()
    }

    /// Non-missing values of one column restricted to a phase's frame
    /// range. The range is clamped to the column length.
    pub fn values_in_span(&self, metric: &str, span: PhaseSpan) -> Vec<f64> {
        let Some(col) = self.series.get(metric) else {
            return Vec::new();
        };
        if span.start >= col.len() {
            return Vec::new();
        }
        let end = span.end.min(col.len() - 1);
        col[span.start..=end].iter().filter_map(|v| *v).collect()
    }

    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

/// Mean of a slice. Callers guard against empty input where it matters.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
