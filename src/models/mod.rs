pub mod drill;
pub mod issue;
pub mod metric;
pub mod outcome;
pub mod phase;
pub mod session;

pub use drill::{DrillPrescription, Intensity, RecommendationSet, Urgency};
pub use issue::{Classification, ClassifiedIssue, CoachingIssue, PriorityScore};
pub use metric::{FrameTable, MetricKind, PhaseMetricTable};
pub use outcome::{ConfidenceLevel, DrillConfidence, OutcomeRecord};
pub use phase::{Phase, PhaseMap, PhaseSpan};
pub use session::{SessionScores, SessionSummary};
