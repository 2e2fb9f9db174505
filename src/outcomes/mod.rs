pub mod confidence;
pub mod store;
pub mod tracker;

pub use confidence::{confidence_scores, top_effective_drills};
pub use store::{JsonOutcomeStore, OutcomeStore, OUTCOME_FILE};
pub use tracker::track_outcomes;
