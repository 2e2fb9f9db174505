pub mod drills;
pub mod engine;
pub mod issues;
pub mod models;
pub mod outcomes;
pub mod priority;
pub mod progress;
pub mod reliability;
pub mod scores;
pub mod stability;

pub use engine::{CoachingEngine, SessionAnalysis, SessionInput};
pub use models::{Classification, ClassifiedIssue, Phase, PhaseMap, PhaseSpan};
