pub mod classify;
pub mod config;
pub mod scoring;

pub use classify::{classify, IssueSignals};
pub use config::PriorityConfig;
pub use scoring::compute_priority;
