pub mod catalog;
pub mod recommend;

pub use catalog::{Drill, DrillCatalog, DrillCategory};
pub use recommend::recommend;
