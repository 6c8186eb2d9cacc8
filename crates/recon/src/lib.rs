pub mod engine;
pub mod summary;

pub use engine::reconcile;
pub use summary::{summarize, DatasetSummary, RunSummary};
