pub mod csv;
pub mod error;
pub mod profile;
pub mod report;

pub use crate::csv::{load_dataset, load_many, DatasetSchema, ACCESSPARK_SCHEMA, GOPASS_SCHEMA};
pub use error::ImportError;
pub use profile::RunProfile;
pub use report::write_report;
