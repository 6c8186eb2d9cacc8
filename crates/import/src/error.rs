use thiserror::Error;

/// Boundary failures. These are the only hard errors in the system: a
/// record-level problem (bad timestamp, blank plate) is represented as
/// absence inside the core and never reaches this type.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{source_label} file is missing required column '{column}' (found: {found})")]
    MissingColumn {
        source_label: &'static str,
        column: &'static str,
        found: String,
    },
    #[error("{source_label} files have mismatched headers and cannot be concatenated")]
    HeaderMismatch { source_label: &'static str },
    #[error("invalid run profile: {0}")]
    Profile(#[from] toml::de::Error),
    #[error("delimiter must be a single byte, got '{0}'")]
    BadDelimiter(String),
    #[error("tolerance_minutes must not be negative, got {0}")]
    BadTolerance(i64),
}
