use thiserror::Error;

/// Errors produced by the directory.
///
/// Lookups that simply find nothing are not errors: they return `None` or an
/// empty list. Errors are reserved for input that cannot be accepted.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A raw record was rejected while loading under `ValidationPolicy::Strict`.
    #[error("invalid record at index {index}: {reason}")]
    Validation { index: usize, reason: String },

    /// A field name that is not part of the user schema.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A format name that no formatter answers to.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Criteria that could not be interpreted (wrong JSON shape, non-scalar values).
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DirectoryError>;
