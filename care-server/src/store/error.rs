//! Snapshot storage error types.

/// Errors when loading or refreshing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Snapshot file could not be read
    #[error("failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON
    #[error("failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot contents violate an invariant
    #[error("invalid snapshot: {0}")]
    Validation(String),
}
