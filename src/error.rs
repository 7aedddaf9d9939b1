//! Error types for `taskdeck`.

/// Errors that can occur in the storage layer.
///
/// Store operations themselves never fail: invalid input is a silent no-op
/// and persistence failures are logged without rolling back in-memory state.
/// These variants only surface from the [`crate::storage::Storage`] trait
/// and explicit flushes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization or parsing error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The data directory could not be determined.
    #[error("could not determine a data directory (no home directory)")]
    NoDataDir,
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
