//! Error types for ordered map operations.

use thiserror::Error;

/// Errors that can occur while emitting an ordered map.
///
/// Lookups never fail: a missing key is reported as `None`.
#[derive(Debug, Error)]
pub enum MapError {
    /// A key or value could not be represented in JSON.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The output sink rejected a write.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for ordered map operations.
pub type MapResult<T> = Result<T, MapError>;
