//! Error types for the composition cache

/// Cache failures
///
/// Callers treat every variant as a miss; none of them is fatal.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Value could not be encoded or decoded
    #[error("cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backing store refused the operation
    #[error("cache backend unavailable: {0}")]
    Backend(String),

    /// Key text is not a 64-character hex digest
    #[error("invalid cache key: {0}")]
    InvalidKey(String),
}

impl CacheError {
    /// Create a backend error
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend(reason.into())
    }
}

/// Result alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
