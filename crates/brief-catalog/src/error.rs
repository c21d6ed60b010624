//! Error types for the template catalog

/// Catalog failures
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog could not be read at all
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// Catalog holds no templates
    #[error("catalog has no templates")]
    Empty,

    /// Catalog document does not parse or violates catalog invariants
    #[error("malformed catalog: {0}")]
    Malformed(String),

    /// Template id not present in the catalog
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// Task trees of the composed templates contain a dependency cycle
    #[error("task dependency cycle through '{task}'")]
    CyclicTasks {
        /// A task on the cycle
        task: String,
    },
}

impl CatalogError {
    /// Create an unavailable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Create a malformed error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Result alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
