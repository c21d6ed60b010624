//! Engine error type
//!
//! Aggregates the failures of every stage. The orchestrator never returns
//! these to its caller: recoverable ones fall back silently, structural ones
//! degrade the result and are listed in
//! [`CompositionResult::degraded`](crate::CompositionResult::degraded).

use brief_cache::CacheError;
use brief_catalog::CatalogError;
use brief_estimate::EstimateError;
use brief_profile::DetectionError;

/// Engine failures
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Profile detection failed
    #[error("detection: {0}")]
    Detection(#[from] DetectionError),

    /// Estimation rejected the profile
    #[error("estimation: {0}")]
    Estimate(#[from] EstimateError),

    /// Catalog could not be used
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Cache backend failed
    #[error("cache: {0}")]
    Cache(#[from] CacheError),

    /// Configuration invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Stage exceeded its time budget
    #[error("{stage} timed out after {timeout_ms}ms")]
    Timeout {
        /// Stage name
        stage: &'static str,
        /// Budget that elapsed
        timeout_ms: u64,
    },
}

impl EngineError {
    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }

    /// Whether the error degrades the result
    ///
    /// Invalid profiles and unusable catalogs are structural; they yield a
    /// zero-confidence result flagged for manual review.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Estimate(EstimateError::InvalidProfile { .. })
                | Self::Catalog(
                    CatalogError::Unavailable(_)
                        | CatalogError::Empty
                        | CatalogError::Malformed(_)
                        | CatalogError::CyclicTasks { .. }
                )
                | Self::Config(_)
        )
    }

    /// Whether the engine recovers with a documented fallback
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !self.is_structural()
    }
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
