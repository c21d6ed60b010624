//! Engine configuration
//!
//! Loaded from TOML; every field has a default, so an empty document is a
//! valid configuration.
//!
//! ```toml
//! detection_timeout_ms = 5000
//! include_optional_templates = true
//! default_seniority = "pleno"
//!
//! [cache]
//! enabled = true
//! max_capacity = 10000
//! detection_ttl_secs = 3600
//! selection_ttl_secs = 3600
//! estimation_ttl_secs = 3600
//! optimization_ttl_secs = 1800
//! ```

use crate::error::{EngineError, Result};
use brief_cache::{CacheTtls, CompositionCache, InMemoryCompositionCache, NoopCache};
use brief_estimate::Seniority;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Composition cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Use the in-memory cache; otherwise nothing is cached
    pub enabled: bool,
    /// Maximum entries held
    pub max_capacity: u64,
    /// Profile detection TTL
    pub detection_ttl_secs: u64,
    /// Template selection TTL
    pub selection_ttl_secs: u64,
    /// Estimation TTL
    pub estimation_ttl_secs: u64,
    /// Question optimization TTL
    pub optimization_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let ttls = CacheTtls::default();
        Self {
            enabled: true,
            max_capacity: 10_000,
            detection_ttl_secs: ttls.detect,
            selection_ttl_secs: ttls.select,
            estimation_ttl_secs: ttls.estimate,
            optimization_ttl_secs: ttls.optimize,
        }
    }
}

impl CacheConfig {
    /// Per-operation TTLs
    #[must_use]
    pub fn ttls(&self) -> CacheTtls {
        CacheTtls {
            detect: self.detection_ttl_secs,
            estimate: self.estimation_ttl_secs,
            select: self.selection_ttl_secs,
            optimize: self.optimization_ttl_secs,
        }
    }

    /// Build the configured cache
    #[must_use]
    pub fn build(&self) -> Arc<dyn CompositionCache> {
        if self.enabled {
            Arc::new(InMemoryCompositionCache::with_ttls(self.max_capacity, self.ttls()))
        } else {
            Arc::new(NoopCache)
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Budget for profile detection before falling back
    pub detection_timeout_ms: u64,
    /// Keep low-scoring templates in the optional tier
    pub include_optional_templates: bool,
    /// Seniority used to price hours
    pub default_seniority: Seniority,
    /// Cache settings
    pub cache: CacheConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            detection_timeout_ms: 5_000,
            include_optional_templates: true,
            default_seniority: Seniority::Pleno,
            cache: CacheConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document
    ///
    /// # Errors
    /// [`EngineError::Config`] if the document does not parse.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(document).map_err(|e| EngineError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// [`EngineError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path)
            .map_err(|e| EngineError::config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&document)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// [`EngineError::Config`] for a zero detection timeout or zero cache capacity.
    pub fn validate(&self) -> Result<()> {
        if self.detection_timeout_ms == 0 {
            return Err(EngineError::config("detection_timeout_ms must be positive"));
        }
        if self.cache.enabled && self.cache.max_capacity == 0 {
            return Err(EngineError::config("cache.max_capacity must be positive"));
        }
        Ok(())
    }

    /// With detection timeout
    #[inline]
    #[must_use]
    pub fn with_detection_timeout(mut self, timeout: Duration) -> Self {
        self.detection_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With optional templates kept or dropped
    #[inline]
    #[must_use]
    pub fn with_optional_templates(mut self, include: bool) -> Self {
        self.include_optional_templates = include;
        self
    }

    /// With pricing seniority
    #[inline]
    #[must_use]
    pub fn with_seniority(mut self, seniority: Seniority) -> Self {
        self.default_seniority = seniority;
        self
    }

    /// With caching on or off
    #[inline]
    #[must_use]
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache.enabled = enabled;
        self
    }

    /// Detection timeout as a duration
    #[inline]
    #[must_use]
    pub fn detection_timeout(&self) -> Duration {
        Duration::from_millis(self.detection_timeout_ms)
    }
}
