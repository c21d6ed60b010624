//! Composition cache
//!
//! [`CompositionCache`] is the injected seam every cacheable stage reads and
//! writes through. Values are stored as JSON text with their TTL; expiry is
//! checked on read, so no background eviction is needed for correctness.

use crate::error::Result;
use crate::key::{CacheKey, CacheOperation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Stored value with its lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Key the value was stored under
    pub key: CacheKey,
    /// JSON-encoded value
    pub value: String,
    /// When the value was stored
    pub inserted_at: DateTime<Utc>,
    /// Seconds the value stays valid
    pub ttl_seconds: u64,
}

impl CacheEntry {
    /// Entry stored now
    #[must_use]
    pub fn new(key: CacheKey, value: String, ttl_seconds: u64) -> Self {
        Self {
            key,
            value,
            inserted_at: Utc::now(),
            ttl_seconds,
        }
    }

    /// Decode the stored value
    ///
    /// # Errors
    /// [`CacheError::Serialization`](crate::CacheError::Serialization) if the
    /// text does not decode as `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.value)?)
    }

    /// Whether the entry has outlived its TTL at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        let age = now.signed_duration_since(self.inserted_at).num_seconds();
        age >= ttl
    }

    /// Whether the entry has outlived its TTL
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// TTL in seconds per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTtls {
    /// Profile detection
    pub detect: u64,
    /// Estimation
    pub estimate: u64,
    /// Template selection
    pub select: u64,
    /// Question optimization
    pub optimize: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            detect: 3600,
            estimate: 3600,
            select: 3600,
            optimize: 1800,
        }
    }
}

impl CacheTtls {
    /// TTL for `operation`
    #[must_use]
    pub const fn of(&self, operation: CacheOperation) -> u64 {
        match operation {
            CacheOperation::Detect => self.detect,
            CacheOperation::Estimate => self.estimate,
            CacheOperation::Select => self.select,
            CacheOperation::Optimize => self.optimize,
        }
    }
}

/// Best-effort cache for composition stages
///
/// Not a correctness dependency: a stage must produce the same result whether
/// its value came from here or was recomputed. Writes are last-write-wins.
#[async_trait]
pub trait CompositionCache: Send + Sync + Debug {
    /// Unexpired entry under `key`
    ///
    /// # Errors
    /// Backend failures; callers treat them as a miss.
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>>;

    /// Store `value` under `key` for `ttl_seconds`
    ///
    /// # Errors
    /// Backend failures; callers log and continue.
    async fn set(&self, key: CacheKey, value: String, ttl_seconds: u64) -> Result<()>;

    /// TTL used for `operation`
    fn ttl(&self, operation: CacheOperation) -> u64;
}

/// Read and decode a typed value
///
/// # Errors
/// Backend or decode failures.
pub async fn get_typed<T>(cache: &dyn CompositionCache, key: &CacheKey) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    match cache.get(key).await? {
        Some(entry) => entry.decode().map(Some),
        None => Ok(None),
    }
}

/// Encode and store a typed value with the operation's TTL
///
/// # Errors
/// Backend or encode failures.
pub async fn set_typed<T>(
    cache: &dyn CompositionCache,
    operation: CacheOperation,
    key: CacheKey,
    value: &T,
) -> Result<()>
where
    T: Serialize + Sync + ?Sized,
{
    let text = serde_json::to_string(value)?;
    cache.set(key, text, cache.ttl(operation)).await
}

/// Moka-backed in-process cache
#[derive(Debug, Clone)]
pub struct InMemoryCompositionCache {
    inner: Cache<CacheKey, CacheEntry>,
    ttls: CacheTtls,
}

impl InMemoryCompositionCache {
    /// Cache holding up to `max_capacity` entries with default TTLs
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self::with_ttls(max_capacity, CacheTtls::default())
    }

    /// Cache with explicit TTLs
    #[must_use]
    pub fn with_ttls(max_capacity: u64, ttls: CacheTtls) -> Self {
        Self {
            inner: Cache::new(max_capacity),
            ttls,
        }
    }

    /// Approximate number of stored entries
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Apply pending maintenance so counts are exact
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

impl Default for InMemoryCompositionCache {
    /// Cache with default capacity (10,000 entries)
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CompositionCache for InMemoryCompositionCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        let Some(entry) = self.inner.get(key).await else {
            tracing::debug!(key = %key.short(), "cache miss");
            return Ok(None);
        };
        if entry.is_expired() {
            tracing::debug!(key = %key.short(), "cache entry expired");
            self.inner.invalidate(key).await;
            return Ok(None);
        }
        tracing::debug!(key = %key.short(), "cache hit");
        Ok(Some(entry))
    }

    async fn set(&self, key: CacheKey, value: String, ttl_seconds: u64) -> Result<()> {
        self.inner
            .insert(key, CacheEntry::new(key, value, ttl_seconds))
            .await;
        Ok(())
    }

    fn ttl(&self, operation: CacheOperation) -> u64 {
        self.ttls.of(operation)
    }
}

/// Cache that stores nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl CompositionCache for NoopCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<CacheEntry>> {
        Ok(None)
    }

    async fn set(&self, _key: CacheKey, _value: String, _ttl_seconds: u64) -> Result<()> {
        Ok(())
    }

    fn ttl(&self, operation: CacheOperation) -> u64 {
        CacheTtls::default().of(operation)
    }
}
