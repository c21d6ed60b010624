//! Composition cache
//!
//! Content-addressed, TTL-bounded storage for the results of the cacheable
//! composition stages (detect, estimate, select, optimize).
//!
//! - [`CacheKey`]: Blake3 over operation name + canonical JSON input
//! - [`CompositionCache`]: async get/set/ttl seam
//! - [`InMemoryCompositionCache`]: moka-backed implementation
//! - [`NoopCache`]: stores nothing, for disabled caching

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod error;
pub mod key;

pub use cache::{
    get_typed, set_typed, CacheEntry, CacheTtls, CompositionCache, InMemoryCompositionCache,
    NoopCache,
};
pub use error::CacheError;
pub use key::{CacheKey, CacheOperation};
