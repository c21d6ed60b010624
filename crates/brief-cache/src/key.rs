//! Cache keys
//!
//! A [`CacheKey`] is the Blake3 digest of an operation name and the canonical
//! JSON encoding of that operation's input. Canonical here means object keys
//! in sorted order, so two inputs that differ only in map insertion order
//! hash to the same key.

use crate::error::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Cacheable composition stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheOperation {
    /// Profile detection
    Detect,
    /// Hours and financial estimate
    Estimate,
    /// Template selection
    Select,
    /// Question optimization
    Optimize,
}

impl CacheOperation {
    /// All operations
    pub const ALL: [CacheOperation; 4] = [Self::Detect, Self::Estimate, Self::Select, Self::Optimize];

    /// Stable lowercase name, part of the key
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Detect => "detect",
            Self::Estimate => "estimate",
            Self::Select => "select",
            Self::Optimize => "optimize",
        }
    }
}

impl Display for CacheOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rebuild every object with its keys in sorted order
fn canonical(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::Object(map) => {
            let sorted: std::collections::BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonical(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonical).collect()),
        other => other,
    }
}

/// 32-byte Blake3 cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    /// Key for `operation` over `input`
    ///
    /// # Errors
    /// [`CacheError::Serialization`] if `input` does not serialize to JSON.
    pub fn compute<T>(operation: CacheOperation, input: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(&canonical(serde_json::to_value(input)?))?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(operation.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(&bytes);
        Ok(Self(*hasher.finalize().as_bytes()))
    }

    /// Raw digest
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 16 hex characters, for logs
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for CacheKey {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| CacheError::InvalidKey(e.to_string()))?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| CacheError::InvalidKey(format!("expected 32 bytes, got {}", b.len())))?;
        Ok(Self(digest))
    }
}

impl Serialize for CacheKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CacheKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
