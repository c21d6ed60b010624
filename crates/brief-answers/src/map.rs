//! Canonical answer map

use crate::value::AnswerValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Question identifier → resolved answer
///
/// Backed by a `BTreeMap` so iteration, serialization and therefore hashing
/// are independent of the order answers were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, AnswerValue>);

impl AnswerMap {
    /// Create an empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an answer
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert
    #[inline]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get an answer by exact key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    /// Whether an answer exists for `key`
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// First non-blank answer among `keys`, in the order given
    ///
    /// Key comparison is case-insensitive.
    #[must_use]
    pub fn first_of<'a>(&'a self, keys: &[&str]) -> Option<&'a AnswerValue> {
        keys.iter().find_map(|wanted| {
            self.0
                .iter()
                .find(|(key, value)| key.eq_ignore_ascii_case(wanted) && !value.is_blank())
                .map(|(_, value)| value)
        })
    }

    /// Answers whose key contains any of `fragments` (case-insensitive)
    pub fn keys_containing<'a>(
        &'a self,
        fragments: &'a [&'a str],
    ) -> impl Iterator<Item = (&'a str, &'a AnswerValue)> + 'a {
        self.0.iter().filter_map(move |(key, value)| {
            let lowered = key.to_lowercase();
            fragments
                .iter()
                .any(|fragment| lowered.contains(fragment))
                .then_some((key.as_str(), value))
        })
    }

    /// All answer values joined into one lowercase text blob
    #[must_use]
    pub fn text_blob(&self) -> String {
        self.0
            .values()
            .map(AnswerValue::as_text)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Merge `other` into `self`; `other` wins on key collision
    pub fn merge(&mut self, other: AnswerMap) {
        self.0.extend(other.0);
    }

    /// Iterate answers in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of answers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no answers are present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerMap
where
    K: Into<String>,
    V: Into<AnswerValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_of_respects_priority_and_skips_blank() {
        let answers = AnswerMap::new()
            .with("area_total", "")
            .with("metragem", 150.0)
            .with("area", 220.0);

        let hit = answers.first_of(&["area_total", "metragem", "area"]);
        assert_eq!(hit, Some(&AnswerValue::Number(150.0)));
    }

    #[test]
    fn first_of_is_case_insensitive() {
        let answers = AnswerMap::new().with("Orcamento", "500 mil");
        assert!(answers.first_of(&["orcamento"]).is_some());
    }

    #[test]
    fn keys_containing_matches_fragments() {
        let answers = AnswerMap::new()
            .with("area_construida", 90.0)
            .with("tamanho_m2", 100.0)
            .with("quartos", 3.0);

        let keys: Vec<_> = answers.keys_containing(&["area", "m2"]).map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["area_construida", "tamanho_m2"]);
    }

    #[test]
    fn text_blob_is_lowercase_and_key_ordered() {
        let answers = AnswerMap::new().with("b", "Piscina").with("a", "Casa");
        assert_eq!(answers.text_blob(), "casa piscina");
    }

    #[test]
    fn merge_overrides_existing_keys() {
        let mut base = AnswerMap::new().with("prazo", "6 meses").with("area", 100.0);
        base.merge(AnswerMap::new().with("area", 120.0));

        assert_eq!(base.get("area"), Some(&AnswerValue::Number(120.0)));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn insertion_order_does_not_change_equality() {
        let a: AnswerMap = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: AnswerMap = [("y", "2"), ("x", "1")].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
