//! Answer normalization
//!
//! Questionnaire answers are stored in up to three shapes depending on which
//! version of the briefing form produced them:
//!
//! - a direct key → value object
//! - a JSON document embedded as text (optionally wrapping the answers under
//!   `answers` / `respostas`)
//! - structured sections, each holding per-question records
//!
//! [`AnswerNormalizer::normalize`] merges any number of them into one
//! [`AnswerMap`]; later sources override earlier ones on key collision.

use crate::map::AnswerMap;
use crate::value::AnswerValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys under which an embedded document may wrap its answers
const EMBEDDED_WRAPPERS: &[&str] = &["answers", "respostas"];

/// One raw answer source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RawSource {
    /// Plain JSON object of question id → raw answer
    Direct(Map<String, Value>),
    /// JSON document stored as text
    Embedded(String),
    /// Sectioned questionnaire records
    Sections(Vec<Section>),
    /// Already-resolved answers
    Resolved(AnswerMap),
}

impl RawSource {
    /// Wrap a JSON value; non-object values become an empty direct source
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Direct(map),
            _ => Self::Direct(Map::new()),
        }
    }
}

impl From<AnswerMap> for RawSource {
    fn from(value: AnswerMap) -> Self {
        Self::Resolved(value)
    }
}

/// A questionnaire section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section identifier
    pub id: String,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// Question records in this section
    #[serde(default, alias = "perguntas")]
    pub questions: Vec<QuestionRecord>,
}

/// One answered (or unanswered) question inside a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Question identifier
    pub id: String,
    /// Raw answer; `null` when unanswered
    #[serde(default, alias = "resposta")]
    pub answer: Value,
}

/// Merges heterogeneous answer sources into one canonical map
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerNormalizer;

impl AnswerNormalizer {
    /// Create a normalizer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Merge `sources` in order; later sources win on key collision
    ///
    /// Never fails: unparseable embedded documents are skipped.
    #[must_use]
    pub fn normalize(&self, sources: &[RawSource]) -> AnswerMap {
        let mut merged = AnswerMap::new();
        for (index, source) in sources.iter().enumerate() {
            let answers = match source {
                RawSource::Direct(map) => flatten_object(map),
                RawSource::Embedded(document) => match parse_embedded(document) {
                    Some(answers) => answers,
                    None => {
                        tracing::debug!(source = index, "skipping unparseable embedded document");
                        continue;
                    }
                },
                RawSource::Sections(sections) => flatten_sections(sections),
                RawSource::Resolved(answers) => answers.clone(),
            };
            merged.merge(answers);
        }
        tracing::debug!(sources = sources.len(), answers = merged.len(), "normalized answers");
        merged
    }
}

fn parse_embedded(document: &str) -> Option<AnswerMap> {
    let Value::Object(root) = serde_json::from_str::<Value>(document).ok()? else {
        return None;
    };

    let wrapped = EMBEDDED_WRAPPERS
        .iter()
        .find_map(|key| root.get(*key).and_then(Value::as_object));

    Some(flatten_object(wrapped.unwrap_or(&root)))
}

fn flatten_sections(sections: &[Section]) -> AnswerMap {
    let mut answers = AnswerMap::new();
    for record in sections.iter().flat_map(|s| s.questions.iter()) {
        insert_flattened(&mut answers, &record.id, &record.answer);
    }
    answers
}

fn flatten_object(map: &Map<String, Value>) -> AnswerMap {
    let mut answers = AnswerMap::new();
    for (key, value) in map {
        insert_flattened(&mut answers, key, value);
    }
    answers
}

/// Insert `value` under `key`, flattening nested objects into `key.child`
fn insert_flattened(answers: &mut AnswerMap, key: &str, value: &Value) {
    match value {
        Value::Object(children) => {
            for (child, nested) in children {
                insert_flattened(answers, &format!("{key}.{child}"), nested);
            }
        }
        other => {
            if let Some(resolved) = AnswerValue::from_json(other) {
                answers.insert(key, resolved);
            }
        }
    }
}
