//! Answer values
//!
//! Raw questionnaire answers are schema-less JSON. They are resolved once into
//! [`AnswerValue`] at the normalizer boundary; everything downstream matches on
//! the variant instead of probing types.

use crate::parse::{parse_duration_days, parse_number};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A single resolved answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Free text or a selected option label
    Text(String),
    /// Numeric input
    Number(f64),
    /// Yes/no input
    Bool(bool),
    /// Multi-select or repeated input
    List(Vec<AnswerValue>),
}

impl AnswerValue {
    /// Create a text answer
    #[inline]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Resolve a JSON value
    ///
    /// Returns `None` for `null`, non-finite numbers and empty containers.
    /// Objects nested inside lists are kept as their JSON text; objects at
    /// map level are flattened by the normalizer before reaching here.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(items) => {
                let items: Vec<_> = items.iter().filter_map(Self::from_json).collect();
                (!items.is_empty()).then_some(Self::List(items))
            }
            Value::Object(map) if map.is_empty() => None,
            Value::Object(_) => Some(Self::Text(value.to_string())),
        }
    }

    /// Textual rendering used for keyword matching
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
            Self::List(items) => items
                .iter()
                .map(Self::as_text)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Numeric reading of the answer, if one exists
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => parse_number(s),
            Self::Bool(_) => None,
            Self::List(items) => items.iter().find_map(Self::as_number),
        }
    }

    /// Non-negative integer reading, rounded
    #[must_use]
    pub fn as_count(&self) -> Option<u32> {
        self.as_number()
            .filter(|n| *n >= 0.0 && *n < f64::from(u32::MAX))
            .map(|n| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let count = n.round() as u32;
                count
            })
    }

    /// Duration reading in days
    #[must_use]
    pub fn as_days(&self) -> Option<u32> {
        match self {
            Self::Text(s) => parse_duration_days(s),
            other => other.as_count().filter(|d| *d > 0),
        }
    }

    /// Boolean reading (`sim`/`não`, `yes`/`no`, `true`/`false`, non-zero)
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) => Some(*n != 0.0),
            Self::Text(s) => match s.trim().to_lowercase().as_str() {
                "sim" | "s" | "yes" | "y" | "true" | "1" | "verdadeiro" => Some(true),
                "não" | "nao" | "n" | "no" | "false" | "0" | "falso" => Some(false),
                _ => None,
            },
            Self::List(_) => None,
        }
    }

    /// Item-wise text rendering; scalars become a one-element list
    #[must_use]
    pub fn as_list(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.iter().map(Self::as_text).collect(),
            other => vec![other.as_text()],
        }
    }

    /// Whether the answer carries no usable content
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.iter().all(Self::is_blank),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }
}

impl Display for AnswerValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        Self::Number(value as f64)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Render integral floats without a trailing `.0`
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_null_is_dropped() {
        assert_eq!(AnswerValue::from_json(&json!(null)), None);
        assert_eq!(AnswerValue::from_json(&json!([])), None);
        assert_eq!(AnswerValue::from_json(&json!({})), None);
    }

    #[test]
    fn json_scalars_resolve_to_variants() {
        assert_eq!(AnswerValue::from_json(&json!("casa")), Some(AnswerValue::text("casa")));
        assert_eq!(AnswerValue::from_json(&json!(3)), Some(AnswerValue::Number(3.0)));
        assert_eq!(AnswerValue::from_json(&json!(true)), Some(AnswerValue::Bool(true)));
    }

    #[test]
    fn json_arrays_drop_null_items() {
        let value = AnswerValue::from_json(&json!(["piscina", null, 2])).unwrap();
        assert_eq!(
            value,
            AnswerValue::List(vec![AnswerValue::text("piscina"), AnswerValue::Number(2.0)])
        );
    }

    #[test]
    fn text_rendering_is_stable() {
        assert_eq!(AnswerValue::Number(180.0).as_text(), "180");
        assert_eq!(AnswerValue::Number(2.5).as_text(), "2.5");
        let list = AnswerValue::List(vec!["sauna".into(), "piscina".into()]);
        assert_eq!(list.as_text(), "sauna, piscina");
    }

    #[test]
    fn numeric_readings() {
        assert_eq!(AnswerValue::text("aprox. 250 m2").as_number(), Some(250.0));
        assert_eq!(AnswerValue::Bool(true).as_number(), None);
        assert_eq!(AnswerValue::text("4 quartos").as_count(), Some(4));
        assert_eq!(AnswerValue::Number(-3.0).as_count(), None);
    }

    #[test]
    fn day_readings() {
        assert_eq!(AnswerValue::text("6 meses").as_days(), Some(180));
        assert_eq!(AnswerValue::Number(40.0).as_days(), Some(40));
        assert_eq!(AnswerValue::Number(0.0).as_days(), None);
    }

    #[test]
    fn boolean_readings() {
        assert_eq!(AnswerValue::text("Sim").as_bool(), Some(true));
        assert_eq!(AnswerValue::text("não").as_bool(), Some(false));
        assert_eq!(AnswerValue::text("talvez").as_bool(), None);
        assert_eq!(AnswerValue::Number(1.0).as_bool(), Some(true));
    }

    #[test]
    fn blank_detection() {
        assert!(AnswerValue::text("   ").is_blank());
        assert!(AnswerValue::List(vec![AnswerValue::text("")]).is_blank());
        assert!(!AnswerValue::Bool(false).is_blank());
    }
}
