//! Catalog entities: templates, their task trees, and their questions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Seconds assumed for a question that does not state its own estimate
pub const DEFAULT_QUESTION_SECONDS: u32 = 30;

/// One task of a template's task tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateTask {
    /// Task id, unique across the catalog for tasks that are the same work
    pub id: String,
    /// Display name
    pub name: String,
    /// Disciplines the task belongs to
    #[serde(default)]
    pub disciplines: BTreeSet<String>,
    /// Estimated hours
    #[serde(default)]
    pub hours: f64,
    /// Task ids that must finish first
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Reusable project template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    /// Template id
    pub id: String,
    /// Display name
    pub name: String,
    /// Category (`architecture`, `interiors`, ...)
    #[serde(default)]
    pub category: String,
    /// Typology, discipline and feature tags
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Task tree
    #[serde(default)]
    pub tasks: Vec<TemplateTask>,
}

impl TemplateDefinition {
    /// Disciplines the template covers: discipline tags plus task disciplines
    #[must_use]
    pub fn covers(&self, discipline: &str) -> bool {
        self.tags.contains(discipline) || self.tasks.iter().any(|t| t.disciplines.contains(discipline))
    }

    /// Whether the template carries `tag`
    #[inline]
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// How a question expects to be answered
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    /// Free text
    #[default]
    Text,
    /// Number
    Number,
    /// Money amount
    Currency,
    /// Calendar date
    Date,
    /// One of several options
    Select,
    /// Any of several options
    MultiSelect,
    /// Yes/no
    Boolean,
}

impl InputType {
    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Currency => "currency",
            Self::Date => "date",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Boolean => "boolean",
        }
    }
}

impl Display for InputType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Follow-up question attached to a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Question id; also the answer key once answered
    pub id: String,
    /// Owning template
    #[serde(default)]
    pub template_id: String,
    /// Question text
    pub text: String,
    /// Expected input
    #[serde(default)]
    pub input_type: InputType,
    /// Category (`budget`, `schedule`, a typology, ...)
    #[serde(default)]
    pub category: String,
    /// Source marks the question as required
    #[serde(default)]
    pub mandatory: bool,
    /// Question ids that must be asked first
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Client motivations the question is relevant to
    #[serde(default)]
    pub motivations: BTreeSet<String>,
    /// Expected time to answer
    #[serde(default = "default_seconds")]
    pub estimated_seconds: u32,
}

const fn default_seconds() -> u32 {
    DEFAULT_QUESTION_SECONDS
}

impl Question {
    /// Question with defaults for everything but id and text
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            template_id: String::new(),
            text: text.into(),
            input_type: InputType::Text,
            category: String::new(),
            mandatory: false,
            depends_on: Vec::new(),
            motivations: BTreeSet::new(),
            estimated_seconds: DEFAULT_QUESTION_SECONDS,
        }
    }

    /// Set the owning template
    #[must_use]
    pub fn template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = template_id.into();
        self
    }

    /// Set the category
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the input type
    #[must_use]
    pub fn input(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    /// Mark as mandatory
    #[must_use]
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Add a dependency
    #[must_use]
    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.depends_on.push(id.into());
        self
    }

    /// Tag with a motivation
    #[must_use]
    pub fn motivation(mut self, motivation: impl Into<String>) -> Self {
        self.motivations.insert(motivation.into());
        self
    }

    /// Set the time estimate
    #[must_use]
    pub fn seconds(mut self, seconds: u32) -> Self {
        self.estimated_seconds = seconds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn question_deserializes_with_defaults() {
        let q: Question = serde_json::from_str(r#"{"id":"q1","text":"Qual o prazo?"}"#).unwrap();
        assert_eq!(q, Question::new("q1", "Qual o prazo?"));
    }

    #[test]
    fn template_covers_task_disciplines() {
        let t: TemplateDefinition = serde_json::from_str(
            r#"{
                "id": "res-basic",
                "name": "Residencial básico",
                "tags": ["residential", "architecture"],
                "tasks": [{"id": "t1", "name": "Estrutura", "disciplines": ["structural"], "hours": 12}]
            }"#,
        )
        .unwrap();

        assert!(t.covers("architecture"));
        assert!(t.covers("structural"));
        assert!(!t.covers("landscaping"));
        assert!(t.has_tag("residential"));
    }

    #[test]
    fn input_type_snake_case() {
        let json = serde_json::to_string(&InputType::MultiSelect).unwrap();
        assert_eq!(json, "\"multi_select\"");
    }
}
