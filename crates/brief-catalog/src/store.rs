//! Catalog access
//!
//! [`CatalogStore`] is the read-only view the engine takes of the template
//! catalog. [`CatalogSnapshot`] is the in-memory implementation, loaded from
//! a JSON document.

use crate::error::{CatalogError, Result};
use crate::model::{Question, TemplateDefinition};
use brief_estimate::RateTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Read-only template catalog
pub trait CatalogStore: Send + Sync {
    /// All template definitions
    ///
    /// # Errors
    /// [`CatalogError::Unavailable`] when the catalog cannot be read,
    /// [`CatalogError::Empty`] when it holds no templates.
    fn templates(&self) -> Result<Vec<TemplateDefinition>>;

    /// Questions attached to a template
    ///
    /// # Errors
    /// [`CatalogError::UnknownTemplate`] for an id the catalog does not hold.
    fn questions(&self, template_id: &str) -> Result<Vec<Question>>;

    /// Rate table overriding the built-in one, if the catalog ships one
    fn rate_table(&self) -> Option<RateTable> {
        None
    }
}

/// Immutable catalog held in memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Catalog version label
    #[serde(default)]
    pub version: Option<String>,
    /// Template definitions
    #[serde(default)]
    pub templates: Vec<TemplateDefinition>,
    /// Questions keyed by template id
    #[serde(default)]
    pub questions: BTreeMap<String, Vec<Question>>,
    /// Optional rate table override
    #[serde(default)]
    pub rate_table: Option<RateTable>,
}

impl CatalogSnapshot {
    /// Snapshot over `templates` with no questions
    #[must_use]
    pub fn new(templates: Vec<TemplateDefinition>) -> Self {
        Self {
            templates,
            ..Self::default()
        }
    }

    /// Attach questions to a template
    #[must_use]
    pub fn with_questions(mut self, template_id: impl Into<String>, questions: Vec<Question>) -> Self {
        self.questions.entry(template_id.into()).or_default().extend(questions);
        self
    }

    /// Override the rate table
    #[must_use]
    pub fn with_rate_table(mut self, rates: RateTable) -> Self {
        self.rate_table = Some(rates);
        self
    }

    /// Parse and validate a JSON catalog document
    ///
    /// # Errors
    /// [`CatalogError::Malformed`] on parse failure or duplicate template ids.
    pub fn from_json_str(document: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(document)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Read and parse a JSON catalog file
    ///
    /// # Errors
    /// [`CatalogError::Unavailable`] when the file cannot be read, otherwise as
    /// [`CatalogSnapshot::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::unavailable(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&document)
    }

    /// Check catalog invariants
    ///
    /// # Errors
    /// [`CatalogError::Malformed`] on duplicate template ids.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for template in &self.templates {
            if !seen.insert(template.id.as_str()) {
                return Err(CatalogError::malformed(format!(
                    "duplicate template id '{}'",
                    template.id
                )));
            }
        }
        for template_id in self.questions.keys() {
            if !seen.contains(template_id.as_str()) {
                tracing::warn!(%template_id, "questions attached to a template the catalog does not define");
            }
        }
        Ok(())
    }
}

impl CatalogStore for CatalogSnapshot {
    fn templates(&self) -> Result<Vec<TemplateDefinition>> {
        if self.templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(self.templates.clone())
    }

    fn questions(&self, template_id: &str) -> Result<Vec<Question>> {
        if !self.templates.iter().any(|t| t.id == template_id) {
            return Err(CatalogError::UnknownTemplate(template_id.to_string()));
        }
        let questions = self
            .questions
            .get(template_id)
            .map(|qs| {
                qs.iter()
                    .cloned()
                    .map(|mut q| {
                        if q.template_id.is_empty() {
                            q.template_id = template_id.to_string();
                        }
                        q
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(questions)
    }

    fn rate_table(&self) -> Option<RateTable> {
        self.rate_table.clone()
    }
}
