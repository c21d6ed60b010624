//! Template catalog
//!
//! Everything the engine does with catalog data:
//! - [`CatalogStore`]: read-only access to templates, questions and rates
//! - [`TemplateSelector`]: scores templates against a profile and partitions
//!   them into principal, complementary and optional tiers
//! - [`QuestionOptimizer`]: deduplicates and orders follow-up questions
//! - [`TemplateComposer`]: merges the selected task trees into one plan
//!
//! # Example
//!
//! ```rust
//! use brief_catalog::{ClientContext, TemplateDefinition, TemplateSelector};
//! use brief_profile::{TechnicalProfile, Typology};
//!
//! let template: TemplateDefinition = serde_json::from_str(
//!     r#"{"id": "res", "name": "Residencial", "tags": ["residential", "architecture"]}"#,
//! ).unwrap();
//! let profile = TechnicalProfile::minimal(Typology::Residential);
//! let analysis = TemplateSelector::default().select(&profile, &[template], &ClientContext::default());
//! assert_eq!(analysis.principal[0].id, "res");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod composer;
pub mod error;
pub mod model;
pub mod optimizer;
pub mod selector;
pub mod store;

pub use composer::{ComposedPlan, ComposedTask, TemplateComposer};
pub use error::CatalogError;
pub use model::{InputType, Question, TemplateDefinition, TemplateTask};
pub use optimizer::{
    fallback_questions, BrokenDependency, OptimizedQuestion, PriorityTier, QuestionOptimizer,
    QuestionPlan,
};
pub use selector::{
    ClientContext, SelectorOptions, TemplateAnalysis, TemplateCandidate, TemplateSelector,
    MANUAL_REVIEW,
};
pub use store::{CatalogSnapshot, CatalogStore};
