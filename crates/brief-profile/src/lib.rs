//! Briefing profile extraction
//!
//! Heuristic classification of free-form questionnaire answers into a
//! [`TechnicalProfile`]:
//! - typology by priority-ordered keyword sets
//! - area from likely keys, key-name scanning, or "<n> m2" mentions
//! - complexity as a point score over keyword families, rooms and budget
//! - additive disciplines, systems flags and special features
//!
//! Every field tolerates missing or malformed answers and falls back to a
//! documented default, recorded in [`TechnicalProfile::defaulted`].
//!
//! # Example
//!
//! ```rust
//! use brief_answers::AnswerMap;
//! use brief_profile::{ProfileExtractor, Typology};
//!
//! let answers = AnswerMap::new().with("descricao", "casa residencial 180m2 padrão simples");
//! let profile = ProfileExtractor::new().extract(&answers);
//! assert_eq!(profile.typology, Typology::Residential);
//! assert_eq!(profile.area_m2, 180.0);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod extractor;
pub mod fields;
pub mod rules;
pub mod types;

pub use error::DetectionError;
pub use extractor::{ProfileDetector, ProfileExtractor};
pub use types::{
    discipline, ComplexityIndicators, ComplexityTier, ProfileField, SystemsFlags,
    TechnicalProfile, Typology, UnknownVariant, UrgencyTier, DEFAULT_AREA_M2,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
