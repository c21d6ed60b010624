//! Briefing answers
//!
//! The input side of the composition engine:
//! - [`AnswerValue`]: tagged union over text, number, boolean and list answers
//! - [`AnswerMap`]: order-independent question id → answer map
//! - [`AnswerNormalizer`]: merges direct, embedded and sectioned sources
//! - lenient pt-BR/en number and duration parsing
//!
//! # Example
//!
//! ```rust
//! use brief_answers::{AnswerNormalizer, RawSource};
//! use serde_json::json;
//!
//! let sources = vec![
//!     RawSource::from_json(json!({ "descricao": "casa residencial 180m2" })),
//!     RawSource::Embedded(r#"{"respostas": {"prazo": "6 meses"}}"#.to_string()),
//! ];
//! let answers = AnswerNormalizer::new().normalize(&sources);
//! assert_eq!(answers.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod map;
pub mod normalizer;
pub mod parse;
pub mod value;

pub use map::AnswerMap;
pub use normalizer::{AnswerNormalizer, QuestionRecord, RawSource, Section};
pub use parse::{find_area_mention, parse_duration_days, parse_number};
pub use value::AnswerValue;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
