//! Briefing composition engine
//!
//! Turns a client's questionnaire answers into one [`CompositionResult`]:
//! technical profile, hours, fees, schedule, template selection, the ordered
//! follow-up questions, and the merged task plan.
//!
//! The pipeline lives in [`CompositionOrchestrator`]; the stages themselves
//! live in the `brief-*` crates re-exported below.
//!
//! # Example
//!
//! ```rust
//! use brief_core::{AnswerMap, CatalogSnapshot, ClientContext, CompositionOrchestrator};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let answers = AnswerMap::new()
//!     .with("tipologia", "residencial")
//!     .with("area", 180.0);
//! let catalog = CatalogSnapshot::default();
//!
//! let result = runtime.block_on(async {
//!     CompositionOrchestrator::default()
//!         .compose_answers(&answers, &catalog, &ClientContext::default())
//!         .await
//! });
//! assert_eq!(result.profile.area_m2, 180.0);
//! assert!(result.is_degraded());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod result;
pub mod telemetry;

pub use config::{CacheConfig, EngineConfig};
pub use error::EngineError;
pub use orchestrator::CompositionOrchestrator;
pub use result::{CompositionResult, StageTimings};
pub use telemetry::{init_tracing, LogFormat};

pub use brief_answers::{AnswerMap, AnswerValue, RawSource};
pub use brief_cache::{CompositionCache, InMemoryCompositionCache, NoopCache};
pub use brief_catalog::{CatalogSnapshot, CatalogStore, ClientContext};
pub use brief_estimate::Seniority;
pub use brief_profile::{ProfileDetector, ProfileExtractor, TechnicalProfile};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
