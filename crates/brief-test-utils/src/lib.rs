//! Testing utilities for the briefing engine workspace
//!
//! Shared fixtures and test doubles.

#![allow(missing_docs)]

use async_trait::async_trait;
use brief_answers::AnswerMap;
use brief_cache::{CacheEntry, CacheError, CacheKey, CacheOperation, CacheTtls, CompositionCache};
use brief_catalog::{
    CatalogError, CatalogSnapshot, CatalogStore, InputType, Question, TemplateDefinition,
    TemplateTask,
};
use brief_profile::{DetectionError, ProfileDetector, ProfileExtractor, TechnicalProfile};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const HOUSE_TEMPLATE: &str = "res-house";
pub const STRUCTURE_TEMPLATE: &str = "res-structure";
pub const INTERIORS_TEMPLATE: &str = "interiors-fitout";
pub const WAREHOUSE_TEMPLATE: &str = "ind-warehouse";

/// Simple 180 m² house
pub fn house_answers() -> AnswerMap {
    AnswerMap::new().with("descricao", "casa residencial 180m2 padrão simples")
}

pub fn task(id: &str, discipline: &str, hours: f64, depends_on: &[&str]) -> TemplateTask {
    TemplateTask {
        id: id.to_string(),
        name: id.replace('-', " "),
        disciplines: [discipline.to_string()].into(),
        hours,
        depends_on: depends_on.iter().map(|d| (*d).to_string()).collect(),
    }
}

pub fn template(id: &str, tags: &[&str], tasks: Vec<TemplateTask>) -> TemplateDefinition {
    TemplateDefinition {
        id: id.to_string(),
        name: id.replace('-', " "),
        category: "architecture".to_string(),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        tasks,
    }
}

/// Three questions chained q1 <- q2 <- q3, listed as [q3, q1, q2]
pub fn chained_questions() -> Vec<Question> {
    vec![
        Question::new("q3", "Which finish standard for wet areas?").depends_on("q2"),
        Question::new("q1", "How many bathrooms?").input(InputType::Number),
        Question::new("q2", "Which bathrooms need accessibility?").depends_on("q1"),
    ]
}

fn budget_question(id: &str) -> Question {
    Question::new(id, "What is the available budget?")
        .category("budget")
        .input(InputType::Currency)
}

/// Catalog with two residential templates, one interiors and one industrial
///
/// Both residential templates share the `survey` task and carry the same
/// budget question under different ids.
pub fn sample_catalog() -> CatalogSnapshot {
    CatalogSnapshot::new(vec![
        template(
            HOUSE_TEMPLATE,
            &["residential", "architecture", "house"],
            vec![
                task("survey", "architecture", 8.0, &[]),
                task("concept", "architecture", 24.0, &["survey"]),
                task("drawings", "architecture", 40.0, &["concept"]),
            ],
        ),
        template(
            STRUCTURE_TEMPLATE,
            &["residential", "structural"],
            vec![
                task("survey", "structural", 6.0, &[]),
                task("foundations", "structural", 16.0, &["survey"]),
            ],
        ),
        template(
            INTERIORS_TEMPLATE,
            &["interiors"],
            vec![task("fitout", "interiors", 30.0, &[])],
        ),
        template(
            WAREHOUSE_TEMPLATE,
            &["industrial", "warehouse"],
            vec![task("layout", "architecture", 20.0, &[])],
        ),
    ])
    .with_questions(HOUSE_TEMPLATE, {
        let mut questions = chained_questions();
        questions.push(budget_question("house-budget"));
        questions
    })
    .with_questions(
        STRUCTURE_TEMPLATE,
        vec![
            budget_question("structure-budget"),
            Question::new("soil", "Is a soil survey available?")
                .category("structural")
                .input(InputType::Boolean),
        ],
    )
}

/// Detector that blocks before delegating to the keyword extractor
#[derive(Debug, Clone, Copy)]
pub struct SlowDetector {
    pub delay: Duration,
}

impl Default for SlowDetector {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
        }
    }
}

impl ProfileDetector for SlowDetector {
    fn detect(&self, answers: &AnswerMap) -> Result<TechnicalProfile, DetectionError> {
        std::thread::sleep(self.delay);
        Ok(ProfileExtractor::new().extract(answers))
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

/// Detector that always fails
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingDetector;

impl ProfileDetector for FailingDetector {
    fn detect(&self, _answers: &AnswerMap) -> Result<TechnicalProfile, DetectionError> {
        Err(DetectionError::failed("detector offline"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Keyword extractor that counts its calls
#[derive(Debug, Default)]
pub struct CountingDetector {
    calls: AtomicUsize,
}

impl CountingDetector {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProfileDetector for CountingDetector {
    fn detect(&self, answers: &AnswerMap) -> Result<TechnicalProfile, DetectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProfileExtractor::new().extract(answers))
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Cache whose backend is always down
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCache;

#[async_trait]
impl CompositionCache for FailingCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        Err(CacheError::backend("connection refused"))
    }

    async fn set(&self, _key: CacheKey, _value: String, _ttl_seconds: u64) -> Result<(), CacheError> {
        Err(CacheError::backend("connection refused"))
    }

    fn ttl(&self, operation: CacheOperation) -> u64 {
        CacheTtls::default().of(operation)
    }
}

/// Catalog that cannot be reached
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCatalog;

impl CatalogStore for UnavailableCatalog {
    fn templates(&self) -> Result<Vec<TemplateDefinition>, CatalogError> {
        Err(CatalogError::unavailable("catalog service unreachable"))
    }

    fn questions(&self, template_id: &str) -> Result<Vec<Question>, CatalogError> {
        Err(CatalogError::UnknownTemplate(template_id.to_string()))
    }
}
