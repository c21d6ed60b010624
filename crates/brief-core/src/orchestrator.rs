//! Composition orchestrator
//!
//! Runs one briefing through every stage:
//!
//! 1. normalize the raw answer sources
//! 2. detect the technical profile (cached, bounded by a timeout)
//! 3. estimate and select templates concurrently (both cached)
//! 4. optimize the follow-up questions for the selection (cached)
//! 5. compose the selected task trees
//!
//! Nothing here fails outward. Detection failures and timeouts fall back to
//! a typology-only profile, which is still scored against the catalog with
//! its confidence forced to zero; structural
//! failures (unusable catalog, task cycles) degrade the result and are listed
//! in [`CompositionResult::degraded`]; cache failures are logged and
//! treated as misses.

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::result::{micros, CompositionResult, StageTimings};
use brief_answers::{AnswerMap, AnswerNormalizer, RawSource};
use brief_cache::{get_typed, set_typed, CacheKey, CacheOperation, CompositionCache};
use brief_catalog::{
    CatalogError, CatalogStore, ClientContext, ComposedPlan, Question, QuestionOptimizer,
    QuestionPlan, SelectorOptions, TemplateAnalysis, TemplateCandidate, TemplateComposer,
    TemplateDefinition, TemplateSelector, MANUAL_REVIEW,
};
use brief_estimate::{Estimate, EstimationCalculator, RateTable};
use brief_profile::{
    fields, rules, ComplexityIndicators, DetectionError, ProfileDetector, ProfileExtractor,
    ProfileField, TechnicalProfile, Typology,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Questions resolved per template, or the lookup failure
type ResolvedQuestions = BTreeMap<String, std::result::Result<Vec<Question>, String>>;

/// Entry point of the engine
#[derive(Debug, Clone)]
pub struct CompositionOrchestrator {
    config: EngineConfig,
    detector: Arc<dyn ProfileDetector>,
    cache: Arc<dyn CompositionCache>,
}

impl Default for CompositionOrchestrator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl CompositionOrchestrator {
    /// Orchestrator with the keyword extractor and the configured cache
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let cache = config.cache.build();
        Self {
            config,
            detector: Arc::new(ProfileExtractor::new()),
            cache,
        }
    }

    /// Replace the profile detector
    #[must_use]
    pub fn with_detector(mut self, detector: Arc<dyn ProfileDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the cache
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn CompositionCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compose already-normalized answers
    pub async fn compose_answers(
        &self,
        answers: &AnswerMap,
        catalog: &dyn CatalogStore,
        client: &ClientContext,
    ) -> CompositionResult {
        self.compose(&[RawSource::from(answers.clone())], catalog, client)
            .await
    }

    /// Compose a briefing
    pub async fn compose(
        &self,
        sources: &[RawSource],
        catalog: &dyn CatalogStore,
        client: &ClientContext,
    ) -> CompositionResult {
        let started = Instant::now();
        let mut timings = StageTimings::default();
        let mut failures: Vec<EngineError> = Vec::new();

        let t = Instant::now();
        let answers = AnswerNormalizer::new().normalize(sources);
        timings.normalize_us = micros(t.elapsed());

        let t = Instant::now();
        let profile = match self.detect(&answers).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, "profile detection failed, using typology-only profile");
                failures.push(e);
                fallback_profile(&answers)
            }
        };
        timings.detect_us = micros(t.elapsed());

        let templates = match catalog.templates() {
            Ok(templates) if templates.is_empty() => {
                failures.push(CatalogError::Empty.into());
                templates
            }
            Ok(templates) => templates,
            Err(e) => {
                tracing::warn!(error = %e, "catalog unusable, degrading result");
                failures.push(e.into());
                Vec::new()
            }
        };
        let rates = catalog.rate_table().unwrap_or_default();
        let selectable = !templates.is_empty();

        let ((estimate, estimate_failure, estimate_us), (mut analysis, select_us)) = tokio::join!(
            self.estimate_stage(&profile, rates),
            async {
                if selectable {
                    self.select_stage(&profile, &templates, client).await
                } else {
                    (TemplateAnalysis::degraded(profile.complexity), 0)
                }
            }
        );
        timings.estimate_us = estimate_us;
        timings.select_us = select_us;
        failures.extend(estimate_failure);

        if let Some(gap) = estimate.budget_gap.filter(|g| *g < 0.0) {
            analysis
                .recommendations
                .push(format!("Target budget is {:.2} below the estimated fee", -gap));
        }

        let selected: Vec<TemplateCandidate> = analysis.selected().cloned().collect();

        let t = Instant::now();
        let optimized_questions = self
            .optimize_stage(&selected, catalog, &profile, &answers)
            .await;
        timings.optimize_us = micros(t.elapsed());

        let t = Instant::now();
        let definitions: Vec<&TemplateDefinition> = selected
            .iter()
            .filter_map(|c| templates.iter().find(|t| t.id == c.id))
            .collect();
        let composed_plan = match TemplateComposer::new().compose(&definitions) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(error = %e, "task trees could not be composed");
                failures.push(e.into());
                ComposedPlan::default()
            }
        };
        timings.compose_us = micros(t.elapsed());

        if !failures.is_empty() {
            analysis.confidence = 0.0;
            if !analysis.recommendations.iter().any(|r| r == MANUAL_REVIEW) {
                analysis.recommendations.push(MANUAL_REVIEW.to_string());
            }
        }
        let degraded: Vec<String> = failures.iter().map(ToString::to_string).collect();
        timings.total_us = micros(started.elapsed());

        tracing::info!(
            typology = %profile.typology,
            area_m2 = profile.area_m2,
            complexity = %profile.complexity,
            total = estimate.financial.total,
            principal = analysis.principal.len(),
            questions = optimized_questions.questions.len(),
            degraded = degraded.len(),
            structural = failures.iter().any(EngineError::is_structural),
            total_us = timings.total_us,
            "composition finished"
        );

        CompositionResult {
            profile,
            hours: estimate.hours,
            financial: estimate.financial,
            schedule: estimate.schedule,
            budget_gap: estimate.budget_gap,
            template_analysis: analysis,
            optimized_questions,
            composed_plan,
            degraded,
            timings,
        }
    }

    /// Detect a profile, bounded by the configured timeout
    ///
    /// The detector runs on the blocking pool. On timeout its handle is
    /// dropped; the work is not interrupted, only no longer awaited.
    async fn detect(&self, answers: &AnswerMap) -> Result<TechnicalProfile> {
        let key = cache_key(
            CacheOperation::Detect,
            &(self.detector.name(), rules::RULES_VERSION, answers),
        );
        if let Some(profile) = self.cached(key.as_ref()).await {
            return Ok(profile);
        }

        let detector = Arc::clone(&self.detector);
        let input = answers.clone();
        let handle = tokio::task::spawn_blocking(move || detector.detect(&input));

        let profile = match tokio::time::timeout(self.config.detection_timeout(), handle).await {
            Ok(Ok(detected)) => detected?,
            Ok(Err(join)) => return Err(DetectionError::Interrupted(join.to_string()).into()),
            Err(_) => {
                return Err(EngineError::Timeout {
                    stage: "detect",
                    timeout_ms: self.config.detection_timeout_ms,
                })
            }
        };
        check_profile(&profile)?;

        self.store(CacheOperation::Detect, key, &profile).await;
        Ok(profile)
    }

    async fn estimate_stage(
        &self,
        profile: &TechnicalProfile,
        rates: RateTable,
    ) -> (Estimate, Option<EngineError>, u64) {
        let t = Instant::now();
        let calculator = EstimationCalculator::new()
            .with_rates(rates)
            .with_seniority(self.config.default_seniority);
        let key = cache_key(
            CacheOperation::Estimate,
            &(profile, self.config.default_seniority, calculator.rates()),
        );
        if let Some(estimate) = self.cached(key.as_ref()).await {
            return (estimate, None, micros(t.elapsed()));
        }

        match calculator.estimate(profile) {
            Ok(estimate) => {
                self.store(CacheOperation::Estimate, key, &estimate).await;
                (estimate, None, micros(t.elapsed()))
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile could not be estimated");
                (Estimate::empty(), Some(e.into()), micros(t.elapsed()))
            }
        }
    }

    async fn select_stage(
        &self,
        profile: &TechnicalProfile,
        templates: &[TemplateDefinition],
        client: &ClientContext,
    ) -> (TemplateAnalysis, u64) {
        let t = Instant::now();
        let options = SelectorOptions {
            include_optional: self.config.include_optional_templates,
        };
        let key = cache_key(CacheOperation::Select, &(profile, templates, client, options));
        if let Some(analysis) = self.cached(key.as_ref()).await {
            return (analysis, micros(t.elapsed()));
        }

        let analysis = TemplateSelector::new(options).select(profile, templates, client);
        self.store(CacheOperation::Select, key, &analysis).await;
        (analysis, micros(t.elapsed()))
    }

    async fn optimize_stage(
        &self,
        selected: &[TemplateCandidate],
        catalog: &dyn CatalogStore,
        profile: &TechnicalProfile,
        answers: &AnswerMap,
    ) -> QuestionPlan {
        let resolved: ResolvedQuestions = selected
            .iter()
            .map(|c| {
                let questions = catalog.questions(&c.id).map_err(|e| e.to_string());
                (c.id.clone(), questions)
            })
            .collect();
        let key = cache_key(
            CacheOperation::Optimize,
            &(selected, &resolved, profile, answers),
        );
        if let Some(plan) = self.cached(key.as_ref()).await {
            return plan;
        }

        let lookup = |id: &str| match resolved.get(id) {
            Some(Ok(questions)) => Ok(questions.clone()),
            Some(Err(reason)) => Err(CatalogError::unavailable(reason.clone())),
            None => Err(CatalogError::UnknownTemplate(id.to_string())),
        };
        let plan = QuestionOptimizer::new().optimize(selected, lookup, profile, answers);
        self.store(CacheOperation::Optimize, key, &plan).await;
        plan
    }

    async fn cached<T: DeserializeOwned>(&self, key: Option<&CacheKey>) -> Option<T> {
        let key = key?;
        match get_typed(self.cache.as_ref(), key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key.short(), error = %e, "cache read failed, recomputing");
                None
            }
        }
    }

    async fn store<T: Serialize + Sync>(&self, operation: CacheOperation, key: Option<CacheKey>, value: &T) {
        let Some(key) = key else { return };
        if let Err(e) = set_typed(self.cache.as_ref(), operation, key, value).await {
            tracing::warn!(%operation, key = %key.short(), error = %e, "cache write failed");
        }
    }
}

/// Cache key for a stage input; `None` bypasses the cache
fn cache_key<T: Serialize + ?Sized>(operation: CacheOperation, input: &T) -> Option<CacheKey> {
    match CacheKey::compute(operation, input) {
        Ok(key) => Some(key),
        Err(e) => {
            tracing::warn!(%operation, error = %e, "cache key not computable, bypassing cache");
            None
        }
    }
}

/// Reject detector output that breaks profile invariants
fn check_profile(profile: &TechnicalProfile) -> std::result::Result<(), DetectionError> {
    if !profile.area_m2.is_finite() || profile.area_m2 <= 0.0 {
        return Err(DetectionError::InvalidProfile(format!(
            "area must be positive, got {}",
            profile.area_m2
        )));
    }
    let i = profile.indicators;
    let in_range = [i.architectural, i.structural, i.systems, i.finishes]
        .iter()
        .all(|v| (0.0..=ComplexityIndicators::MAX).contains(v));
    if !in_range {
        return Err(DetectionError::InvalidProfile(
            "complexity indicators outside [0, 10]".to_string(),
        ));
    }
    Ok(())
}

/// Typology-only profile used when detection fails
fn fallback_profile(answers: &AnswerMap) -> TechnicalProfile {
    match fields::classify_typology(&answers.text_blob()) {
        Some(typology) => TechnicalProfile::minimal(typology),
        None => {
            let mut profile = TechnicalProfile::minimal(Typology::Residential);
            profile.defaulted.insert(ProfileField::Typology);
            profile
        }
    }
}
