//! Fallback behavior when a stage or a collaborator fails.
//!
//! Composition never errors outward: every failure below must still yield a
//! complete `CompositionResult`.

use brief_catalog::{CatalogSnapshot, ClientContext, MANUAL_REVIEW};
use brief_core::{CompositionOrchestrator, EngineConfig, NoopCache};
use brief_profile::{ProfileField, Typology, DEFAULT_AREA_M2};
use brief_test_utils::{
    house_answers, sample_catalog, task, template, FailingCache, FailingDetector, SlowDetector,
    UnavailableCatalog, HOUSE_TEMPLATE, STRUCTURE_TEMPLATE,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn fallback_ids(result: &brief_core::CompositionResult) -> Vec<&str> {
    result.optimized_questions.ids().collect()
}

#[tokio::test]
async fn detection_timeout_yields_typology_only_profile() {
    let config = EngineConfig::new().with_detection_timeout(Duration::from_millis(50));
    let orchestrator =
        CompositionOrchestrator::new(config).with_detector(Arc::new(SlowDetector::default()));

    let result = orchestrator
        .compose_answers(&house_answers(), &sample_catalog(), &ClientContext::default())
        .await;

    assert_eq!(result.confidence(), 0.0);
    assert_eq!(result.profile.typology, Typology::Residential);
    assert_eq!(result.profile.area_m2, DEFAULT_AREA_M2);
    assert!(result.profile.is_defaulted(ProfileField::Area));
    assert!(result.degraded.iter().any(|d| d.contains("timed out")));
    assert!(result
        .template_analysis
        .recommendations
        .iter()
        .any(|r| r == MANUAL_REVIEW));

    // the residential typology alone still picks the residential templates
    let analysis = &result.template_analysis;
    assert_eq!(
        analysis.principal.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
        [HOUSE_TEMPLATE]
    );
    assert_eq!(
        analysis.complementary.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
        [STRUCTURE_TEMPLATE]
    );
    assert!(!result.optimized_questions.used_fallback);
    assert!(!result.composed_plan.tasks.is_empty());
    assert!(result.hours.total_hours() > 0);
}

#[tokio::test]
async fn failed_detection_without_templates_asks_fallback_questions() {
    let orchestrator = CompositionOrchestrator::default().with_detector(Arc::new(FailingDetector));

    let result = orchestrator
        .compose_answers(&house_answers(), &CatalogSnapshot::default(), &ClientContext::default())
        .await;

    assert!(result.template_analysis.selected().next().is_none());
    assert!(result.optimized_questions.used_fallback);
    assert_eq!(fallback_ids(&result), ["budget", "timeframe"]);
}

#[tokio::test]
async fn failing_detector_falls_back_the_same_way() {
    let orchestrator = CompositionOrchestrator::default().with_detector(Arc::new(FailingDetector));

    let result = orchestrator
        .compose_answers(&house_answers(), &sample_catalog(), &ClientContext::default())
        .await;

    assert_eq!(result.confidence(), 0.0);
    assert_eq!(result.profile.typology, Typology::Residential);
    assert!(result.degraded.iter().any(|d| d.contains("detector offline")));
}

#[tokio::test]
async fn failed_detection_is_not_cached() {
    let orchestrator = CompositionOrchestrator::default();
    let failing = orchestrator.clone().with_detector(Arc::new(FailingDetector));
    let catalog = sample_catalog();

    let degraded = failing
        .compose_answers(&house_answers(), &catalog, &ClientContext::default())
        .await;
    let healthy = orchestrator
        .compose_answers(&house_answers(), &catalog, &ClientContext::default())
        .await;

    assert!(degraded.is_degraded());
    assert!(!healthy.is_degraded());
    assert_eq!(healthy.profile.area_m2, 180.0);
}

#[tokio::test]
async fn broken_cache_is_invisible_in_the_result() {
    let catalog = sample_catalog();
    let broken = CompositionOrchestrator::default()
        .with_cache(Arc::new(FailingCache))
        .compose_answers(&house_answers(), &catalog, &ClientContext::default())
        .await;
    let plain = CompositionOrchestrator::default()
        .with_cache(Arc::new(NoopCache))
        .compose_answers(&house_answers(), &catalog, &ClientContext::default())
        .await;

    assert!(!broken.is_degraded());
    assert_eq!(broken.canonical_bytes().unwrap(), plain.canonical_bytes().unwrap());
}

#[tokio::test]
async fn empty_catalog_degrades_but_still_estimates() {
    let result = CompositionOrchestrator::default()
        .compose_answers(&house_answers(), &CatalogSnapshot::default(), &ClientContext::default())
        .await;

    assert!(result.is_degraded());
    assert!(result.degraded[0].contains("no templates"), "{:?}", result.degraded);
    assert_eq!(result.confidence(), 0.0);
    assert_eq!(result.profile.area_m2, 180.0);
    assert!(result.financial.total > 0.0);
    assert!(result.composed_plan.tasks.is_empty());
    assert!(result.optimized_questions.used_fallback);
}

#[tokio::test]
async fn unreachable_catalog_degrades() {
    let result = CompositionOrchestrator::default()
        .compose_answers(&house_answers(), &UnavailableCatalog, &ClientContext::default())
        .await;

    assert!(result.degraded.iter().any(|d| d.contains("unreachable")));
    assert_eq!(result.confidence(), 0.0);
    assert_eq!(fallback_ids(&result), ["budget", "timeframe"]);
}

#[tokio::test]
async fn cyclic_task_trees_degrade_the_plan_only() {
    let catalog = CatalogSnapshot::new(vec![template(
        "res",
        &["residential", "architecture"],
        vec![
            task("a", "architecture", 4.0, &["b"]),
            task("b", "architecture", 4.0, &["a"]),
        ],
    )]);

    let result = CompositionOrchestrator::default()
        .compose_answers(&house_answers(), &catalog, &ClientContext::default())
        .await;

    assert!(result.degraded.iter().any(|d| d.contains("cycle")), "{:?}", result.degraded);
    assert!(result.composed_plan.tasks.is_empty());
    assert_eq!(result.template_analysis.principal.len(), 1);
    assert_eq!(result.confidence(), 0.0);
}
