//! Profile extraction
//!
//! [`ProfileExtractor`] turns a normalized [`AnswerMap`] into a
//! [`TechnicalProfile`] using the keyword tables in [`crate::rules`]. It never
//! fails: every field has a documented default, and the fields that fell back
//! are listed in [`TechnicalProfile::defaulted`].

use crate::error::DetectionError;
use crate::fields::{self, IndicatorInputs};
use crate::types::{
    ProfileField, TechnicalProfile, Typology, UrgencyTier, DEFAULT_AREA_M2, DEFAULT_BATHROOMS,
    DEFAULT_FLOORS, DEFAULT_PARKING, DEFAULT_ROOMS, DEFAULT_SUBTYPE,
};
use brief_answers::AnswerMap;
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Source of technical profiles
///
/// The orchestrator bounds calls to this trait with a timeout, so
/// implementations may be slow; they must be safe to abandon mid-call.
pub trait ProfileDetector: Send + Sync + Debug {
    /// Detect a profile from normalized answers
    ///
    /// # Errors
    /// Implementation-specific; the orchestrator treats any error as a
    /// reason to fall back to a minimal profile.
    fn detect(&self, answers: &AnswerMap) -> Result<TechnicalProfile, DetectionError>;

    /// Detector name (for logs and cache keys)
    fn name(&self) -> &'static str;
}

/// Keyword-table profile extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileExtractor;

impl ProfileExtractor {
    /// Create an extractor
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract a profile; empty answers yield the documented defaults
    #[must_use]
    pub fn extract(&self, answers: &AnswerMap) -> TechnicalProfile {
        let blob = answers.text_blob();
        let mut defaulted = BTreeSet::new();

        let typology = or_default(
            fields::typology(answers, &blob),
            Typology::Residential,
            ProfileField::Typology,
            &mut defaulted,
        );
        let area_m2 = or_default(
            fields::area(answers, &blob),
            DEFAULT_AREA_M2,
            ProfileField::Area,
            &mut defaulted,
        );
        let rooms = or_default(
            fields::rooms(answers, &blob),
            DEFAULT_ROOMS,
            ProfileField::Rooms,
            &mut defaulted,
        );
        let bathrooms = or_default(
            fields::bathrooms(answers, &blob),
            DEFAULT_BATHROOMS,
            ProfileField::Bathrooms,
            &mut defaulted,
        );
        let parking_spaces = or_default(
            fields::parking(answers, &blob),
            DEFAULT_PARKING,
            ProfileField::Parking,
            &mut defaulted,
        );
        let floors = or_default(
            fields::floors(answers, &blob),
            DEFAULT_FLOORS,
            ProfileField::Floors,
            &mut defaulted,
        );
        let deadline_days = fields::deadline_days(answers);
        let urgency = or_default(
            fields::urgency(answers, deadline_days),
            UrgencyTier::Normal,
            ProfileField::Urgency,
            &mut defaulted,
        );
        let subtype = fields::subtype(answers, &blob, typology);
        let budget = fields::budget(answers);
        let motivation = fields::motivation(answers);

        if subtype.is_none() {
            defaulted.insert(ProfileField::Subtype);
        }
        if budget.is_none() {
            defaulted.insert(ProfileField::Budget);
        }
        if deadline_days.is_none() {
            defaulted.insert(ProfileField::Deadline);
        }
        if motivation.is_none() {
            defaulted.insert(ProfileField::Motivation);
        }

        let disciplines = fields::disciplines(&blob);
        let systems = fields::systems(&blob, floors, &disciplines);
        let special_features = fields::special_features(&blob);
        let points = fields::complexity_points(&blob, rooms, budget);
        let complexity = fields::complexity_tier(points);
        let indicators = fields::indicators(&IndicatorInputs {
            blob: &blob,
            area_m2,
            rooms,
            floors,
            systems,
            special_features: &special_features,
        });

        tracing::debug!(
            %typology,
            area_m2,
            points,
            %complexity,
            defaulted = defaulted.len(),
            "extracted technical profile"
        );

        TechnicalProfile {
            typology,
            subtype: subtype.unwrap_or_else(|| DEFAULT_SUBTYPE.to_string()),
            area_m2,
            complexity,
            budget,
            deadline_days,
            urgency,
            rooms,
            bathrooms,
            parking_spaces,
            floors,
            disciplines,
            systems,
            special_features,
            indicators,
            motivation,
            defaulted,
        }
    }
}

/// Unwrap `value`, recording `field` as defaulted when it is absent
fn or_default<T>(
    value: Option<T>,
    default: T,
    field: ProfileField,
    defaulted: &mut BTreeSet<ProfileField>,
) -> T {
    value.unwrap_or_else(|| {
        defaulted.insert(field);
        default
    })
}

impl ProfileDetector for ProfileExtractor {
    fn detect(&self, answers: &AnswerMap) -> Result<TechnicalProfile, DetectionError> {
        Ok(self.extract(answers))
    }

    fn name(&self) -> &'static str {
        "keyword-extractor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{discipline, ComplexityTier};
    use brief_answers::AnswerValue;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn empty_answers_yield_defaults() {
        let profile = ProfileExtractor::new().extract(&AnswerMap::new());

        assert_eq!(profile.typology, Typology::Residential);
        assert_eq!(profile.area_m2, 200.0);
        assert_eq!(profile.complexity, ComplexityTier::Low);
        assert_eq!(profile.rooms, DEFAULT_ROOMS);
        assert_eq!(profile.urgency, UrgencyTier::Normal);
        assert_eq!(profile.budget, None);
        assert!(profile.requires(discipline::ARCHITECTURE));
        assert!(profile.is_defaulted(ProfileField::Typology));
        assert!(profile.is_defaulted(ProfileField::Area));
    }

    #[test]
    fn simple_house_description() {
        let answers = AnswerMap::new().with("descricao", "casa residencial 180m2 padrão simples");
        let profile = ProfileExtractor::new().extract(&answers);

        assert_eq!(profile.typology, Typology::Residential);
        assert_eq!(profile.area_m2, 180.0);
        assert_eq!(profile.complexity, ComplexityTier::Low);
        assert_eq!(profile.subtype, "house");
        assert!(!profile.is_defaulted(ProfileField::Area));
    }

    #[test]
    fn luxury_automated_house_is_very_high() {
        let answers = AnswerMap::new()
            .with("descricao", "casa de alto padrão com automação e certificação LEED")
            .with("quartos", 7.0)
            .with("orcamento", "R$ 2.500.000")
            .with("area", 650.0);
        let profile = ProfileExtractor::new().extract(&answers);

        // 3 families (6) + rooms (2) + budget (3) = 11
        assert_eq!(profile.complexity, ComplexityTier::VeryHigh);
        assert_eq!(profile.budget, Some(2_500_000.0));
        assert!(profile.systems.automation);
    }

    #[test]
    fn commercial_profile_with_disciplines() {
        let answers = AnswerMap::new()
            .with("tipologia", "comercial")
            .with("descricao", "loja com projeto de interiores e instalações elétricas")
            .with("prazo", "45 dias")
            .with("motivacao", "Expansão do negócio");
        let profile = ProfileExtractor::new().extract(&answers);

        assert_eq!(profile.typology, Typology::Commercial);
        assert_eq!(profile.subtype, "retail");
        assert_eq!(profile.deadline_days, Some(45));
        assert_eq!(profile.urgency, UrgencyTier::High);
        assert_eq!(profile.motivation.as_deref(), Some("expansão do negócio"));
        assert!(profile.requires(discipline::INTERIORS));
        assert!(profile.requires(discipline::INSTALLATIONS));
        assert!(profile.systems.electrical);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let answers = AnswerMap::new()
            .with("area", "não sei")
            .with("quartos", AnswerValue::Bool(true))
            .with("orcamento", "a definir");
        let profile = ProfileExtractor::new().extract(&answers);

        assert_eq!(profile.area_m2, 200.0);
        assert_eq!(profile.rooms, DEFAULT_ROOMS);
        assert_eq!(profile.budget, None);
    }

    #[test]
    fn detector_wraps_extractor() {
        let profile = ProfileExtractor::new().detect(&AnswerMap::new()).unwrap();
        assert_eq!(profile.area_m2, 200.0);
    }

    proptest! {
        #[test]
        fn arbitrary_text_keeps_invariants(text in ".{0,200}", area in proptest::option::of(-1e6f64..1e6)) {
            let mut answers = AnswerMap::new().with("descricao", text);
            if let Some(area) = area {
                answers.insert("area", area);
            }
            let profile = ProfileExtractor::new().extract(&answers);

            prop_assert!(profile.area_m2 > 0.0);
            prop_assert!(profile.requires(discipline::ARCHITECTURE));
            for v in [
                profile.indicators.architectural,
                profile.indicators.structural,
                profile.indicators.systems,
                profile.indicators.finishes,
            ] {
                prop_assert!((0.0..=10.0).contains(&v));
            }
        }
    }
}
