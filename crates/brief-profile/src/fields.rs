//! Per-field extraction
//!
//! Each function reads one profile field and returns `None` when the answers
//! say nothing usable about it. All of them accept an empty [`AnswerMap`] and
//! an empty text blob. Defaults are applied by the extractor, not here.

use crate::rules::{self, mentions};
use crate::types::{
    discipline, ComplexityIndicators, ComplexityTier, SystemsFlags, Typology, UrgencyTier,
};
use brief_answers::{find_area_mention, AnswerMap, AnswerValue};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static ROOMS_MENTION: Lazy<Regex> = Lazy::new(|| counted(r"quartos|dormit[óo]rios|su[íi]tes|bedrooms"));
static BATHROOMS_MENTION: Lazy<Regex> = Lazy::new(|| counted(r"banheiros|lavabos|bathrooms"));
static PARKING_MENTION: Lazy<Regex> = Lazy::new(|| counted(r"vagas|parking spaces"));
static FLOORS_MENTION: Lazy<Regex> = Lazy::new(|| counted(r"pavimentos|andares|floors|stories"));

fn counted(nouns: &str) -> Regex {
    Regex::new(&format!(r"(\d{{1,3}})\s*(?:{nouns})")).expect("static pattern compiles")
}

fn count_mention(pattern: &Regex, blob: &str) -> Option<u32> {
    pattern
        .captures(blob)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First typology whose keyword set matches `text`, in priority order
#[must_use]
pub fn classify_typology(text: &str) -> Option<Typology> {
    rules::TYPOLOGY_KEYWORDS
        .iter()
        .find(|(_, keywords)| mentions(text, keywords))
        .map(|(typology, _)| *typology)
}

/// Typology from an explicit answer, else from the whole text blob
#[must_use]
pub fn typology(answers: &AnswerMap, blob: &str) -> Option<Typology> {
    answers
        .first_of(rules::TYPOLOGY_KEYS)
        .and_then(|v| classify_typology(&v.as_text().to_lowercase()))
        .or_else(|| classify_typology(blob))
}

/// Subtype from an explicit answer, else from the typology's subtype keywords
#[must_use]
pub fn subtype(answers: &AnswerMap, blob: &str, typology: Typology) -> Option<String> {
    if let Some(explicit) = answers.first_of(rules::SUBTYPE_KEYS) {
        let text = explicit.as_text().trim().to_lowercase();
        if !text.is_empty() {
            return Some(text);
        }
    }
    rules::SUBTYPE_KEYWORDS
        .iter()
        .filter(|(t, _, _)| *t == typology)
        .find(|(_, _, keywords)| mentions(blob, keywords))
        .map(|(_, name, _)| (*name).to_string())
}

/// Area in m²
///
/// Resolution order:
/// 1. the fixed list of likely area keys
/// 2. any key whose name contains `area` / `m2` / `metragem`
/// 3. a "<number> m2" mention anywhere in the text
#[must_use]
pub fn area(answers: &AnswerMap, blob: &str) -> Option<f64> {
    let positive = |v: &AnswerValue| v.as_number().filter(|n| *n > 0.0 && n.is_finite());

    rules::AREA_KEYS
        .iter()
        .find_map(|key| answers.first_of(&[*key]).and_then(positive))
        .or_else(|| {
            answers
                .keys_containing(rules::AREA_KEY_FRAGMENTS)
                .find_map(|(_, v)| positive(v))
        })
        .or_else(|| find_area_mention(blob))
}

/// Room count
#[must_use]
pub fn rooms(answers: &AnswerMap, blob: &str) -> Option<u32> {
    answers
        .first_of(rules::ROOM_KEYS)
        .and_then(AnswerValue::as_count)
        .or_else(|| count_mention(&ROOMS_MENTION, blob))
}

/// Bathroom count
#[must_use]
pub fn bathrooms(answers: &AnswerMap, blob: &str) -> Option<u32> {
    answers
        .first_of(rules::BATHROOM_KEYS)
        .and_then(AnswerValue::as_count)
        .or_else(|| count_mention(&BATHROOMS_MENTION, blob))
}

/// Parking spaces
#[must_use]
pub fn parking(answers: &AnswerMap, blob: &str) -> Option<u32> {
    answers
        .first_of(rules::PARKING_KEYS)
        .and_then(AnswerValue::as_count)
        .or_else(|| count_mention(&PARKING_MENTION, blob))
}

/// Floor count, at least one when present
#[must_use]
pub fn floors(answers: &AnswerMap, blob: &str) -> Option<u32> {
    answers
        .first_of(rules::FLOOR_KEYS)
        .and_then(AnswerValue::as_count)
        .or_else(|| count_mention(&FLOORS_MENTION, blob))
        .filter(|f| *f > 0)
}

/// Target budget
#[must_use]
pub fn budget(answers: &AnswerMap) -> Option<f64> {
    answers
        .first_of(rules::BUDGET_KEYS)
        .and_then(AnswerValue::as_number)
        .filter(|b| *b > 0.0)
}

/// Target deadline in days
#[must_use]
pub fn deadline_days(answers: &AnswerMap) -> Option<u32> {
    answers.first_of(rules::DEADLINE_KEYS).and_then(AnswerValue::as_days)
}

/// Urgency from an explicit answer, else from the deadline
#[must_use]
pub fn urgency(answers: &AnswerMap, deadline_days: Option<u32>) -> Option<UrgencyTier> {
    let explicit = answers.first_of(rules::URGENCY_KEYS).and_then(|value| {
        if value.as_bool() == Some(true) {
            return Some(UrgencyTier::High);
        }
        let text = value.as_text().to_lowercase();
        if mentions(&text, rules::CRITICAL_WORDS) {
            Some(UrgencyTier::Critical)
        } else if mentions(&text, rules::HIGH_WORDS) {
            Some(UrgencyTier::High)
        } else {
            None
        }
    });

    explicit.or_else(|| {
        let (critical, high) = rules::DEADLINE_URGENCY_DAYS;
        match deadline_days? {
            d if d < critical => Some(UrgencyTier::Critical),
            d if d < high => Some(UrgencyTier::High),
            _ => None,
        }
    })
}

/// Stated motivation, lowercased
#[must_use]
pub fn motivation(answers: &AnswerMap) -> Option<String> {
    answers
        .first_of(rules::MOTIVATION_KEYS)
        .map(|v| v.as_text().trim().to_lowercase())
        .filter(|m| !m.is_empty())
}

/// Required disciplines; architecture is always present
#[must_use]
pub fn disciplines(blob: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::from([discipline::ARCHITECTURE.to_string()]);
    for (name, keywords) in rules::DISCIPLINE_KEYWORDS {
        if mentions(blob, keywords) {
            found.insert((*name).to_string());
        }
    }
    found
}

/// Building systems flags
#[must_use]
pub fn systems(blob: &str, floors: u32, disciplines: &BTreeSet<String>) -> SystemsFlags {
    SystemsFlags {
        structural: floors > 1 || disciplines.contains(discipline::STRUCTURAL),
        hydraulic: mentions(blob, rules::HYDRAULIC),
        electrical: mentions(blob, rules::ELECTRICAL),
        hvac: mentions(blob, rules::HVAC),
        automation: mentions(blob, rules::AUTOMATION),
        security: mentions(blob, rules::SECURITY),
    }
}

/// Special features by canonical name
#[must_use]
pub fn special_features(blob: &str) -> BTreeSet<String> {
    rules::SPECIAL_FEATURES
        .iter()
        .filter(|(_, keywords)| mentions(blob, keywords))
        .map(|(name, _)| (*name).to_string())
        .collect()
}

/// Complexity point score
///
/// +2 per keyword family present, +1 above 4 rooms and +1 more above 6,
/// +1 for budgets above 1M and +2 more above 2M.
#[must_use]
pub fn complexity_points(blob: &str, rooms: u32, budget: Option<f64>) -> u32 {
    let families = rules::COMPLEXITY_FAMILIES
        .iter()
        .filter(|family| mentions(blob, family))
        .count();
    #[allow(clippy::cast_possible_truncation)]
    let mut points = families as u32 * rules::FAMILY_POINTS;

    let (rooms_low, rooms_high) = rules::ROOM_THRESHOLDS;
    if rooms > rooms_low {
        points += 1;
    }
    if rooms > rooms_high {
        points += 1;
    }

    let (budget_low, budget_high) = rules::BUDGET_THRESHOLDS;
    if let Some(budget) = budget {
        if budget > budget_low {
            points += 1;
        }
        if budget > budget_high {
            points += 2;
        }
    }
    points
}

/// Tier for a complexity point score
#[must_use]
pub fn complexity_tier(points: u32) -> ComplexityTier {
    rules::COMPLEXITY_TIERS
        .iter()
        .find(|(min, _)| points >= *min)
        .map_or(ComplexityTier::Low, |(_, tier)| *tier)
}

/// Inputs for the complexity indicators
#[derive(Debug, Clone, Copy)]
pub struct IndicatorInputs<'a> {
    /// Lowercase text blob
    pub blob: &'a str,
    /// Area in m²
    pub area_m2: f64,
    /// Room count
    pub rooms: u32,
    /// Floor count
    pub floors: u32,
    /// Systems flags
    pub systems: SystemsFlags,
    /// Special features
    pub special_features: &'a BTreeSet<String>,
}

/// Four complexity sub-scores in `[0, 10]`
#[must_use]
pub fn indicators(input: &IndicatorInputs<'_>) -> ComplexityIndicators {
    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    let luxury = flag(mentions(input.blob, rules::LUXURY));
    let complex = flag(mentions(input.blob, rules::COMPLEX));
    let sustainable = flag(mentions(input.blob, rules::SUSTAINABLE));
    let extra_floors = f64::from(input.floors.saturating_sub(1));
    #[allow(clippy::cast_precision_loss)]
    let features = input.special_features.len() as f64;
    let heavy_features = flag(input.special_features.contains("pool"))
        + flag(input.special_features.contains("elevator"));

    let architectural = 2.0
        + extra_floors * 1.5
        + flag(input.rooms > rules::ROOM_THRESHOLDS.0) * 1.5
        + luxury * 3.0
        + complex * 2.0
        + features * 0.5;
    let structural = 1.0
        + extra_floors * 2.0
        + flag(input.area_m2 > 500.0) * 2.0
        + flag(input.area_m2 > 2_000.0)
        + complex * 2.0
        + heavy_features;
    let systems = f64::from(input.systems.count()) * 1.5 + flag(input.systems.automation) * 2.0;
    let finishes = 3.0 + luxury * 4.0 + sustainable * 2.0;

    ComplexityIndicators::new(architectural, structural, systems, finishes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> AnswerMap {
        AnswerMap::new()
    }

    #[test]
    fn every_field_tolerates_empty_answers() {
        let answers = empty();
        assert_eq!(typology(&answers, ""), None);
        assert_eq!(subtype(&answers, "", Typology::Residential), None);
        assert_eq!(area(&answers, ""), None);
        assert_eq!(rooms(&answers, ""), None);
        assert_eq!(bathrooms(&answers, ""), None);
        assert_eq!(parking(&answers, ""), None);
        assert_eq!(floors(&answers, ""), None);
        assert_eq!(budget(&answers), None);
        assert_eq!(deadline_days(&answers), None);
        assert_eq!(urgency(&answers, None), None);
        assert_eq!(motivation(&answers), None);
        assert_eq!(disciplines("").len(), 1);
        assert_eq!(systems("", 1, &disciplines("")).count(), 0);
        assert!(special_features("").is_empty());
        assert_eq!(complexity_points("", 0, None), 0);
    }

    #[test]
    fn typology_priority_prefers_residential() {
        assert_eq!(classify_typology("casa com escritório"), Some(Typology::Residential));
        assert_eq!(classify_typology("loja de roupas"), Some(Typology::Commercial));
        assert_eq!(classify_typology("galpão logístico"), Some(Typology::Industrial));
        assert_eq!(classify_typology("escola infantil"), Some(Typology::Institutional));
        assert_eq!(classify_typology("algo indefinido"), None);
    }

    #[test]
    fn explicit_typology_answer_beats_blob() {
        let answers = AnswerMap::new()
            .with("tipologia", "Comercial")
            .with("descricao", "antiga casa reformada");
        let blob = answers.text_blob();
        assert_eq!(typology(&answers, &blob), Some(Typology::Commercial));
    }

    #[test]
    fn subtype_from_keywords() {
        assert_eq!(
            subtype(&empty(), "apartamento de 90m2", Typology::Residential),
            Some("apartment".to_string())
        );
        let answers = AnswerMap::new().with("subtipo", "Chalé");
        assert_eq!(subtype(&answers, "", Typology::Residential), Some("chalé".to_string()));
    }

    #[test]
    fn area_resolution_order() {
        let keyed = AnswerMap::new().with("metragem", "250 m²").with("area_lote", 600.0);
        assert_eq!(area(&keyed, ""), Some(250.0));

        let fragment = AnswerMap::new().with("area_lote", 600.0);
        assert_eq!(area(&fragment, ""), Some(600.0));

        assert_eq!(area(&empty(), "casa de 180m2"), Some(180.0));
    }

    #[test]
    fn non_positive_area_is_ignored() {
        let answers = AnswerMap::new().with("area", 0.0);
        assert_eq!(area(&answers, ""), None);
    }

    #[test]
    fn counts_from_keys_and_text() {
        let answers = AnswerMap::new().with("quartos", "4");
        assert_eq!(rooms(&answers, ""), Some(4));
        assert_eq!(rooms(&empty(), "casa com 3 suítes"), Some(3));
        assert_eq!(bathrooms(&empty(), "2 banheiros e lavabo"), Some(2));
        assert_eq!(floors(&empty(), "sobrado de 2 pavimentos"), Some(2));
        assert_eq!(parking(&empty(), "garagem para 3 vagas"), Some(3));
    }

    #[test]
    fn urgency_from_answer_and_deadline() {
        let urgent = AnswerMap::new().with("urgencia", "Alta");
        assert_eq!(urgency(&urgent, None), Some(UrgencyTier::High));

        let critical = AnswerMap::new().with("urgencia", "crítica");
        assert_eq!(urgency(&critical, Some(300)), Some(UrgencyTier::Critical));

        assert_eq!(urgency(&empty(), Some(20)), Some(UrgencyTier::Critical));
        assert_eq!(urgency(&empty(), Some(45)), Some(UrgencyTier::High));
        assert_eq!(urgency(&empty(), Some(120)), None);
    }

    #[test]
    fn disciplines_are_additive() {
        let found = disciplines("projeto estrutural, paisagismo e marcenaria");
        let expected: BTreeSet<String> = ["architecture", "interiors", "landscaping", "structural"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn complexity_points_follow_rules() {
        assert_eq!(complexity_points("automação e acabamento de luxo", 3, None), 4);
        assert_eq!(complexity_points("", 5, None), 1);
        assert_eq!(complexity_points("", 7, None), 2);
        assert_eq!(complexity_points("", 0, Some(1_500_000.0)), 1);
        assert_eq!(complexity_points("", 0, Some(2_500_000.0)), 3);
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(complexity_tier(0), ComplexityTier::Low);
        assert_eq!(complexity_tier(2), ComplexityTier::Low);
        assert_eq!(complexity_tier(3), ComplexityTier::Medium);
        assert_eq!(complexity_tier(6), ComplexityTier::High);
        assert_eq!(complexity_tier(8), ComplexityTier::VeryHigh);
        assert_eq!(complexity_tier(15), ComplexityTier::VeryHigh);
    }

    #[test]
    fn indicators_stay_in_range_for_extreme_input() {
        let features = special_features("piscina elevador sauna adega academia cinema");
        let ind = indicators(&IndicatorInputs {
            blob: "luxo complexo sustentável automação",
            area_m2: 10_000.0,
            rooms: 12,
            floors: 20,
            systems: SystemsFlags {
                structural: true,
                hydraulic: true,
                electrical: true,
                hvac: true,
                automation: true,
                security: true,
            },
            special_features: &features,
        });
        for v in [ind.architectural, ind.structural, ind.systems, ind.finishes] {
            assert!((0.0..=10.0).contains(&v));
        }
    }
}
