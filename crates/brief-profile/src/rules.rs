//! Classification tables
//!
//! Data only. Keyword lists are matched as lowercase substrings of the answer
//! text blob; tables are scanned in declaration order and the first hit wins
//! where a single answer is needed.

use crate::types::{discipline, ComplexityTier, Typology};

/// Revision of these tables, bumped whenever a keyword or threshold changes
pub const RULES_VERSION: &str = "2024.2";

/// Typology keyword sets in priority order
pub const TYPOLOGY_KEYWORDS: &[(Typology, &[&str])] = &[
    (
        Typology::Residential,
        &[
            "residencial", "residência", "residencia", "casa", "apartamento", "sobrado",
            "moradia", "cobertura", "residential", "house", "apartment", "home",
        ],
    ),
    (
        Typology::Commercial,
        &[
            "comercial", "loja", "escritório", "escritorio", "restaurante", "consultório",
            "consultorio", "commercial", "store", "office", "shop", "restaurant",
        ],
    ),
    (
        Typology::Industrial,
        &[
            "industrial", "fábrica", "fabrica", "galpão", "galpao", "armazém", "armazem",
            "factory", "warehouse",
        ],
    ),
    (
        Typology::Institutional,
        &[
            "institucional", "escola", "hospital", "clínica", "clinica", "igreja", "templo",
            "museu", "institutional", "school", "clinic", "church", "museum",
        ],
    ),
];

/// Subtype keyword sets per typology, in priority order
pub const SUBTYPE_KEYWORDS: &[(Typology, &str, &[&str])] = &[
    (Typology::Residential, "house", &["casa", "sobrado", "house", "residência unifamiliar"]),
    (Typology::Residential, "apartment", &["apartamento", "cobertura", "apartment", "flat"]),
    (Typology::Commercial, "retail", &["loja", "varejo", "store", "shop"]),
    (Typology::Commercial, "office", &["escritório", "escritorio", "coworking", "office"]),
    (Typology::Commercial, "food_service", &["restaurante", "lanchonete", "cafeteria", "restaurant"]),
    (Typology::Commercial, "health_office", &["consultório", "consultorio"]),
    (Typology::Industrial, "warehouse", &["galpão", "galpao", "armazém", "armazem", "warehouse"]),
    (Typology::Industrial, "factory", &["fábrica", "fabrica", "factory"]),
    (Typology::Institutional, "education", &["escola", "creche", "universidade", "school"]),
    (Typology::Institutional, "health", &["hospital", "clínica", "clinica", "clinic"]),
    (Typology::Institutional, "religious", &["igreja", "templo", "church"]),
    (Typology::Institutional, "cultural", &["museu", "museum", "biblioteca", "library"]),
];

/// Points added per complexity keyword family present in the text
pub const FAMILY_POINTS: u32 = 2;

/// Automation keyword family
pub const AUTOMATION: &[&str] = &[
    "automação", "automacao", "automation", "domótica", "domotica", "casa inteligente",
    "smart home",
];

/// Luxury / premium keyword family
pub const LUXURY: &[&str] = &[
    "luxo", "luxuos", "luxury", "premium", "alto padrão", "alto padrao", "high-end",
];

/// Sustainability / certification keyword family
pub const SUSTAINABLE: &[&str] = &[
    "sustentável", "sustentavel", "sustentabilidade", "sustainable", "certificação",
    "certificacao", "certification", "leed",
];

/// Complex / special keyword family
pub const COMPLEX: &[&str] = &["complexo", "complexa", "complex", "especial", "special"];

/// The four complexity keyword families
pub const COMPLEXITY_FAMILIES: &[&[&str]] = &[AUTOMATION, LUXURY, SUSTAINABLE, COMPLEX];

/// Room-count thresholds: +1 above the first, +1 more above the second
pub const ROOM_THRESHOLDS: (u32, u32) = (4, 6);

/// Budget thresholds: +1 above the first, +2 more above the second
pub const BUDGET_THRESHOLDS: (f64, f64) = (1_000_000.0, 2_000_000.0);

/// Minimum score per tier, highest first
pub const COMPLEXITY_TIERS: &[(u32, ComplexityTier)] = &[
    (8, ComplexityTier::VeryHigh),
    (6, ComplexityTier::High),
    (3, ComplexityTier::Medium),
];

/// Optional disciplines and the keywords that require them
pub const DISCIPLINE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        discipline::STRUCTURAL,
        &["estrutura", "estrutural", "fundação", "fundacao", "laje", "structural", "foundation"],
    ),
    (
        discipline::INSTALLATIONS,
        &[
            "instalações", "instalacoes", "elétric", "eletric", "hidráulic", "hidraulic",
            "electrical", "plumbing", "hvac", "ar condicionado",
        ],
    ),
    (
        discipline::INTERIORS,
        &["interiores", "interior", "decoração", "decoracao", "marcenaria", "mobiliário", "mobiliario"],
    ),
    (
        discipline::LANDSCAPING,
        &["paisagismo", "jardim", "landscaping", "landscape", "garden"],
    ),
];

/// Hydraulic system keywords
pub const HYDRAULIC: &[&str] = &["hidráulic", "hidraulic", "plumbing", "reuso de água", "aquecimento solar"];
/// Electrical system keywords
pub const ELECTRICAL: &[&str] = &["elétric", "eletric", "electrical", "gerador", "energia solar"];
/// HVAC keywords
pub const HVAC: &[&str] = &["ar condicionado", "climatização", "climatizacao", "hvac", "air conditioning", "aquecimento"];
/// Security system keywords
pub const SECURITY: &[&str] = &["segurança", "seguranca", "cftv", "alarme", "security", "cctv"];

/// Special features: canonical name and keywords
pub const SPECIAL_FEATURES: &[(&str, &[&str])] = &[
    ("pool", &["piscina", "pool"]),
    ("elevator", &["elevador", "elevator"]),
    ("sauna", &["sauna"]),
    ("home_theater", &["home theater", "cinema"]),
    ("barbecue", &["churrasqueira", "barbecue", "espaço gourmet", "espaco gourmet"]),
    ("solar_energy", &["energia solar", "painel solar", "painéis solares", "solar panel"]),
    ("wine_cellar", &["adega", "wine cellar"]),
    ("gym", &["academia", "gym"]),
    ("rooftop", &["rooftop", "terraço", "terraco"]),
];

/// Keys checked, in order, for an explicit typology answer
pub const TYPOLOGY_KEYS: &[&str] = &["tipologia", "typology", "tipo_projeto", "project_type", "tipo"];
/// Keys checked for an explicit subtype answer
pub const SUBTYPE_KEYS: &[&str] = &["subtipo", "subtype", "tipo_imovel"];
/// Keys checked, in order, for a numeric area
pub const AREA_KEYS: &[&str] = &[
    "area", "area_total", "area_construida", "area_m2", "metragem", "tamanho", "size_m2",
];
/// Key fragments scanned when no area key resolves
pub const AREA_KEY_FRAGMENTS: &[&str] = &["area", "m2", "metragem"];
/// Room-count keys
pub const ROOM_KEYS: &[&str] = &["quartos", "num_quartos", "dormitorios", "dormitórios", "rooms", "bedrooms"];
/// Bathroom-count keys
pub const BATHROOM_KEYS: &[&str] = &["banheiros", "num_banheiros", "bathrooms"];
/// Parking keys
pub const PARKING_KEYS: &[&str] = &["vagas", "vagas_garagem", "garagem", "parking", "parking_spaces"];
/// Floor-count keys
pub const FLOOR_KEYS: &[&str] = &["pavimentos", "andares", "num_pavimentos", "floors", "stories"];
/// Budget keys
pub const BUDGET_KEYS: &[&str] = &["orcamento", "orçamento", "budget", "investimento", "valor_disponivel"];
/// Deadline keys
pub const DEADLINE_KEYS: &[&str] = &["prazo", "prazo_dias", "deadline", "timeframe", "prazo_entrega"];
/// Urgency keys
pub const URGENCY_KEYS: &[&str] = &["urgencia", "urgência", "urgency", "prioridade"];
/// Motivation keys
pub const MOTIVATION_KEYS: &[&str] = &["motivacao", "motivação", "motivation", "objetivo", "goal"];

/// Urgency answer keywords escalating to critical
pub const CRITICAL_WORDS: &[&str] = &["crític", "critic", "imediat", "immediate", "asap"];
/// Urgency answer keywords escalating to high
pub const HIGH_WORDS: &[&str] = &["urgent", "alta", "high", "rápid", "rapid"];

/// Deadlines shorter than these many days escalate urgency (critical, high)
pub const DEADLINE_URGENCY_DAYS: (u32, u32) = (30, 60);

/// Whether any keyword in `keywords` occurs in `text`
#[inline]
#[must_use]
pub fn mentions(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_tables_are_lowercase() {
        let all = TYPOLOGY_KEYWORDS
            .iter()
            .flat_map(|(_, k)| k.iter())
            .chain(COMPLEXITY_FAMILIES.iter().flat_map(|k| k.iter()))
            .chain(DISCIPLINE_KEYWORDS.iter().flat_map(|(_, k)| k.iter()))
            .chain(SPECIAL_FEATURES.iter().flat_map(|(_, k)| k.iter()));

        for keyword in all {
            assert_eq!(*keyword, keyword.to_lowercase(), "keyword {keyword} must be lowercase");
        }
    }

    #[test]
    fn typology_table_follows_priority_order() {
        let order: Vec<_> = TYPOLOGY_KEYWORDS.iter().map(|(t, _)| *t).collect();
        assert_eq!(order, Typology::ALL.to_vec());
    }

    #[test]
    fn tier_thresholds_descend() {
        assert!(COMPLEXITY_TIERS.windows(2).all(|w| w[0].0 > w[1].0));
    }
}
