//! Lenient numeric and duration parsing
//!
//! Questionnaire answers arrive as free text written by clients, mostly in
//! pt-BR notation ("1.200,50", "R$ 1,5 milhão", "6 meses"). These helpers pull
//! the first usable quantity out of such text and never fail loudly.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d[\d.,]*)\s*(milh[õoã]es|milh[ãa]o|million|mi\b|mil\b|k\b)?")
        .expect("static pattern compiles")
});

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\d+(?:[.,]\d+)?)\s*(dias?|days?|semanas?|weeks?|m[eê]s(?:es)?|months?|anos?|years?)",
    )
    .expect("static pattern compiles")
});

static AREA_MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d[\d.,]*)\s*(?:m2|m²|metros\s+quadrados|metros|sqm)")
        .expect("static pattern compiles")
});

/// Parse the first quantity found in `text`
///
/// Understands thousands/decimal separators in both pt-BR and en notation
/// and the magnitude suffixes `mil`, `k`, `milhão`/`milhões`, `million`.
///
/// ```
/// use brief_answers::parse_number;
/// assert_eq!(parse_number("R$ 1.500.000"), Some(1_500_000.0));
/// assert_eq!(parse_number("1.200,50"), Some(1200.5));
/// assert_eq!(parse_number("180m2"), Some(180.0));
/// assert_eq!(parse_number("sem ideia"), None);
/// ```
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let lowered = text.to_lowercase();
    let caps = NUMBER_TOKEN.captures(&lowered)?;
    let base = normalize_numeric(caps.get(1)?.as_str())?;
    let factor = match caps.get(2).map(|m| m.as_str()) {
        Some(s) if s.starts_with("milh") || s == "million" || s == "mi" => 1_000_000.0,
        Some("mil" | "k") => 1_000.0,
        _ => 1.0,
    };
    let value = base * factor;
    value.is_finite().then_some(value)
}

/// Normalize a digit token with `.`/`,` separators into an `f64`
fn normalize_numeric(token: &str) -> Option<f64> {
    let token = token.trim_end_matches(['.', ',']);
    let dots = token.matches('.').count();
    let commas = token.matches(',').count();

    let canonical = match (dots, commas) {
        (0, 0) => token.to_string(),
        (_, 0) => {
            // "1.200" and "1.200.000" are thousands, "2.5" is a decimal
            let tail = token.rsplit('.').next().unwrap_or_default();
            if dots > 1 || tail.len() == 3 {
                token.replace('.', "")
            } else {
                token.to_string()
            }
        }
        (0, 1) => token.replace(',', "."),
        (0, _) => token.replace(',', ""),
        _ => {
            let last_dot = token.rfind('.').unwrap_or(0);
            let last_comma = token.rfind(',').unwrap_or(0);
            if last_comma > last_dot {
                token.replace('.', "").replace(',', ".")
            } else {
                token.replace(',', "")
            }
        }
    };

    canonical.parse::<f64>().ok()
}

/// Parse a duration expressed in days, weeks, months or years into days
///
/// A bare number is read as days.
///
/// ```
/// use brief_answers::parse_duration_days;
/// assert_eq!(parse_duration_days("6 meses"), Some(180));
/// assert_eq!(parse_duration_days("2 semanas"), Some(14));
/// assert_eq!(parse_duration_days("90"), Some(90));
/// ```
#[must_use]
pub fn parse_duration_days(text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();
    if let Some(caps) = DURATION.captures(&lowered) {
        let amount = normalize_numeric(caps.get(1)?.as_str())?;
        let unit = caps.get(2)?.as_str();
        let per_unit = if unit.starts_with("dia") || unit.starts_with("day") {
            1.0
        } else if unit.starts_with("semana") || unit.starts_with("week") {
            7.0
        } else if unit.starts_with("m") {
            30.0
        } else {
            365.0
        };
        return to_days(amount * per_unit);
    }
    parse_number(&lowered).and_then(to_days)
}

fn to_days(value: f64) -> Option<u32> {
    if value.is_finite() && value > 0.0 && value < f64::from(u32::MAX) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(value.round() as u32)
    } else {
        None
    }
}

/// Find the first "<number> m2" style area mention in free text
///
/// ```
/// use brief_answers::find_area_mention;
/// assert_eq!(find_area_mention("casa residencial 180m2 padrão simples"), Some(180.0));
/// ```
#[must_use]
pub fn find_area_mention(text: &str) -> Option<f64> {
    let lowered = text.to_lowercase();
    AREA_MENTION
        .captures_iter(&lowered)
        .filter_map(|caps| caps.get(1).and_then(|m| normalize_numeric(m.as_str())))
        .find(|value| *value > 0.0 && value.is_finite())
}
