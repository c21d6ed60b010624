//! Technical profile types
//!
//! The structured reading of a briefing:
//! - typology, subtype and size
//! - complexity tier and the four complexity indicators
//! - budget, deadline and urgency
//! - required disciplines, building systems and special features

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Area assumed when none can be recovered from the answers (m²)
pub const DEFAULT_AREA_M2: f64 = 200.0;
/// Room count assumed when unanswered
pub const DEFAULT_ROOMS: u32 = 3;
/// Bathroom count assumed when unanswered
pub const DEFAULT_BATHROOMS: u32 = 2;
/// Parking spaces assumed when unanswered
pub const DEFAULT_PARKING: u32 = 1;
/// Floor count assumed when unanswered
pub const DEFAULT_FLOORS: u32 = 1;
/// Subtype used when none is recognised
pub const DEFAULT_SUBTYPE: &str = "general";

/// Discipline names
pub mod discipline {
    /// Always required
    pub const ARCHITECTURE: &str = "architecture";
    /// Structural engineering
    pub const STRUCTURAL: &str = "structural";
    /// Electrical, plumbing and HVAC installations
    pub const INSTALLATIONS: &str = "installations";
    /// Interior design
    pub const INTERIORS: &str = "interiors";
    /// Landscape design
    pub const LANDSCAPING: &str = "landscaping";
}

/// Building typology
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Typology {
    /// Houses and apartments
    #[default]
    Residential,
    /// Shops, offices, restaurants
    Commercial,
    /// Factories and warehouses
    Industrial,
    /// Schools, clinics, churches
    Institutional,
}

impl Typology {
    /// All typologies in classification priority order
    pub const ALL: [Typology; 4] = [
        Self::Residential,
        Self::Commercial,
        Self::Industrial,
        Self::Institutional,
    ];

    /// Stable lowercase name (also used as catalog tag)
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
            Self::Institutional => "institutional",
        }
    }
}

impl Display for Typology {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Typology {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Unrecognised enum name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: '{0}'")]
pub struct UnknownVariant(pub String);

/// Complexity tier, ordered from simplest to hardest
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    /// Score below 3
    #[default]
    Low,
    /// Score 3..6
    Medium,
    /// Score 6..8
    High,
    /// Score 8 and above
    VeryHigh,
}

impl ComplexityTier {
    /// All tiers, ascending
    pub const ALL: [ComplexityTier; 4] = [Self::Low, Self::Medium, Self::High, Self::VeryHigh];

    /// Next tier up, saturating at `VeryHigh`
    #[inline]
    #[must_use]
    pub const fn raised(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::VeryHigh => Self::VeryHigh,
        }
    }

    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl Display for ComplexityTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How pressing the client's deadline is
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTier {
    /// No particular pressure
    #[default]
    Normal,
    /// Under two months or flagged urgent
    High,
    /// Under a month or flagged critical
    Critical,
}

/// Building systems the project must design for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemsFlags {
    /// Structural design beyond a simple single-storey build
    pub structural: bool,
    /// Plumbing and water
    pub hydraulic: bool,
    /// Electrical
    pub electrical: bool,
    /// Heating, ventilation and air conditioning
    pub hvac: bool,
    /// Home/building automation
    pub automation: bool,
    /// Security, CCTV and alarms
    pub security: bool,
}

impl SystemsFlags {
    /// Number of systems flagged
    #[must_use]
    pub fn count(&self) -> u32 {
        [
            self.structural,
            self.hydraulic,
            self.electrical,
            self.hvac,
            self.automation,
            self.security,
        ]
        .into_iter()
        .map(u32::from)
        .sum()
    }
}

/// Complexity sub-scores, each within `[0, 10]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexityIndicators {
    /// Architectural design effort
    pub architectural: f64,
    /// Structural effort
    pub structural: f64,
    /// Building systems effort
    pub systems: f64,
    /// Finishes and detailing effort
    pub finishes: f64,
}

impl ComplexityIndicators {
    /// Upper bound of every indicator
    pub const MAX: f64 = 10.0;

    /// Create indicators, clamping each to `[0, 10]` and rounding to one decimal
    #[must_use]
    pub fn new(architectural: f64, structural: f64, systems: f64, finishes: f64) -> Self {
        Self {
            architectural: bound(architectural),
            structural: bound(structural),
            systems: bound(systems),
            finishes: bound(finishes),
        }
    }

    /// Arithmetic mean of the four indicators
    #[must_use]
    pub fn mean(&self) -> f64 {
        (self.architectural + self.structural + self.systems + self.finishes) / 4.0
    }
}

fn bound(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    (value.clamp(0.0, ComplexityIndicators::MAX) * 10.0).round() / 10.0
}

/// Profile fields that may fall back to a default
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    /// Building typology
    Typology,
    /// Typology subtype
    Subtype,
    /// Area in m²
    Area,
    /// Room count
    Rooms,
    /// Bathroom count
    Bathrooms,
    /// Parking spaces
    Parking,
    /// Floor count
    Floors,
    /// Target budget
    Budget,
    /// Target deadline
    Deadline,
    /// Urgency tier
    Urgency,
    /// Stated motivation
    Motivation,
}

/// Structured technical reading of a briefing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalProfile {
    /// Building typology
    pub typology: Typology,
    /// Typology subtype (`house`, `office`, ...)
    pub subtype: String,
    /// Estimated area in m², always positive
    pub area_m2: f64,
    /// Complexity tier
    pub complexity: ComplexityTier,
    /// Target budget in currency units
    pub budget: Option<f64>,
    /// Target deadline in days
    pub deadline_days: Option<u32>,
    /// Urgency tier
    pub urgency: UrgencyTier,
    /// Room count
    pub rooms: u32,
    /// Bathroom count
    pub bathrooms: u32,
    /// Parking spaces
    pub parking_spaces: u32,
    /// Floor count
    pub floors: u32,
    /// Required disciplines; always contains `architecture`
    pub disciplines: BTreeSet<String>,
    /// Building systems
    pub systems: SystemsFlags,
    /// Special features (`pool`, `elevator`, ...)
    pub special_features: BTreeSet<String>,
    /// Complexity sub-scores
    pub indicators: ComplexityIndicators,
    /// Why the client is commissioning the project
    pub motivation: Option<String>,
    /// Fields that fell back to defaults
    pub defaulted: BTreeSet<ProfileField>,
}

impl TechnicalProfile {
    /// Deterministic minimal profile derived from typology alone
    ///
    /// Every field except typology carries its default and is marked as such.
    #[must_use]
    pub fn minimal(typology: Typology) -> Self {
        use ProfileField as F;

        Self {
            typology,
            subtype: DEFAULT_SUBTYPE.to_string(),
            area_m2: DEFAULT_AREA_M2,
            complexity: ComplexityTier::Low,
            budget: None,
            deadline_days: None,
            urgency: UrgencyTier::Normal,
            rooms: DEFAULT_ROOMS,
            bathrooms: DEFAULT_BATHROOMS,
            parking_spaces: DEFAULT_PARKING,
            floors: DEFAULT_FLOORS,
            disciplines: BTreeSet::from([discipline::ARCHITECTURE.to_string()]),
            systems: SystemsFlags::default(),
            special_features: BTreeSet::new(),
            indicators: ComplexityIndicators::default(),
            motivation: None,
            defaulted: BTreeSet::from([
                F::Subtype,
                F::Area,
                F::Rooms,
                F::Bathrooms,
                F::Parking,
                F::Floors,
                F::Budget,
                F::Deadline,
                F::Urgency,
                F::Motivation,
            ]),
        }
    }

    /// Whether `field` fell back to its default
    #[inline]
    #[must_use]
    pub fn is_defaulted(&self, field: ProfileField) -> bool {
        self.defaulted.contains(&field)
    }

    /// Whether the profile requires `discipline`
    #[inline]
    #[must_use]
    pub fn requires(&self, discipline: &str) -> bool {
        self.disciplines.contains(discipline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typology_round_trips_through_names() {
        for t in Typology::ALL {
            assert_eq!(t.as_str().parse::<Typology>().unwrap(), t);
        }
        assert!("castle".parse::<Typology>().is_err());
    }

    #[test]
    fn complexity_serializes_snake_case() {
        let json = serde_json::to_string(&ComplexityTier::VeryHigh).unwrap();
        assert_eq!(json, "\"very_high\"");
    }

    #[test]
    fn raised_saturates() {
        assert_eq!(ComplexityTier::Low.raised(), ComplexityTier::Medium);
        assert_eq!(ComplexityTier::VeryHigh.raised(), ComplexityTier::VeryHigh);
    }

    #[test]
    fn indicators_are_clamped() {
        let ind = ComplexityIndicators::new(-3.0, 14.0, 5.04, f64::NAN);
        assert_eq!(ind.architectural, 0.0);
        assert_eq!(ind.structural, 10.0);
        assert_eq!(ind.systems, 5.0);
        assert_eq!(ind.finishes, 0.0);
    }

    #[test]
    fn systems_count() {
        let flags = SystemsFlags {
            hydraulic: true,
            electrical: true,
            ..SystemsFlags::default()
        };
        assert_eq!(flags.count(), 2);
    }

    #[test]
    fn minimal_profile_has_defaults() {
        let profile = TechnicalProfile::minimal(Typology::Commercial);
        assert_eq!(profile.typology, Typology::Commercial);
        assert_eq!(profile.area_m2, DEFAULT_AREA_M2);
        assert!(profile.requires(discipline::ARCHITECTURE));
        assert!(profile.is_defaulted(ProfileField::Area));
        assert!(!profile.is_defaulted(ProfileField::Typology));
    }
}
