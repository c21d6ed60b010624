//! Rate tables
//!
//! Hours-per-m² by typology × complexity, and hourly rates by role ×
//! seniority. The built-in tables are data only; a catalog snapshot may ship
//! its own [`RateTable`] to replace them.

use crate::types::{Role, Seniority};
use brief_profile::{ComplexityTier, Typology};
use serde::{Deserialize, Serialize};
use ComplexityTier::{High, Low, Medium, VeryHigh};
use Typology::{Commercial, Industrial, Institutional, Residential};

/// Hours per m² for the three directly-sized roles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoursPerArea {
    /// Typology this row applies to
    pub typology: Typology,
    /// Complexity tier this row applies to
    pub complexity: ComplexityTier,
    /// Lead designer hours per m²
    pub lead_designer: f64,
    /// Engineer hours per m²
    pub engineer: f64,
    /// Drafter hours per m²
    pub drafter: f64,
}

/// Hourly cost of a role at a seniority
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyRate {
    /// Role
    pub role: Role,
    /// Seniority tier
    pub seniority: Seniority,
    /// Cost per hour
    pub rate: f64,
}

/// Row used when a typology × complexity pair is absent
pub const FALLBACK_ROW: (Typology, ComplexityTier) = (Typology::Residential, ComplexityTier::Medium);

const fn row(
    typology: Typology,
    complexity: ComplexityTier,
    lead_designer: f64,
    engineer: f64,
    drafter: f64,
) -> HoursPerArea {
    HoursPerArea {
        typology,
        complexity,
        lead_designer,
        engineer,
        drafter,
    }
}

const fn rate(role: Role, seniority: Seniority, rate: f64) -> HourlyRate {
    HourlyRate {
        role,
        seniority,
        rate,
    }
}

/// Built-in hours-per-m² table
pub const HOURS_PER_AREA: &[HoursPerArea] = &[
    row(Residential, Low, 0.30, 0.10, 0.45),
    row(Residential, Medium, 0.40, 0.15, 0.60),
    row(Residential, High, 0.55, 0.22, 0.80),
    row(Residential, VeryHigh, 0.75, 0.30, 1.05),
    row(Commercial, Low, 0.28, 0.14, 0.42),
    row(Commercial, Medium, 0.38, 0.20, 0.55),
    row(Commercial, High, 0.50, 0.28, 0.75),
    row(Commercial, VeryHigh, 0.68, 0.36, 0.98),
    row(Industrial, Low, 0.12, 0.12, 0.20),
    row(Industrial, Medium, 0.18, 0.18, 0.28),
    row(Industrial, High, 0.25, 0.26, 0.38),
    row(Industrial, VeryHigh, 0.34, 0.35, 0.50),
    row(Institutional, Low, 0.32, 0.16, 0.48),
    row(Institutional, Medium, 0.42, 0.22, 0.62),
    row(Institutional, High, 0.58, 0.30, 0.85),
    row(Institutional, VeryHigh, 0.78, 0.40, 1.10),
];

/// Built-in hourly rates
pub const HOURLY_RATES: &[HourlyRate] = &[
    rate(Role::LeadDesigner, Seniority::Junior, 90.0),
    rate(Role::LeadDesigner, Seniority::Pleno, 130.0),
    rate(Role::LeadDesigner, Seniority::Senior, 190.0),
    rate(Role::Engineer, Seniority::Junior, 85.0),
    rate(Role::Engineer, Seniority::Pleno, 120.0),
    rate(Role::Engineer, Seniority::Senior, 175.0),
    rate(Role::Drafter, Seniority::Junior, 45.0),
    rate(Role::Drafter, Seniority::Pleno, 65.0),
    rate(Role::Drafter, Seniority::Senior, 90.0),
    rate(Role::Intern, Seniority::Junior, 22.0),
    rate(Role::Intern, Seniority::Pleno, 28.0),
    rate(Role::Intern, Seniority::Senior, 35.0),
    rate(Role::Coordinator, Seniority::Junior, 80.0),
    rate(Role::Coordinator, Seniority::Pleno, 110.0),
    rate(Role::Coordinator, Seniority::Senior, 150.0),
];

/// Fixed delivery phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageTemplate {
    /// Stage name
    pub name: &'static str,
    /// Share of hours, days and value
    pub share: f64,
    /// What the stage hands over
    pub deliverables: &'static [&'static str],
}

/// Delivery phases in order; each depends on the one before it
pub const STAGES: &[StageTemplate] = &[
    StageTemplate {
        name: "preliminary_study",
        share: 0.20,
        deliverables: &["site survey", "program of needs", "massing study"],
    },
    StageTemplate {
        name: "schematic_design",
        share: 0.30,
        deliverables: &["floor plans", "sections and elevations", "design memorandum"],
    },
    StageTemplate {
        name: "executive_design",
        share: 0.50,
        deliverables: &[
            "construction drawings",
            "detail drawings",
            "technical specifications",
            "discipline compatibility report",
        ],
    },
];

/// Hours a team delivers per calendar day when no deadline is given
pub const HOURS_PER_DAY: u32 = 16;

/// Shortest schedule the calculator produces without a deadline
pub const MIN_SCHEDULE_DAYS: u32 = 15;

/// Share of direct cost added as indirect cost
pub const INDIRECT_RATE: f64 = 0.25;
/// Share of direct + indirect paid as taxes
pub const TAX_RATE: f64 = 0.15;
/// Share of direct + indirect + taxes kept as margin
pub const MARGIN_RATE: f64 = 0.20;

/// Lookup tables for the estimation calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Hours-per-m² rows
    #[serde(default)]
    pub hours_per_area: Vec<HoursPerArea>,
    /// Hourly rate rows
    #[serde(default)]
    pub hourly_rates: Vec<HourlyRate>,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            hours_per_area: HOURS_PER_AREA.to_vec(),
            hourly_rates: HOURLY_RATES.to_vec(),
        }
    }
}

impl RateTable {
    /// Hours-per-m² row for a pair
    ///
    /// Falls back to the residential-medium row of this table, then of the
    /// built-in table.
    #[must_use]
    pub fn hours_per_area(&self, typology: Typology, complexity: ComplexityTier) -> HoursPerArea {
        let find = |rows: &[HoursPerArea], t: Typology, c: ComplexityTier| {
            rows.iter()
                .find(|r| r.typology == t && r.complexity == c)
                .copied()
        };
        let (fallback_t, fallback_c) = FALLBACK_ROW;

        find(self.hours_per_area.as_slice(), typology, complexity)
            .or_else(|| {
                tracing::debug!(%typology, %complexity, "hours-per-area pair absent, using fallback row");
                find(self.hours_per_area.as_slice(), fallback_t, fallback_c)
            })
            .or_else(|| find(HOURS_PER_AREA, fallback_t, fallback_c))
            .unwrap_or(row(fallback_t, fallback_c, 0.40, 0.15, 0.60))
    }

    /// Hourly rate for a role
    ///
    /// Falls back to the mid-level (`pleno`) rate, then the built-in table.
    #[must_use]
    pub fn hourly_rate(&self, role: Role, seniority: Seniority) -> f64 {
        let find = |rows: &[HourlyRate], s: Seniority| {
            rows.iter()
                .find(|r| r.role == role && r.seniority == s)
                .map(|r| r.rate)
        };

        find(self.hourly_rates.as_slice(), seniority)
            .or_else(|| find(self.hourly_rates.as_slice(), Seniority::Pleno))
            .or_else(|| find(HOURLY_RATES, seniority))
            .unwrap_or(0.0)
    }

    /// Mean mid-level rate of the three directly-sized roles
    #[must_use]
    pub fn blended_rate(&self) -> f64 {
        let roles = [Role::LeadDesigner, Role::Engineer, Role::Drafter];
        roles
            .iter()
            .map(|r| self.hourly_rate(*r, Seniority::Pleno))
            .sum::<f64>()
            / 3.0
    }
}
