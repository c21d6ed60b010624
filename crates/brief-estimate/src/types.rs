//! Estimate value types

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Round to cents
#[inline]
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Professional role on a project team
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Lead architect/designer
    LeadDesigner,
    /// Engineer
    Engineer,
    /// Drafter
    Drafter,
    /// Intern, sized from drafter hours
    Intern,
    /// Coordinator, sized from lead designer and engineer hours
    Coordinator,
}

impl Role {
    /// All roles in breakdown order
    pub const ALL: [Role; 5] = [
        Self::LeadDesigner,
        Self::Engineer,
        Self::Drafter,
        Self::Intern,
        Self::Coordinator,
    ];

    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeadDesigner => "lead_designer",
            Self::Engineer => "engineer",
            Self::Drafter => "drafter",
            Self::Intern => "intern",
            Self::Coordinator => "coordinator",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seniority tier used to pick hourly rates
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Seniority {
    /// Junior
    Junior,
    /// Mid-level
    #[default]
    Pleno,
    /// Senior
    Senior,
}

/// Hours and cost for one role
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleHours {
    /// Whole hours
    pub hours: u32,
    /// Cost per hour
    pub hourly_rate: f64,
    /// `hours × hourly_rate`, rounded to cents
    pub total: f64,
}

impl RoleHours {
    /// Price `hours` at `hourly_rate`
    #[must_use]
    pub fn new(hours: u32, hourly_rate: f64) -> Self {
        Self {
            hours,
            hourly_rate,
            total: round2(f64::from(hours) * hourly_rate),
        }
    }
}

/// Hours per role
///
/// `intern.hours == round(0.3 × drafter.hours)` and
/// `coordinator.hours == round(0.15 × (lead_designer.hours + engineer.hours))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalHoursBreakdown {
    /// Lead designer
    pub lead_designer: RoleHours,
    /// Engineer
    pub engineer: RoleHours,
    /// Drafter
    pub drafter: RoleHours,
    /// Intern
    pub intern: RoleHours,
    /// Coordinator
    pub coordinator: RoleHours,
}

impl ProfessionalHoursBreakdown {
    /// Hours for `role`
    #[must_use]
    pub fn role(&self, role: Role) -> &RoleHours {
        match role {
            Role::LeadDesigner => &self.lead_designer,
            Role::Engineer => &self.engineer,
            Role::Drafter => &self.drafter,
            Role::Intern => &self.intern,
            Role::Coordinator => &self.coordinator,
        }
    }

    /// Sum of hours over all roles, saturating at `u32::MAX`
    #[must_use]
    pub fn total_hours(&self) -> u32 {
        Role::ALL
            .iter()
            .fold(0u32, |acc, r| acc.saturating_add(self.role(*r).hours))
    }

    /// Sum of role totals
    #[must_use]
    pub fn direct_cost(&self) -> f64 {
        Role::ALL.iter().map(|r| self.role(*r).total).sum()
    }
}

/// Cost build-up from direct labor to final price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialComposition {
    /// Direct labor cost
    pub direct_labor_cost: f64,
    /// `0.25 × direct`
    pub indirect_cost: f64,
    /// `0.15 × (direct + indirect)`
    pub taxes: f64,
    /// `0.20 × (direct + indirect + taxes)`
    pub margin: f64,
    /// `direct + indirect + taxes + margin`
    pub total: f64,
    /// `total / area`
    pub value_per_area: f64,
}

/// One phase of the delivery schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStage {
    /// Stage name
    pub name: String,
    /// Calendar days
    pub duration_days: u32,
    /// Share of total hours
    pub hours: u32,
    /// Share of total value
    pub value: f64,
    /// Stages that must finish first
    pub depends_on: Vec<String>,
    /// What the stage hands over
    pub deliverables: Vec<String>,
}

/// Complete estimate for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Hours per role
    pub hours: ProfessionalHoursBreakdown,
    /// Financial composition
    pub financial: FinancialComposition,
    /// Delivery schedule
    pub schedule: Vec<ScheduleStage>,
    /// Target budget minus estimated total, when a budget is known
    pub budget_gap: Option<f64>,
}

impl Estimate {
    /// All-zero estimate with no schedule
    #[must_use]
    pub fn empty() -> Self {
        let none = RoleHours::new(0, 0.0);
        Self {
            hours: ProfessionalHoursBreakdown {
                lead_designer: none,
                engineer: none,
                drafter: none,
                intern: none,
                coordinator: none,
            },
            financial: FinancialComposition {
                direct_labor_cost: 0.0,
                indirect_cost: 0.0,
                taxes: 0.0,
                margin: 0.0,
                total: 0.0,
                value_per_area: 0.0,
            },
            schedule: Vec::new(),
            budget_gap: None,
        }
    }
}
