//! Labor and cost estimation
//!
//! Converts a [`TechnicalProfile`](brief_profile::TechnicalProfile) into:
//! - hours per role from hours-per-m² rows scaled by area, complexity and urgency
//! - a financial composition (direct, indirect, taxes, margin) rounded to cents
//! - a three-phase linear schedule whose shares add up to the totals
//!
//! # Example
//!
//! ```rust
//! use brief_estimate::EstimationCalculator;
//! use brief_profile::{TechnicalProfile, Typology};
//!
//! let profile = TechnicalProfile::minimal(Typology::Residential);
//! let estimate = EstimationCalculator::new().estimate(&profile).unwrap();
//! let f = &estimate.financial;
//! assert_eq!(f.total, f.direct_labor_cost + f.indirect_cost + f.taxes + f.margin);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod calculator;
pub mod error;
pub mod tables;
pub mod types;

pub use calculator::EstimationCalculator;
pub use error::EstimateError;
pub use tables::{HourlyRate, HoursPerArea, RateTable};
pub use types::{
    round2, Estimate, FinancialComposition, ProfessionalHoursBreakdown, Role, RoleHours,
    ScheduleStage, Seniority,
};
