//! Estimation calculator
//!
//! Turns a [`TechnicalProfile`] into role hours, a financial composition and
//! a three-phase schedule. Pure computation over the [`RateTable`]; the only
//! failure is a profile whose area is not a positive finite number.

use crate::error::{EstimateError, Result};
use crate::tables::{
    RateTable, HOURS_PER_DAY, INDIRECT_RATE, MARGIN_RATE, MIN_SCHEDULE_DAYS, STAGES, TAX_RATE,
};
use crate::types::{
    round2, Estimate, FinancialComposition, ProfessionalHoursBreakdown, Role, RoleHours,
    ScheduleStage, Seniority,
};
use brief_profile::{TechnicalProfile, UrgencyTier};

/// Intern hours as a share of drafter hours
const INTERN_SHARE: f64 = 0.30;
/// Coordinator hours as a share of lead designer + engineer hours
const COORDINATOR_SHARE: f64 = 0.15;

/// Multiplier applied to lead designer hours for an urgency tier
#[must_use]
pub const fn urgency_multiplier(urgency: UrgencyTier) -> f64 {
    match urgency {
        UrgencyTier::Normal => 1.0,
        UrgencyTier::High => 1.25,
        UrgencyTier::Critical => 1.5,
    }
}

/// Multiplier derived from the complexity indicators, within `[1.0, 1.1]`
#[must_use]
pub fn complexity_multiplier(profile: &TechnicalProfile) -> f64 {
    1.0 + profile.indicators.mean() / 100.0
}

/// Profile → hours, money and schedule
#[derive(Debug, Clone, Default)]
pub struct EstimationCalculator {
    rates: RateTable,
    seniority: Seniority,
}

impl EstimationCalculator {
    /// Calculator over the built-in tables at mid-level seniority
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rate table
    #[must_use]
    pub fn with_rates(mut self, rates: RateTable) -> Self {
        self.rates = rates;
        self
    }

    /// Price hours at `seniority`
    #[must_use]
    pub fn with_seniority(mut self, seniority: Seniority) -> Self {
        self.seniority = seniority;
        self
    }

    /// Rate table in use
    #[inline]
    #[must_use]
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Estimate a profile
    ///
    /// # Errors
    /// [`EstimateError::InvalidProfile`] when the area is not positive and finite.
    pub fn estimate(&self, profile: &TechnicalProfile) -> Result<Estimate> {
        let area = profile.area_m2;
        if !area.is_finite() || area <= 0.0 {
            return Err(EstimateError::InvalidProfile { area });
        }

        let hours = self.hours(profile);
        let financial = financial(&hours, area);
        let schedule = schedule(&hours, &financial, profile.deadline_days);
        let budget_gap = profile.budget.map(|b| round2(b - financial.total));

        tracing::debug!(
            typology = %profile.typology,
            complexity = %profile.complexity,
            total_hours = hours.total_hours(),
            total = financial.total,
            "estimated profile"
        );

        Ok(Estimate {
            hours,
            financial,
            schedule,
            budget_gap,
        })
    }

    fn hours(&self, profile: &TechnicalProfile) -> ProfessionalHoursBreakdown {
        let base = self
            .rates
            .hours_per_area(profile.typology, profile.complexity);
        let scale = profile.area_m2 * complexity_multiplier(profile);

        let lead = whole_hours(base.lead_designer * scale * urgency_multiplier(profile.urgency));
        let engineer = whole_hours(base.engineer * scale);
        let drafter = whole_hours(base.drafter * scale);
        let intern = whole_hours(INTERN_SHARE * f64::from(drafter));
        let coordinator = whole_hours(COORDINATOR_SHARE * (f64::from(lead) + f64::from(engineer)));

        let priced = |role: Role, hours: u32| RoleHours::new(hours, self.rates.hourly_rate(role, self.seniority));

        ProfessionalHoursBreakdown {
            lead_designer: priced(Role::LeadDesigner, lead),
            engineer: priced(Role::Engineer, engineer),
            drafter: priced(Role::Drafter, drafter),
            intern: priced(Role::Intern, intern),
            coordinator: priced(Role::Coordinator, coordinator),
        }
    }
}

fn financial(hours: &ProfessionalHoursBreakdown, area: f64) -> FinancialComposition {
    let direct_labor_cost = round2(hours.direct_cost());
    let indirect_cost = round2(direct_labor_cost * INDIRECT_RATE);
    let taxes = round2((direct_labor_cost + indirect_cost) * TAX_RATE);
    let margin = round2((direct_labor_cost + indirect_cost + taxes) * MARGIN_RATE);
    let total = direct_labor_cost + indirect_cost + taxes + margin;

    FinancialComposition {
        direct_labor_cost,
        indirect_cost,
        taxes,
        margin,
        total,
        value_per_area: round2(total / area),
    }
}

fn schedule(
    hours: &ProfessionalHoursBreakdown,
    financial: &FinancialComposition,
    deadline_days: Option<u32>,
) -> Vec<ScheduleStage> {
    let total_hours = hours.total_hours();
    let total_days = deadline_days
        .unwrap_or_else(|| total_hours.div_ceil(HOURS_PER_DAY).max(MIN_SCHEDULE_DAYS));

    let days = split_whole(total_days);
    let stage_hours = split_whole(total_hours);
    let values = split_money(financial.total);

    let mut previous: Option<&str> = None;
    STAGES
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let depends_on = previous.map(|p| vec![p.to_string()]).unwrap_or_default();
            previous = Some(stage.name);
            ScheduleStage {
                name: stage.name.to_string(),
                duration_days: days[i],
                hours: stage_hours[i],
                value: values[i],
                depends_on,
                deliverables: stage.deliverables.iter().map(|d| (*d).to_string()).collect(),
            }
        })
        .collect()
}

/// Split `total` by stage share; the last stage takes the remainder
fn split_whole(total: u32) -> Vec<u32> {
    let mut remaining = total;
    let last = STAGES.len().saturating_sub(1);
    STAGES
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let part = if i == last {
                remaining
            } else {
                whole_hours(stage.share * f64::from(total)).min(remaining)
            };
            remaining -= part;
            part
        })
        .collect()
}

fn split_money(total: f64) -> Vec<f64> {
    let mut allocated = 0.0;
    let last = STAGES.len().saturating_sub(1);
    STAGES
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let part = if i == last {
                round2(total - allocated)
            } else {
                round2(stage.share * total)
            };
            allocated += part;
            part
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_hours(value: f64) -> u32 {
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_profile::{ComplexityIndicators, ComplexityTier, Typology};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn profile(area_m2: f64, complexity: ComplexityTier) -> TechnicalProfile {
        TechnicalProfile {
            area_m2,
            complexity,
            ..TechnicalProfile::minimal(Typology::Residential)
        }
    }

    #[test]
    fn residential_medium_hours_and_money() {
        let estimate = EstimationCalculator::new()
            .estimate(&profile(100.0, ComplexityTier::Medium))
            .unwrap();
        let h = &estimate.hours;

        assert_eq!(
            [
                h.lead_designer.hours,
                h.engineer.hours,
                h.drafter.hours,
                h.intern.hours,
                h.coordinator.hours
            ],
            [40, 15, 60, 18, 8]
        );
        assert_eq!(estimate.financial.direct_labor_cost, 12_284.0);
        assert_eq!(estimate.financial.indirect_cost, 3_071.0);
        assert_eq!(estimate.financial.taxes, 2_303.25);
        assert_eq!(estimate.budget_gap, None);
    }

    #[test]
    fn urgency_scales_lead_designer_only() {
        let normal = EstimationCalculator::new()
            .estimate(&profile(100.0, ComplexityTier::Medium))
            .unwrap();
        let critical = EstimationCalculator::new()
            .estimate(&TechnicalProfile {
                urgency: UrgencyTier::Critical,
                ..profile(100.0, ComplexityTier::Medium)
            })
            .unwrap();

        assert_eq!(critical.hours.lead_designer.hours, 60);
        assert_eq!(critical.hours.engineer.hours, normal.hours.engineer.hours);
        assert_eq!(critical.hours.drafter.hours, normal.hours.drafter.hours);
    }

    #[test]
    fn complexity_indicators_raise_hours() {
        let plain = EstimationCalculator::new()
            .estimate(&profile(500.0, ComplexityTier::High))
            .unwrap();
        let detailed = EstimationCalculator::new()
            .estimate(&TechnicalProfile {
                indicators: ComplexityIndicators::new(10.0, 10.0, 10.0, 10.0),
                ..profile(500.0, ComplexityTier::High)
            })
            .unwrap();

        assert!(detailed.hours.total_hours() > plain.hours.total_hours());
    }

    #[test]
    fn seniority_changes_rates_not_hours() {
        let pleno = EstimationCalculator::new()
            .estimate(&profile(200.0, ComplexityTier::Low))
            .unwrap();
        let senior = EstimationCalculator::new()
            .with_seniority(Seniority::Senior)
            .estimate(&profile(200.0, ComplexityTier::Low))
            .unwrap();

        assert_eq!(pleno.hours.total_hours(), senior.hours.total_hours());
        assert!(senior.financial.total > pleno.financial.total);
    }

    #[test]
    fn non_positive_area_is_rejected() {
        let calc = EstimationCalculator::new();
        for area in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = calc.estimate(&profile(area, ComplexityTier::Low)).unwrap_err();
            assert!(matches!(err, EstimateError::InvalidProfile { .. }));
        }
    }

    #[test]
    fn schedule_is_linear_chain_with_minimum_length() {
        let estimate = EstimationCalculator::new()
            .estimate(&profile(100.0, ComplexityTier::Medium))
            .unwrap();
        let names: Vec<_> = estimate.schedule.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(names, ["preliminary_study", "schematic_design", "executive_design"]);
        assert!(estimate.schedule[0].depends_on.is_empty());
        assert_eq!(estimate.schedule[1].depends_on, ["preliminary_study"]);
        assert_eq!(estimate.schedule[2].depends_on, ["schematic_design"]);
        // 141 hours is 9 days of work, below the 15-day floor
        let days: u32 = estimate.schedule.iter().map(|s| s.duration_days).sum();
        assert_eq!(days, 15);
    }

    #[test]
    fn deadline_sets_schedule_length() {
        let estimate = EstimationCalculator::new()
            .estimate(&TechnicalProfile {
                deadline_days: Some(90),
                ..profile(300.0, ComplexityTier::High)
            })
            .unwrap();
        let days: Vec<u32> = estimate.schedule.iter().map(|s| s.duration_days).collect();
        assert_eq!(days, [18, 27, 45]);
    }

    #[test]
    fn budget_gap_is_budget_minus_total() {
        let estimate = EstimationCalculator::new()
            .estimate(&TechnicalProfile {
                budget: Some(10_000.0),
                ..profile(100.0, ComplexityTier::Medium)
            })
            .unwrap();
        let gap = estimate.budget_gap.unwrap();
        assert!(gap < 0.0);
        assert!((gap - (10_000.0 - estimate.financial.total)).abs() < 0.01);
    }

    #[test]
    fn custom_rate_table_is_used() {
        let rates = RateTable {
            hours_per_area: Vec::new(),
            hourly_rates: Vec::new(),
        };
        let estimate = EstimationCalculator::new()
            .with_rates(rates)
            .estimate(&profile(100.0, ComplexityTier::VeryHigh))
            .unwrap();
        // empty table resolves to the residential-medium built-in row
        assert_eq!(estimate.hours.lead_designer.hours, 40);
    }

    #[test]
    fn huge_area_still_estimates() {
        let estimate = EstimationCalculator::new()
            .estimate(&profile(1e10, ComplexityTier::VeryHigh))
            .unwrap();
        let total = estimate.hours.total_hours();

        assert_eq!(total, u32::MAX);
        let stage_hours: u64 = estimate.schedule.iter().map(|s| u64::from(s.hours)).sum();
        assert_eq!(stage_hours, u64::from(total));
        assert!(estimate.financial.total.is_finite());
        assert!(estimate.financial.total > 0.0);
    }

    fn arb_urgency() -> impl Strategy<Value = UrgencyTier> {
        prop_oneof![
            Just(UrgencyTier::Normal),
            Just(UrgencyTier::High),
            Just(UrgencyTier::Critical),
        ]
    }

    proptest! {
        #[test]
        fn estimate_invariants(
            area in 1.0f64..20_000.0,
            tier in 0usize..4,
            urgency in arb_urgency(),
            indicator in 0.0f64..10.0,
            deadline in proptest::option::of(1u32..720),
        ) {
            let profile = TechnicalProfile {
                urgency,
                deadline_days: deadline,
                indicators: ComplexityIndicators::new(indicator, indicator, indicator, indicator),
                ..profile(area, ComplexityTier::ALL[tier])
            };
            let e = EstimationCalculator::new().estimate(&profile).unwrap();
            let h = &e.hours;
            let f = &e.financial;

            prop_assert_eq!(h.intern.hours, whole_hours(0.3 * f64::from(h.drafter.hours)));
            prop_assert_eq!(
                h.coordinator.hours,
                whole_hours(0.15 * f64::from(h.lead_designer.hours + h.engineer.hours))
            );
            prop_assert_eq!(f.total, f.direct_labor_cost + f.indirect_cost + f.taxes + f.margin);

            let stage_hours: u32 = e.schedule.iter().map(|s| s.hours).sum();
            prop_assert_eq!(stage_hours, h.total_hours());
            let stage_days: u32 = e.schedule.iter().map(|s| s.duration_days).sum();
            match deadline {
                Some(d) => prop_assert_eq!(stage_days, d),
                None => prop_assert!(stage_days >= MIN_SCHEDULE_DAYS),
            }
            let stage_value: f64 = e.schedule.iter().map(|s| s.value).sum();
            prop_assert!((stage_value - f.total).abs() < 0.05);
        }
    }
}
