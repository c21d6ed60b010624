//! Composition result

use brief_catalog::{ComposedPlan, QuestionPlan, TemplateAnalysis};
use brief_estimate::{FinancialComposition, ProfessionalHoursBreakdown, ScheduleStage};
use brief_profile::TechnicalProfile;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wall-clock time spent per stage, in microseconds
///
/// Observability only; excluded from [`CompositionResult::canonical_bytes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    /// Answer normalization
    pub normalize_us: u64,
    /// Profile detection (or cache lookup)
    pub detect_us: u64,
    /// Estimation
    pub estimate_us: u64,
    /// Template selection
    pub select_us: u64,
    /// Question optimization
    pub optimize_us: u64,
    /// Task-tree composition
    pub compose_us: u64,
    /// Whole request
    pub total_us: u64,
}

/// Clamp a duration to whole microseconds
#[must_use]
pub(crate) fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

/// Everything composed for one briefing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionResult {
    /// Technical profile
    pub profile: TechnicalProfile,
    /// Hours per role
    pub hours: ProfessionalHoursBreakdown,
    /// Financial composition
    pub financial: FinancialComposition,
    /// Delivery schedule
    pub schedule: Vec<ScheduleStage>,
    /// Target budget minus estimated total, when a budget is known
    pub budget_gap: Option<f64>,
    /// Template selection
    pub template_analysis: TemplateAnalysis,
    /// Follow-up questions
    pub optimized_questions: QuestionPlan,
    /// Merged task plan of the selected templates
    pub composed_plan: ComposedPlan,
    /// Why the result is degraded; empty for a full result
    pub degraded: Vec<String>,
    /// Stage timings
    pub timings: StageTimings,
}

/// Serialized view of a result without its timings
#[derive(Serialize)]
struct Canonical<'a> {
    profile: &'a TechnicalProfile,
    hours: &'a ProfessionalHoursBreakdown,
    financial: &'a FinancialComposition,
    schedule: &'a [ScheduleStage],
    budget_gap: Option<f64>,
    template_analysis: &'a TemplateAnalysis,
    optimized_questions: &'a QuestionPlan,
    composed_plan: &'a ComposedPlan,
    degraded: &'a [String],
}

impl CompositionResult {
    /// JSON bytes of everything except timings
    ///
    /// Two compositions of the same inputs produce identical bytes whether or
    /// not their stages were served from cache.
    ///
    /// # Errors
    /// Serialization failure.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&Canonical {
            profile: &self.profile,
            hours: &self.hours,
            financial: &self.financial,
            schedule: &self.schedule,
            budget_gap: self.budget_gap,
            template_analysis: &self.template_analysis,
            optimized_questions: &self.optimized_questions,
            composed_plan: &self.composed_plan,
            degraded: &self.degraded,
        })
    }

    /// Whether any structural failure degraded the result
    #[inline]
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    /// Selection confidence
    #[inline]
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.template_analysis.confidence
    }
}
