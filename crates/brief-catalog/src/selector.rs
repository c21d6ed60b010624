//! Template selection
//!
//! Scores every catalog template against a [`TechnicalProfile`] and
//! partitions them into principal, complementary and optional tiers.
//!
//! A template earns points for each tag it shares with the profile; the
//! score is `min(100, points) / 100`, so it only grows with matching tags and
//! never leaves `[0, 1]`. Returning clients get a fixed boost on principal
//! scores after partitioning, so the boost never moves a template between
//! tiers.

use crate::model::TemplateDefinition;
use brief_profile::{ComplexityTier, TechnicalProfile, UrgencyTier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Points for a tag naming the profile's typology
pub const TYPOLOGY_POINTS: u32 = 75;
/// Points for each tag naming a required discipline
pub const DISCIPLINE_POINTS: u32 = 20;
/// Points for a tag naming the profile's subtype
pub const SUBTYPE_POINTS: u32 = 15;
/// Points for each tag naming a special feature
pub const FEATURE_POINTS: u32 = 10;
/// Points for a tag naming the client's segment
pub const SEGMENT_POINTS: u32 = 10;
/// Points for the catch-all `general` tag
pub const GENERAL_POINTS: u32 = 10;
/// Tag every profile matches
pub const GENERAL_TAG: &str = "general";

/// Lowest principal score
pub const PRINCIPAL_THRESHOLD: f64 = 0.8;
/// Lowest complementary score
pub const COMPLEMENTARY_THRESHOLD: f64 = 0.6;
/// Principal score multiplier for returning clients
pub const EXPERIENCED_BOOST: f64 = 1.10;
/// Selected task count above which overall complexity is raised a tier
pub const TASK_COUNT_RAISE: usize = 40;

/// Recommendation emitted when a result needs a human look
pub const MANUAL_REVIEW: &str = "Manual review required: no reliable template selection";

/// Who the project is for
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientContext {
    /// Projects previously delivered to this client
    #[serde(default)]
    pub prior_project_count: u32,
    /// Market segment
    #[serde(default)]
    pub segment: Option<String>,
}

impl ClientContext {
    /// Context for a returning client
    #[must_use]
    pub fn returning(prior_project_count: u32) -> Self {
        Self {
            prior_project_count,
            segment: None,
        }
    }

    /// Set the segment
    #[must_use]
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Whether the client has project history
    #[inline]
    #[must_use]
    pub fn is_experienced(&self) -> bool {
        self.prior_project_count > 0
    }
}

/// Selection options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorOptions {
    /// Keep templates scoring below the complementary threshold
    pub include_optional: bool,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            include_optional: true,
        }
    }
}

/// Scored template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCandidate {
    /// Template id
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    pub category: String,
    /// Score in `[0, 1]`
    pub score: f64,
    /// Tasks in the template's tree
    pub task_count: usize,
}

/// Partitioned selection with its assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateAnalysis {
    /// Score ≥ 0.8
    pub principal: Vec<TemplateCandidate>,
    /// 0.6 ≤ score < 0.8
    pub complementary: Vec<TemplateCandidate>,
    /// Score < 0.6, when included
    pub optional: Vec<TemplateCandidate>,
    /// Profile complexity, raised for large task sets
    pub overall_complexity: ComplexityTier,
    /// Share of required disciplines covered by principal and complementary picks
    pub confidence: f64,
    /// Required disciplines nothing selected covers
    pub uncovered_disciplines: BTreeSet<String>,
    /// Free-text hints
    pub recommendations: Vec<String>,
}

impl TemplateAnalysis {
    /// Zero-confidence analysis flagging manual review
    #[must_use]
    pub fn degraded(overall_complexity: ComplexityTier) -> Self {
        Self {
            principal: Vec::new(),
            complementary: Vec::new(),
            optional: Vec::new(),
            overall_complexity,
            confidence: 0.0,
            uncovered_disciplines: BTreeSet::new(),
            recommendations: vec![MANUAL_REVIEW.to_string()],
        }
    }

    /// Principal then complementary picks
    pub fn selected(&self) -> impl Iterator<Item = &TemplateCandidate> {
        self.principal.iter().chain(&self.complementary)
    }

    /// Whether anything was selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.principal.is_empty() && self.complementary.is_empty()
    }
}

/// Template scorer and partitioner
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSelector {
    options: SelectorOptions,
}

impl TemplateSelector {
    /// Selector with the given options
    #[must_use]
    pub fn new(options: SelectorOptions) -> Self {
        Self { options }
    }

    /// Score of one template for a profile
    #[must_use]
    pub fn score(
        &self,
        template: &TemplateDefinition,
        profile: &TechnicalProfile,
        client: &ClientContext,
    ) -> f64 {
        let mut points = 0u32;
        if template.has_tag(profile.typology.as_str()) {
            points += TYPOLOGY_POINTS;
        }
        // a defaulted subtype is "general"; that tag already earns GENERAL_POINTS
        if profile.subtype != GENERAL_TAG && template.has_tag(&profile.subtype) {
            points += SUBTYPE_POINTS;
        }
        if template.has_tag(GENERAL_TAG) {
            points += GENERAL_POINTS;
        }
        if client.segment.as_deref().is_some_and(|s| template.has_tag(s)) {
            points += SEGMENT_POINTS;
        }
        for discipline in &profile.disciplines {
            if template.has_tag(discipline) {
                points = points.saturating_add(DISCIPLINE_POINTS);
            }
        }
        for feature in &profile.special_features {
            if template.has_tag(feature) {
                points = points.saturating_add(FEATURE_POINTS);
            }
        }
        f64::from(points.min(100)) / 100.0
    }

    /// Score, partition and assess the catalog
    #[must_use]
    pub fn select(
        &self,
        profile: &TechnicalProfile,
        templates: &[TemplateDefinition],
        client: &ClientContext,
    ) -> TemplateAnalysis {
        let mut principal = Vec::new();
        let mut complementary = Vec::new();
        let mut optional = Vec::new();

        for template in templates {
            let candidate = TemplateCandidate {
                id: template.id.clone(),
                name: template.name.clone(),
                category: template.category.clone(),
                score: self.score(template, profile, client),
                task_count: template.tasks.len(),
            };
            if candidate.score >= PRINCIPAL_THRESHOLD {
                principal.push(candidate);
            } else if candidate.score >= COMPLEMENTARY_THRESHOLD {
                complementary.push(candidate);
            } else if self.options.include_optional {
                optional.push(candidate);
            }
        }

        if client.is_experienced() {
            for candidate in &mut principal {
                candidate.score = (candidate.score * EXPERIENCED_BOOST).min(1.0);
            }
        }
        for tier in [&mut principal, &mut complementary, &mut optional] {
            tier.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        }

        let selected_ids: BTreeSet<&str> = principal
            .iter()
            .chain(&complementary)
            .map(|c| c.id.as_str())
            .collect();
        let uncovered_disciplines: BTreeSet<String> = profile
            .disciplines
            .iter()
            .filter(|d| {
                !templates
                    .iter()
                    .any(|t| selected_ids.contains(t.id.as_str()) && t.covers(d))
            })
            .cloned()
            .collect();
        let confidence = coverage(profile.disciplines.len(), uncovered_disciplines.len());

        let task_count: usize = principal
            .iter()
            .chain(&complementary)
            .map(|c| c.task_count)
            .sum();
        let overall_complexity = if task_count > TASK_COUNT_RAISE {
            profile.complexity.raised()
        } else {
            profile.complexity
        };

        let mut analysis = TemplateAnalysis {
            principal,
            complementary,
            optional,
            overall_complexity,
            confidence,
            uncovered_disciplines,
            recommendations: Vec::new(),
        };
        analysis.recommendations = recommendations(&analysis, profile, client);

        tracing::debug!(
            principal = analysis.principal.len(),
            complementary = analysis.complementary.len(),
            optional = analysis.optional.len(),
            confidence = analysis.confidence,
            "selected templates"
        );
        analysis
    }
}

#[allow(clippy::cast_precision_loss)]
fn coverage(required: usize, uncovered: usize) -> f64 {
    if required == 0 {
        return 1.0;
    }
    (required - uncovered) as f64 / required as f64
}

fn recommendations(
    analysis: &TemplateAnalysis,
    profile: &TechnicalProfile,
    client: &ClientContext,
) -> Vec<String> {
    let mut out = Vec::new();
    if analysis.overall_complexity == ComplexityTier::VeryHigh {
        out.push("Very high complexity: split the project into delivery phases".to_string());
    }
    if analysis.principal.is_empty() {
        out.push("No principal template matched: review the template choice manually".to_string());
    }
    if !analysis.uncovered_disciplines.is_empty() {
        let list: Vec<&str> = analysis.uncovered_disciplines.iter().map(String::as_str).collect();
        out.push(format!("Disciplines without a matching template: {}", list.join(", ")));
    }
    if profile.urgency == UrgencyTier::Critical {
        out.push("Critical deadline: reinforce the team or negotiate scope".to_string());
    }
    if client.is_experienced() {
        out.push("Returning client: reuse standards from previous projects".to_string());
    }
    out
}
