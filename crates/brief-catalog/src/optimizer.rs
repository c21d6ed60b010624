//! Question optimization
//!
//! Builds the follow-up question list for the selected templates:
//!
//! 1. gather the questions of every selected template
//! 2. drop questions the client already answered
//! 3. assign a priority tier and a relevance score
//! 4. collapse duplicates sharing a signature, keeping the most relevant
//! 5. order by tier, then resolve dependencies depth-first so that every
//!    dependency is asked before its dependent
//!
//! Dependency cycles are broken at the back-edge and reported in
//! [`QuestionPlan::broken_dependencies`]; the question on the cycle is still
//! asked exactly once.

use crate::error::CatalogError;
use crate::model::{InputType, Question};
use crate::selector::TemplateCandidate;
use brief_answers::AnswerMap;
use brief_profile::TechnicalProfile;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

/// Categories promoted to the important tier
pub const IMPORTANT_CATEGORIES: &[&str] = &["budget", "schedule", "orcamento", "prazo"];

/// Characters of question text that take part in the duplicate signature
pub const SIGNATURE_TEXT_CHARS: usize = 50;

/// Relevance in tenths: base, typology category match, motivation match
const BASE_RELEVANCE: u32 = 5;
const TYPOLOGY_RELEVANCE: u32 = 3;
const MOTIVATION_RELEVANCE: u32 = 2;

/// Priority tier, ordered from most to least pressing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    /// Source marks the question mandatory
    Essential,
    /// Budget or schedule question
    Important,
    /// Depends on another question
    Conditional,
    /// Everything else
    Optional,
}

impl PriorityTier {
    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::Important => "important",
            Self::Conditional => "conditional",
            Self::Optional => "optional",
        }
    }
}

impl Display for PriorityTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Question ready to be asked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedQuestion {
    /// Question id
    pub id: String,
    /// Owning template
    pub template_id: String,
    /// Question text
    pub text: String,
    /// Expected input
    pub input_type: InputType,
    /// Category
    pub category: String,
    /// Priority tier
    pub priority: PriorityTier,
    /// Relevance in `[0, 1]`
    pub relevance_score: f64,
    /// Expected time to answer
    pub estimated_seconds: u32,
    /// Questions asked before this one
    pub depends_on: Vec<String>,
}

/// Dependency edge skipped to break a cycle
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrokenDependency {
    /// Dependent question
    pub question: String,
    /// Dependency that could not be asked first
    pub dependency: String,
}

/// Ordered question list for one composition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionPlan {
    /// Questions in asking order
    pub questions: Vec<OptimizedQuestion>,
    /// Cycle edges that were skipped
    pub broken_dependencies: Vec<BrokenDependency>,
    /// Sum of per-question estimates
    pub total_estimated_seconds: u32,
    /// No catalog question was resolvable; fixed fallback questions were used
    pub used_fallback: bool,
}

impl QuestionPlan {
    fn new(questions: Vec<OptimizedQuestion>, broken: Vec<BrokenDependency>, used_fallback: bool) -> Self {
        let total_estimated_seconds = questions
            .iter()
            .fold(0u32, |acc, q| acc.saturating_add(q.estimated_seconds));
        Self {
            questions,
            broken_dependencies: broken,
            total_estimated_seconds,
            used_fallback,
        }
    }

    /// Ids in asking order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|q| q.id.as_str())
    }
}

/// Duplicate signature: category, input type and leading text
type Signature = (String, InputType, String);

/// Question deduplication and ordering
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionOptimizer;

impl QuestionOptimizer {
    /// Create an optimizer
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the question plan for the selected templates
    ///
    /// `lookup` resolves a template id to its questions; lookup failures are
    /// logged and skipped. When nothing resolves, the plan holds the fixed
    /// fallback questions.
    pub fn optimize<F>(
        &self,
        selected: &[TemplateCandidate],
        lookup: F,
        profile: &TechnicalProfile,
        answers: &AnswerMap,
    ) -> QuestionPlan
    where
        F: Fn(&str) -> Result<Vec<Question>, CatalogError>,
    {
        let gathered = gather(selected, lookup);
        if gathered.is_empty() {
            tracing::warn!(templates = selected.len(), "no catalog questions resolvable, using fallback set");
            let questions = fallback_questions()
                .into_iter()
                .filter(|q| !answers.contains_key(&q.id))
                .collect();
            return QuestionPlan::new(questions, Vec::new(), true);
        }

        let pending: Vec<OptimizedQuestion> = gathered
            .into_iter()
            .filter(|q| !answers.contains_key(&q.id))
            .map(|q| score(q, profile))
            .collect();
        let mut unique = dedup(pending);
        unique.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| b.relevance_score.total_cmp(&a.relevance_score))
        });
        let (questions, broken) = order(unique);

        tracing::debug!(
            questions = questions.len(),
            broken = broken.len(),
            "optimized question plan"
        );
        QuestionPlan::new(questions, broken, false)
    }
}

/// Collect the questions of every selected template, duplicates included
fn gather<F>(selected: &[TemplateCandidate], lookup: F) -> Vec<Question>
where
    F: Fn(&str) -> Result<Vec<Question>, CatalogError>,
{
    let mut out = Vec::new();
    for candidate in selected {
        match lookup(&candidate.id) {
            Ok(questions) => out.extend(questions.into_iter().map(|mut q| {
                if q.template_id.is_empty() {
                    q.template_id.clone_from(&candidate.id);
                }
                q
            })),
            Err(e) => tracing::warn!(template = %candidate.id, error = %e, "question lookup failed"),
        }
    }
    out
}

/// Priority tier of a question
#[must_use]
pub fn priority(question: &Question) -> PriorityTier {
    if question.mandatory {
        PriorityTier::Essential
    } else if IMPORTANT_CATEGORIES
        .iter()
        .any(|c| question.category.eq_ignore_ascii_case(c))
    {
        PriorityTier::Important
    } else if !question.depends_on.is_empty() {
        PriorityTier::Conditional
    } else {
        PriorityTier::Optional
    }
}

/// Relevance of a question to a profile, in `[0, 1]`
#[must_use]
pub fn relevance(question: &Question, profile: &TechnicalProfile) -> f64 {
    let mut tenths = BASE_RELEVANCE;
    if question
        .category
        .eq_ignore_ascii_case(profile.typology.as_str())
    {
        tenths += TYPOLOGY_RELEVANCE;
    }
    let motivated = profile.motivation.as_deref().is_some_and(|m| {
        let m = m.to_lowercase();
        question
            .motivations
            .iter()
            .any(|tag| !tag.is_empty() && m.contains(&tag.to_lowercase()))
    });
    if motivated {
        tenths += MOTIVATION_RELEVANCE;
    }
    f64::from(tenths.min(10)) / 10.0
}

fn score(question: Question, profile: &TechnicalProfile) -> OptimizedQuestion {
    OptimizedQuestion {
        priority: priority(&question),
        relevance_score: relevance(&question, profile),
        id: question.id,
        template_id: question.template_id,
        text: question.text,
        input_type: question.input_type,
        category: question.category,
        estimated_seconds: question.estimated_seconds,
        depends_on: question.depends_on,
    }
}

/// Duplicate signature of a question
#[must_use]
fn signature(question: &OptimizedQuestion) -> Signature {
    let lead: String = question
        .text
        .trim()
        .chars()
        .take(SIGNATURE_TEXT_CHARS)
        .collect();
    (
        question.category.to_lowercase(),
        question.input_type,
        lead.to_lowercase(),
    )
}

/// Keep one question per signature and per id
///
/// The survivor is the most relevant entry (the first on ties) and inherits
/// the dependencies of the entries it replaces. A question whose signature
/// and id point at two different survivors folds them into one. Dependencies
/// on a dropped duplicate are redirected to its survivor; dependencies on
/// questions outside the set are dropped.
fn dedup(questions: Vec<OptimizedQuestion>) -> Vec<OptimizedQuestion> {
    let mut slots: Vec<Option<OptimizedQuestion>> = Vec::with_capacity(questions.len());
    let mut by_signature: BTreeMap<Signature, usize> = BTreeMap::new();
    let mut by_id: BTreeMap<String, usize> = BTreeMap::new();
    let mut aliases: BTreeMap<String, String> = BTreeMap::new();

    for question in questions {
        let incoming_signature = signature(&question);
        let incoming_id = question.id.clone();
        let by_sig = by_signature.get(&incoming_signature).copied();
        let by_key = by_id.get(&incoming_id).copied();

        let slot = match (by_sig, by_key) {
            (None, None) => {
                slots.push(Some(question));
                slots.len() - 1
            }
            (Some(a), Some(b)) if a != b => {
                let (keep, fold) = (a.min(b), a.max(b));
                if let Some(folded) = slots[fold].take() {
                    if let Some(current) = slots[keep].as_mut() {
                        absorb(current, folded, &mut aliases);
                    }
                }
                for target in by_signature.values_mut().chain(by_id.values_mut()) {
                    if *target == fold {
                        *target = keep;
                    }
                }
                if let Some(current) = slots[keep].as_mut() {
                    absorb(current, question, &mut aliases);
                }
                keep
            }
            (Some(slot), _) | (None, Some(slot)) => {
                if let Some(current) = slots[slot].as_mut() {
                    absorb(current, question, &mut aliases);
                }
                slot
            }
        };

        by_signature.insert(incoming_signature, slot);
        by_id.insert(incoming_id, slot);
        if let Some(current) = slots[slot].as_ref() {
            by_signature.insert(signature(current), slot);
            by_id.insert(current.id.clone(), slot);
        }
    }

    let mut kept: Vec<OptimizedQuestion> = slots.into_iter().flatten().collect();
    let present: BTreeSet<String> = kept.iter().map(|q| q.id.clone()).collect();
    for question in &mut kept {
        let mut resolved = Vec::with_capacity(question.depends_on.len());
        for dep in &question.depends_on {
            let target = survivor(&aliases, dep);
            if target == &question.id || resolved.contains(target) {
                continue;
            }
            if present.contains(target) {
                resolved.push(target.clone());
            } else {
                tracing::debug!(question = %question.id, dependency = %dep, "dependency outside question set dropped");
            }
        }
        question.depends_on = resolved;
    }
    kept
}

/// Merge `incoming` into `current`, keeping the more relevant of the two
fn absorb(
    current: &mut OptimizedQuestion,
    incoming: OptimizedQuestion,
    aliases: &mut BTreeMap<String, String>,
) {
    let loser = if incoming.relevance_score > current.relevance_score {
        std::mem::replace(current, incoming)
    } else {
        incoming
    };
    for dep in loser.depends_on {
        if !current.depends_on.contains(&dep) {
            current.depends_on.push(dep);
        }
    }
    if loser.id != current.id {
        aliases.insert(loser.id, current.id.clone());
    }
    aliases.remove(&current.id);
}

/// Follow alias redirections to the surviving id
fn survivor<'a>(aliases: &'a BTreeMap<String, String>, id: &'a String) -> &'a String {
    let mut target = id;
    for _ in 0..=aliases.len() {
        match aliases.get(target) {
            Some(next) => target = next,
            None => break,
        }
    }
    target
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

struct Walk<'a> {
    questions: &'a [OptimizedQuestion],
    index: BTreeMap<&'a str, usize>,
    marks: Vec<Mark>,
    order: Vec<usize>,
    broken: Vec<BrokenDependency>,
}

impl Walk<'_> {
    fn visit(&mut self, at: usize) {
        if self.marks[at] != Mark::Unvisited {
            return;
        }
        self.marks[at] = Mark::InProgress;

        let questions = self.questions;
        for dep in &questions[at].depends_on {
            let Some(&next) = self.index.get(dep.as_str()) else {
                continue;
            };
            match self.marks[next] {
                Mark::Done => {}
                Mark::Unvisited => self.visit(next),
                Mark::InProgress => {
                    tracing::warn!(
                        question = %questions[at].id,
                        dependency = %dep,
                        "question dependency cycle, skipping back-edge"
                    );
                    self.broken.push(BrokenDependency {
                        question: questions[at].id.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        self.marks[at] = Mark::Done;
        self.order.push(at);
    }
}

/// Depth-first dependency order over a pre-sorted question list
fn order(questions: Vec<OptimizedQuestion>) -> (Vec<OptimizedQuestion>, Vec<BrokenDependency>) {
    let (order, broken) = {
        let mut walk = Walk {
            questions: &questions,
            index: questions
                .iter()
                .enumerate()
                .map(|(i, q)| (q.id.as_str(), i))
                .collect(),
            marks: vec![Mark::Unvisited; questions.len()],
            order: Vec::with_capacity(questions.len()),
            broken: Vec::new(),
        };
        for at in 0..questions.len() {
            walk.visit(at);
        }
        (walk.order, walk.broken)
    };

    let mut slots: Vec<Option<OptimizedQuestion>> = questions.into_iter().map(Some).collect();
    let ordered = order.into_iter().filter_map(|i| slots[i].take()).collect();
    (ordered, broken)
}

/// Fixed questions asked when the catalog yields none
#[must_use]
pub fn fallback_questions() -> Vec<OptimizedQuestion> {
    vec![
        OptimizedQuestion {
            id: "budget".to_string(),
            template_id: String::new(),
            text: "Qual é o orçamento disponível para o projeto?".to_string(),
            input_type: InputType::Currency,
            category: "budget".to_string(),
            priority: PriorityTier::Essential,
            relevance_score: 1.0,
            estimated_seconds: 30,
            depends_on: Vec::new(),
        },
        OptimizedQuestion {
            id: "timeframe".to_string(),
            template_id: String::new(),
            text: "Em quanto tempo o projeto precisa estar concluído?".to_string(),
            input_type: InputType::Text,
            category: "schedule".to_string(),
            priority: PriorityTier::Essential,
            relevance_score: 1.0,
            estimated_seconds: 20,
            depends_on: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_profile::Typology;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn candidate(id: &str) -> TemplateCandidate {
        TemplateCandidate {
            id: id.to_string(),
            name: id.to_string(),
            category: "architecture".to_string(),
            score: 0.9,
            task_count: 0,
        }
    }

    fn plan_for(questions: Vec<Question>) -> QuestionPlan {
        QuestionOptimizer::new().optimize(
            &[candidate("t")],
            move |_| Ok(questions.clone()),
            &TechnicalProfile::minimal(Typology::Residential),
            &AnswerMap::new(),
        )
    }

    #[test]
    fn dependency_chain_is_resolved_in_order() {
        let plan = plan_for(vec![
            Question::new("q3", "Terceira").depends_on("q2"),
            Question::new("q1", "Primeira"),
            Question::new("q2", "Segunda").depends_on("q1"),
        ]);

        assert_eq!(plan.ids().collect::<Vec<_>>(), ["q1", "q2", "q3"]);
        assert!(plan.broken_dependencies.is_empty());
        assert!(!plan.used_fallback);
    }

    #[test]
    fn tiers_follow_source_markers() {
        assert_eq!(priority(&Question::new("a", "x").mandatory()), PriorityTier::Essential);
        assert_eq!(priority(&Question::new("a", "x").category("budget")), PriorityTier::Important);
        assert_eq!(priority(&Question::new("a", "x").category("Prazo")), PriorityTier::Important);
        assert_eq!(priority(&Question::new("a", "x").depends_on("b")), PriorityTier::Conditional);
        assert_eq!(priority(&Question::new("a", "x")), PriorityTier::Optional);
    }

    #[test]
    fn relevance_rewards_typology_and_motivation() {
        let mut profile = TechnicalProfile::minimal(Typology::Commercial);
        profile.motivation = Some("expansão do negócio".to_string());

        assert_eq!(relevance(&Question::new("a", "x"), &profile), 0.5);
        assert_eq!(relevance(&Question::new("a", "x").category("commercial"), &profile), 0.8);
        assert_eq!(
            relevance(
                &Question::new("a", "x").category("commercial").motivation("Expansão"),
                &profile
            ),
            1.0
        );
    }

    #[test]
    fn higher_tiers_come_first() {
        let plan = plan_for(vec![
            Question::new("opt", "Cor preferida?"),
            Question::new("must", "Endereço do terreno?").mandatory(),
            Question::new("money", "Orçamento?").category("budget"),
        ]);
        assert_eq!(plan.ids().collect::<Vec<_>>(), ["must", "money", "opt"]);
    }

    #[test]
    fn duplicates_collapse_to_most_relevant() {
        let profile = TechnicalProfile::minimal(Typology::Residential);
        let questions = vec![
            Question::new("a1", "Quantos quartos?").category("residential").template("t1"),
            Question::new("a2", "Quantos quartos?").category("residential").template("t2").motivation("família"),
            Question::new("b", "Suíte master?").depends_on("a1"),
        ];
        let mut profile = profile;
        profile.motivation = Some("família cresceu".to_string());

        let plan = QuestionOptimizer::new().optimize(
            &[candidate("t")],
            |_| Ok(questions.clone()),
            &profile,
            &AnswerMap::new(),
        );

        assert_eq!(plan.ids().collect::<Vec<_>>(), ["a2", "b"]);
        assert_eq!(plan.questions[1].depends_on, ["a2"]);
    }

    #[test]
    fn same_id_from_two_templates_is_asked_once() {
        let plan = QuestionOptimizer::new().optimize(
            &[candidate("t1"), candidate("t2")],
            |_| Ok(vec![Question::new("area", "Qual a área?")]),
            &TechnicalProfile::minimal(Typology::Residential),
            &AnswerMap::new(),
        );
        assert_eq!(plan.questions.len(), 1);
        assert_eq!(plan.questions[0].template_id, "t1");
    }

    #[test]
    fn question_matching_two_survivors_folds_them() {
        let mut profile = TechnicalProfile::minimal(Typology::Residential);
        profile.motivation = Some("familia".to_string());
        let questions = vec![
            Question::new("q", "Texto X?"),
            Question::new("p", "Texto Y?"),
            Question::new("q", "Texto Y?").motivation("familia"),
            Question::new("r", "Depois?").depends_on("p"),
        ];

        let plan = QuestionOptimizer::new().optimize(
            &[candidate("t")],
            |_| Ok(questions.clone()),
            &profile,
            &AnswerMap::new(),
        );

        assert_eq!(plan.ids().collect::<Vec<_>>(), ["q", "r"]);
        assert_eq!(plan.questions[0].text, "Texto Y?");
        assert_eq!(plan.questions[1].depends_on, ["q"]);
    }

    #[test]
    fn cycles_are_broken_not_dropped() {
        let plan = plan_for(vec![
            Question::new("a", "A?").depends_on("b"),
            Question::new("b", "B?").depends_on("c"),
            Question::new("c", "C?").depends_on("a"),
        ]);

        assert_eq!(plan.questions.len(), 3);
        assert_eq!(
            plan.broken_dependencies,
            [BrokenDependency {
                question: "c".into(),
                dependency: "a".into()
            }]
        );
        assert_eq!(plan.ids().collect::<Vec<_>>(), ["c", "b", "a"]);
    }

    #[test]
    fn answered_questions_are_removed() {
        let questions = vec![Question::new("quartos", "Quantos quartos?"), Question::new("cor", "Cor?")];
        let plan = QuestionOptimizer::new().optimize(
            &[candidate("t")],
            |_| Ok(questions.clone()),
            &TechnicalProfile::minimal(Typology::Residential),
            &AnswerMap::new().with("quartos", 3.0),
        );
        assert_eq!(plan.ids().collect::<Vec<_>>(), ["cor"]);
        assert_eq!(plan.total_estimated_seconds, 30);
    }

    #[test]
    fn failed_lookups_fall_back() {
        let plan = QuestionOptimizer::new().optimize(
            &[candidate("t")],
            |id| Err(CatalogError::UnknownTemplate(id.to_string())),
            &TechnicalProfile::minimal(Typology::Residential),
            &AnswerMap::new(),
        );
        assert!(plan.used_fallback);
        assert_eq!(plan.ids().collect::<Vec<_>>(), ["budget", "timeframe"]);
        assert!(plan.questions.iter().all(|q| q.priority == PriorityTier::Essential));
        assert_eq!(plan.total_estimated_seconds, 50);
    }

    #[test]
    fn nothing_selected_falls_back() {
        let plan = QuestionOptimizer::new().optimize(
            &[],
            |_| Ok(Vec::new()),
            &TechnicalProfile::minimal(Typology::Residential),
            &AnswerMap::new(),
        );
        assert!(plan.used_fallback);
    }

    fn arb_questions() -> impl Strategy<Value = Vec<Question>> {
        (1usize..15).prop_flat_map(|n| {
            proptest::collection::vec(
                (
                    proptest::collection::vec(0..n, 0..3),
                    any::<bool>(),
                    0usize..3,
                ),
                n,
            )
            .prop_map(|specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (deps, mandatory, cat))| {
                        let mut q = Question::new(format!("q{i}"), format!("Pergunta {i}?"))
                            .category(["budget", "residential", "misc"][cat]);
                        q.mandatory = mandatory;
                        q.depends_on = deps.into_iter().map(|d| format!("q{d}")).collect();
                        q
                    })
                    .collect()
            })
        })
    }

    /// Questions drawn from small id and text pools so both keys collide
    fn arb_colliding() -> impl Strategy<Value = Vec<Question>> {
        proptest::collection::vec(
            (0usize..4, 0usize..4, any::<bool>(), proptest::option::of(0usize..4)),
            0..8,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .map(|(id, text, motivated, dep)| {
                    let mut q = Question::new(format!("q{id}"), format!("Texto {text}?"));
                    if motivated {
                        q = q.motivation("familia");
                    }
                    if let Some(d) = dep {
                        q = q.depends_on(format!("q{d}"));
                    }
                    q
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn ids_and_signatures_stay_unique_across_templates(
            first in arb_colliding(),
            second in arb_colliding(),
        ) {
            let mut profile = TechnicalProfile::minimal(Typology::Residential);
            profile.motivation = Some("familia".to_string());
            let plan = QuestionOptimizer::new().optimize(
                &[candidate("t1"), candidate("t2")],
                |id| Ok(if id == "t1" { first.clone() } else { second.clone() }),
                &profile,
                &AnswerMap::new(),
            );
            if first.is_empty() && second.is_empty() {
                prop_assert!(plan.used_fallback);
                return Ok(());
            }

            let ids: BTreeSet<&str> = plan.ids().collect();
            prop_assert_eq!(ids.len(), plan.questions.len());
            let signatures: BTreeSet<Signature> = plan.questions.iter().map(signature).collect();
            prop_assert_eq!(signatures.len(), plan.questions.len());

            let position: BTreeMap<&str, usize> =
                plan.ids().enumerate().map(|(i, id)| (id, i)).collect();
            for q in &plan.questions {
                for dep in &q.depends_on {
                    prop_assert!(position.contains_key(dep.as_str()));
                }
            }
        }

        #[test]
        fn dependencies_precede_dependents(questions in arb_questions()) {
            let input_len = questions.len();
            let plan = plan_for(questions);
            let position: BTreeMap<&str, usize> =
                plan.ids().enumerate().map(|(i, id)| (id, i)).collect();

            prop_assert_eq!(plan.questions.len(), input_len);
            prop_assert_eq!(position.len(), input_len);

            let broken: BTreeSet<(&str, &str)> = plan
                .broken_dependencies
                .iter()
                .map(|b| (b.question.as_str(), b.dependency.as_str()))
                .collect();
            for q in &plan.questions {
                for dep in &q.depends_on {
                    if broken.contains(&(q.id.as_str(), dep.as_str())) {
                        continue;
                    }
                    prop_assert!(position[dep.as_str()] < position[q.id.as_str()]);
                }
            }

            let signatures: BTreeSet<Signature> = plan.questions.iter().map(signature).collect();
            prop_assert_eq!(signatures.len(), plan.questions.len());
        }
    }
}
