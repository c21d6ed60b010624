//! Task-tree composition
//!
//! Merges the task trees of the selected templates into one plan. Tasks that
//! appear in several templates are merged by id, keeping the larger hour
//! estimate and the union of dependencies. The merged tasks are ordered so
//! that every task follows its dependencies; among tasks that are ready at
//! the same time, the smaller id goes first.

use crate::error::{CatalogError, Result};
use crate::model::TemplateDefinition;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Discipline bucket for tasks that name none
pub const UNASSIGNED_DISCIPLINE: &str = "general";

/// Task after merging across templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedTask {
    /// Task id
    pub id: String,
    /// Display name, from the first template that defines the task
    pub name: String,
    /// Union of disciplines
    pub disciplines: BTreeSet<String>,
    /// Largest hour estimate among the merged definitions
    pub hours: f64,
    /// Union of dependencies present in the plan
    pub depends_on: BTreeSet<String>,
    /// Templates that define the task
    pub templates: BTreeSet<String>,
}

/// Merged, ordered task plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposedPlan {
    /// Composed templates, in input order
    pub template_ids: Vec<String>,
    /// Tasks in dependency order
    pub tasks: Vec<ComposedTask>,
    /// Sum of task hours
    pub total_hours: f64,
    /// Hours per discipline; a multi-discipline task is split evenly
    pub hours_by_discipline: BTreeMap<String, f64>,
}

/// Task-tree merger
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateComposer;

impl TemplateComposer {
    /// Create a composer
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compose the task trees of `templates`
    ///
    /// # Errors
    /// [`CatalogError::CyclicTasks`] when the merged dependencies form a cycle.
    pub fn compose(&self, templates: &[&TemplateDefinition]) -> Result<ComposedPlan> {
        let mut tasks: BTreeMap<String, ComposedTask> = BTreeMap::new();
        for template in templates {
            for task in &template.tasks {
                let merged = tasks.entry(task.id.clone()).or_insert_with(|| ComposedTask {
                    id: task.id.clone(),
                    name: task.name.clone(),
                    disciplines: BTreeSet::new(),
                    hours: 0.0,
                    depends_on: BTreeSet::new(),
                    templates: BTreeSet::new(),
                });
                merged.hours = merged.hours.max(task.hours);
                merged.disciplines.extend(task.disciplines.iter().cloned());
                merged.depends_on.extend(task.depends_on.iter().cloned());
                merged.templates.insert(template.id.clone());
            }
        }

        let known: BTreeSet<String> = tasks.keys().cloned().collect();
        for task in tasks.values_mut() {
            task.depends_on.retain(|dep| {
                let keep = known.contains(dep) && dep != &task.id;
                if !keep {
                    tracing::debug!(task = %task.id, dependency = %dep, "dropping dependency outside the plan");
                }
                keep
            });
        }

        let order = ordered_ids(&tasks)?;
        let mut ordered = Vec::with_capacity(order.len());
        for id in order {
            if let Some(task) = tasks.remove(&id) {
                ordered.push(task);
            }
        }

        let mut hours_by_discipline: BTreeMap<String, f64> = BTreeMap::new();
        let mut total_hours = 0.0;
        for task in &ordered {
            total_hours += task.hours;
            if task.disciplines.is_empty() {
                *hours_by_discipline
                    .entry(UNASSIGNED_DISCIPLINE.to_string())
                    .or_default() += task.hours;
                continue;
            }
            let share = task.hours / f64::from(u32::try_from(task.disciplines.len()).unwrap_or(u32::MAX));
            for discipline in &task.disciplines {
                *hours_by_discipline.entry(discipline.clone()).or_default() += share;
            }
        }

        tracing::debug!(
            templates = templates.len(),
            tasks = ordered.len(),
            total_hours,
            "composed task plan"
        );

        Ok(ComposedPlan {
            template_ids: templates.iter().map(|t| t.id.clone()).collect(),
            tasks: ordered,
            total_hours,
            hours_by_discipline,
        })
    }
}

/// Dependency order with smallest-id tie breaking
fn ordered_ids(tasks: &BTreeMap<String, ComposedTask>) -> Result<Vec<String>> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for (id, task) in tasks {
        graph.add_node(id.as_str());
        for dep in &task.depends_on {
            graph.add_edge(dep.as_str(), id.as_str(), ());
        }
    }

    if let Err(cycle) = toposort(&graph, None) {
        return Err(CatalogError::CyclicTasks {
            task: cycle.node_id().to_string(),
        });
    }

    let mut pending: BTreeMap<&str, usize> = graph
        .nodes()
        .map(|n| (n, graph.neighbors_directed(n, Direction::Incoming).count()))
        .collect();
    let mut ready: BTreeSet<&str> = pending
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(n, _)| *n)
        .collect();

    let mut order = Vec::with_capacity(pending.len());
    while let Some(next) = ready.pop_first() {
        order.push(next.to_string());
        for succ in graph.neighbors_directed(next, Direction::Outgoing) {
            if let Some(degree) = pending.get_mut(succ) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(succ);
                }
            }
        }
    }
    Ok(order)
}
