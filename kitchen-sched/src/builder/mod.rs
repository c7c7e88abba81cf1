/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Task model builder: raw recipes → validated task graph.
//!
//! The graph is an arena of recipe chains indexed by insertion order.  Each
//! chain is one precedence chain; there are no cross-recipe edges and no
//! back-references, so the scheduler walks it with plain `usize` cursors.

pub mod equipment;

pub use equipment::EquipmentMap;

use std::collections::HashSet;

use tracing::debug;

use crate::error::{InputDefect, SchedulerError};
use crate::task::{RecipeInput, Seconds, Task};

// ── TaskGraph ─────────────────────────────────────────────────────────────────

/// One recipe's tasks in `sequence_index` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeChain {
    pub id: String,
    pub tag: String,
    pub tasks: Vec<Task>,
}

impl RecipeChain {
    /// Sum of the chain's durations — the time its own precedence forces.
    pub fn serial_seconds(&self) -> Seconds {
        self.tasks
            .iter()
            .fold(0, |acc: Seconds, t| acc.saturating_add(t.duration_seconds))
    }
}

/// Validated input for one scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskGraph {
    recipes: Vec<RecipeChain>,
}

impl TaskGraph {
    /// Recipe chains in insertion order.
    pub fn recipes(&self) -> &[RecipeChain] {
        &self.recipes
    }

    /// Flat task list: recipes in insertion order, steps in sequence order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.recipes.iter().flat_map(|r| r.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.recipes.iter().map(|r| r.tasks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.task_count() == 0
    }

    /// Task at `sequence_index` of the recipe at `recipe_index`.
    pub fn task(&self, recipe_index: usize, sequence_index: usize) -> Option<&Task> {
        self.recipes.get(recipe_index)?.tasks.get(sequence_index)
    }
}

// ── TaskModelBuilder ──────────────────────────────────────────────────────────

/// Normalises raw recipe records into a [`TaskGraph`].
#[derive(Debug, Clone, Default)]
pub struct TaskModelBuilder {
    equipment: EquipmentMap,
}

impl TaskModelBuilder {
    pub fn new(equipment: EquipmentMap) -> Self {
        Self { equipment }
    }

    pub fn equipment(&self) -> &EquipmentMap {
        &self.equipment
    }

    /// Validates `recipes` and assigns sequence indices from the caller's
    /// step order (never re-sorted).
    ///
    /// # Errors
    /// [`SchedulerError::InvalidInput`] for the first defect found, in
    /// recipe-then-step order.  A present-but-empty step list is not a defect.
    pub fn build(&self, recipes: &[RecipeInput]) -> Result<TaskGraph, SchedulerError> {
        let mut recipe_ids: HashSet<&str> = HashSet::new();
        let mut task_ids: HashSet<String> = HashSet::new();
        let mut chains = Vec::with_capacity(recipes.len());
        // every start and end time the scheduler produces is bounded by this
        let mut total: Seconds = 0;

        for (recipe_index, recipe) in recipes.iter().enumerate() {
            if recipe.id.trim().is_empty() {
                return Err(SchedulerError::invalid(
                    format!("#{recipe_index}"),
                    InputDefect::EmptyRecipeId,
                ));
            }
            if !recipe_ids.insert(recipe.id.as_str()) {
                return Err(SchedulerError::invalid(
                    &recipe.id,
                    InputDefect::DuplicateRecipeId,
                ));
            }

            let steps = recipe
                .steps
                .as_ref()
                .ok_or_else(|| SchedulerError::invalid(&recipe.id, InputDefect::MissingSteps))?;

            let mut tasks = Vec::with_capacity(steps.len());
            for (sequence_index, step) in steps.iter().enumerate() {
                let id = step
                    .id
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}#{}", recipe.id, sequence_index));

                let duration = step.duration_seconds.ok_or_else(|| {
                    SchedulerError::invalid(
                        &recipe.id,
                        InputDefect::MissingDuration { step: id.clone() },
                    )
                })?;
                if duration < 0 {
                    return Err(SchedulerError::invalid(
                        &recipe.id,
                        InputDefect::NegativeDuration {
                            step: id,
                            duration_seconds: duration,
                        },
                    ));
                }

                total = total.checked_add(duration as Seconds).ok_or_else(|| {
                    SchedulerError::invalid(
                        &recipe.id,
                        InputDefect::DurationOverflow { step: id.clone() },
                    )
                })?;

                if !task_ids.insert(id.clone()) {
                    return Err(SchedulerError::invalid(
                        &recipe.id,
                        InputDefect::DuplicateTaskId { step: id },
                    ));
                }

                let resource_class = step
                    .equipment
                    .as_deref()
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(|tag| self.equipment.resolve(tag));

                debug!(
                    recipe = %recipe.id,
                    task = %id,
                    seq = sequence_index,
                    duration_s = duration,
                    attention = step.requires_attention,
                    class = ?resource_class,
                    "task normalised"
                );

                tasks.push(Task {
                    id,
                    recipe_id: recipe.id.clone(),
                    recipe_index,
                    sequence_index,
                    duration_seconds: duration as Seconds,
                    requires_attention: step.requires_attention,
                    resource_class,
                    label: step.label.clone(),
                    recipe_tag: recipe.tag.clone(),
                });
            }

            chains.push(RecipeChain {
                id: recipe.id.clone(),
                tag: recipe.tag.clone(),
                tasks,
            });
        }

        Ok(TaskGraph { recipes: chains })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
