/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Greedy list scheduler for kitchen tasks.
//!
//! [`KitchenScheduler`] places every task of a set of recipes on a shared
//! kitchen — burners, ovens, boards and the cook's own attention — and returns
//! a [`Timeline`] of [`ScheduledBlock`]s.
//!
//! # Algorithm
//! Deterministic earliest-start list scheduling:
//!
//! 1. One cursor per recipe, pointing at its next unscheduled task.  The
//!    cursor tasks are the *ready set*.
//! 2. For every ready task compute
//!    `start = max(predecessor end, equipment free, attention free)`.
//! 3. Pick the ready task with the smallest `start`; ties go to the lower
//!    `sequence_index`, then to the lower recipe insertion index.
//! 4. Bind it to the chosen equipment / attention instances, advance those
//!    instances to its end time, advance its recipe's cursor.
//! 5. Repeat until every cursor is exhausted.
//!
//! Because attention capacity is normally 1, every active step across all
//! recipes is serialised on the cook while passive steps (baking, simmering)
//! run in the background.
//!
//! # Design decisions
//!
//! | Topic | Choice |
//! |---|---|
//! | State | Stateless `schedule()` — pool, cursors and blocks are local to the call |
//! | Iteration order | `BTreeMap` capacities + `Vec` arena — no hash-order dependence |
//! | Starvation | Static check before the loop, so the loop is total |
//! | Thread safety | `Send + Sync`; run as many calls in parallel as needed |
//! | Optimality | Greedy heuristic, not an exact RCPSP solver |
//!
//! # Example
//! ```rust
//! use kitchen_sched::pool::Capacities;
//! use kitchen_sched::scheduler::KitchenScheduler;
//! use kitchen_sched::task::{RawStep, RecipeInput};
//!
//! let capacities: Capacities = [("attention".to_string(), 1)].into_iter().collect();
//! let scheduler = KitchenScheduler::new(capacities);
//!
//! let recipes = vec![RecipeInput::new(
//!     "toast",
//!     vec![RawStep::new("slice", 60).active(), RawStep::new("toast", 120)],
//! )];
//! let timeline = scheduler.schedule(&recipes).unwrap();
//! assert_eq!(timeline.makespan(), 180);
//! ```

pub mod feasibility;

use tracing::{debug, error, info, warn};

use crate::builder::{EquipmentMap, TaskGraph, TaskModelBuilder};
use crate::error::SchedulerError;
use crate::pool::{Capacities, InstanceSlot, ResourcePool};
use crate::task::{RecipeInput, Seconds, Task, ATTENTION};
use crate::timeline::{EquipmentBinding, ScheduledBlock, Timeline};

use feasibility::{check_lower_bound, find_starved_class, serial_lower_bound, serial_sum};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Attention capacity used when the capacity map has no `attention` entry.
pub const DEFAULT_ATTENTION_CAPACITY: u32 = 1;

// ── Internal state types ──────────────────────────────────────────────────────

/// Per-recipe progress, indexed by recipe insertion order.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    /// Next unscheduled `sequence_index`.
    next: usize,
    /// End time of the last scheduled task of the recipe (0 before the first).
    ready_at: Seconds,
}

/// The evaluated placement of one ready task.
#[derive(Debug)]
struct Candidate<'g> {
    task: &'g Task,
    start: Seconds,
    equipment: Option<(&'g str, InstanceSlot)>,
    attention: Option<InstanceSlot>,
}

impl Candidate<'_> {
    /// Total selection order: start, then sequence index, then recipe.
    fn priority(&self) -> (Seconds, usize, usize) {
        (self.start, self.task.sequence_index, self.task.recipe_index)
    }
}

// ── KitchenScheduler ──────────────────────────────────────────────────────────

/// The kitchen scheduler.
///
/// Holds only immutable configuration (capacities and the equipment lookup
/// table).  All per-run state is allocated inside
/// [`schedule()`](Self::schedule) and dropped at the end of the call.
#[derive(Debug, Clone)]
pub struct KitchenScheduler {
    capacities: Capacities,
    builder: TaskModelBuilder,
}

impl KitchenScheduler {
    /// Create a scheduler for a kitchen with the given capacities.
    ///
    /// A missing `attention` entry is filled with
    /// [`DEFAULT_ATTENTION_CAPACITY`]: there is always a cook.
    pub fn new(mut capacities: Capacities) -> Self {
        if !capacities.contains_key(ATTENTION) {
            warn!(
                default = DEFAULT_ATTENTION_CAPACITY,
                "capacity map has no '{}' entry, assuming a single cook", ATTENTION
            );
            capacities.insert(ATTENTION.to_string(), DEFAULT_ATTENTION_CAPACITY);
        }
        Self {
            capacities,
            builder: TaskModelBuilder::default(),
        }
    }

    /// Use `equipment` to resolve step equipment tags to resource classes.
    pub fn with_equipment(mut self, equipment: EquipmentMap) -> Self {
        self.builder = TaskModelBuilder::new(equipment);
        self
    }

    pub fn capacities(&self) -> &Capacities {
        &self.capacities
    }

    pub fn equipment(&self) -> &EquipmentMap {
        self.builder.equipment()
    }

    // ── Public entry points ───────────────────────────────────────────────────

    /// Normalise `recipes` and schedule them.
    ///
    /// # Errors
    /// * [`SchedulerError::InvalidInput`] — malformed recipe/step data.
    /// * [`SchedulerError::ResourceStarvation`] — a task needs a class with
    ///   zero capacity.
    pub fn schedule(&self, recipes: &[RecipeInput]) -> Result<Timeline, SchedulerError> {
        let graph = self.builder.build(recipes)?;
        self.schedule_graph(&graph)
    }

    /// Schedule an already-built task graph.
    pub fn schedule_graph(&self, graph: &TaskGraph) -> Result<Timeline, SchedulerError> {
        // ── Preconditions ─────────────────────────────────────────────────────
        if let Some((class, task)) = find_starved_class(graph, &self.capacities) {
            error!(class = %class, task = %task.id, "resource class has zero capacity");
            return Err(SchedulerError::ResourceStarvation {
                class: class.to_string(),
                task: task.id.clone(),
            });
        }

        // ── Per-call state ────────────────────────────────────────────────────
        let mut pool = ResourcePool::new(&self.capacities);
        let mut cursors = vec![Cursor::default(); graph.recipes().len()];
        let mut blocks = Vec::with_capacity(graph.task_count());

        info!(
            recipe_count = graph.recipes().len(),
            task_count = graph.task_count(),
            classes = ?self.capacities,
            "=== KitchenScheduler::schedule() ==="
        );

        // ── Main loop: one block per iteration ────────────────────────────────
        while let Some(pick) = Self::select_next(graph, &cursors, &pool)? {
            let task = pick.task;
            let end = pick.start + task.duration_seconds;

            if let Some((class, slot)) = pick.equipment {
                pool.reserve(class, slot, pick.start, end);
            }
            if let Some(slot) = pick.attention {
                pool.reserve(ATTENTION, slot, pick.start, end);
            }

            let cursor = &mut cursors[task.recipe_index];
            cursor.next += 1;
            cursor.ready_at = end;

            info!(
                task = %task.id,
                recipe = %task.recipe_id,
                start = pick.start,
                end = end,
                equipment = ?pick.equipment,
                attention = ?pick.attention,
                "✓ scheduled"
            );

            blocks.push(ScheduledBlock {
                task: task.clone(),
                start: pick.start,
                end,
                equipment: pick.equipment.map(|(class, slot)| EquipmentBinding {
                    class: class.to_string(),
                    slot,
                }),
                attention_instance: pick.attention.and_then(InstanceSlot::index),
            });
        }

        let timeline = Timeline::assemble(blocks);

        // ── Post-schedule: serial bounds report ───────────────────────────────
        Self::report_bounds(graph, &timeline);

        Ok(timeline)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Evaluate every recipe's cursor task and return the one to place next,
    /// or `None` once every recipe is exhausted.
    fn select_next<'g>(
        graph: &'g TaskGraph,
        cursors: &[Cursor],
        pool: &ResourcePool,
    ) -> Result<Option<Candidate<'g>>, SchedulerError> {
        let mut best: Option<Candidate<'g>> = None;

        for (recipe_index, cursor) in cursors.iter().enumerate() {
            let Some(task) = graph.task(recipe_index, cursor.next) else {
                continue; // recipe exhausted
            };
            let candidate = Self::evaluate(task, cursor.ready_at, pool)?;

            debug!(
                task = %task.id,
                earliest_start = candidate.start,
                predecessor_ready = cursor.ready_at,
                "candidate"
            );

            if best
                .as_ref()
                .map_or(true, |b| candidate.priority() < b.priority())
            {
                best = Some(candidate);
            }
        }

        Ok(best)
    }

    /// Earliest feasible start of `task` given its predecessor's end time and
    /// the current instance availability.
    fn evaluate<'g>(
        task: &'g Task,
        predecessor_ready_at: Seconds,
        pool: &ResourcePool,
    ) -> Result<Candidate<'g>, SchedulerError> {
        let equipment = match task.resource_class.as_deref() {
            Some(class) => {
                let (free_at, slot) = Self::earliest(pool, class, task)?;
                Some((class, free_at, slot))
            }
            None => None,
        };
        let attention = if task.requires_attention {
            Some(Self::earliest(pool, ATTENTION, task)?)
        } else {
            None
        };

        let start = predecessor_ready_at
            .max(equipment.map_or(0, |(_, t, _)| t))
            .max(attention.map_or(0, |(t, _)| t));

        Ok(Candidate {
            task,
            start,
            equipment: equipment.map(|(class, _, slot)| (class, slot)),
            attention: attention.map(|(_, slot)| slot),
        })
    }

    /// [`ResourcePool::earliest_available`], with a zero-instance class
    /// reported as starvation.  The up-front check makes that unreachable.
    fn earliest(
        pool: &ResourcePool,
        class: &str,
        task: &Task,
    ) -> Result<(Seconds, InstanceSlot), SchedulerError> {
        pool.earliest_available(class)
            .ok_or_else(|| SchedulerError::ResourceStarvation {
                class: class.to_string(),
                task: task.id.clone(),
            })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Post-schedule helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn report_bounds(graph: &TaskGraph, timeline: &Timeline) {
        let makespan = timeline.makespan();
        if let Some(bound) = check_lower_bound(makespan, graph) {
            error!(
                makespan = makespan,
                lower_bound = bound,
                "makespan is below the longest recipe — timeline is inconsistent"
            );
        }
        info!(
            blocks = timeline.len(),
            makespan = makespan,
            lower_bound = serial_lower_bound(graph),
            serial_sum = serial_sum(graph),
            "=== Scheduling complete ==="
        );
    }
}

/// Schedule `recipes` on a kitchen with `capacities`, using an identity
/// equipment mapping.
///
/// Shorthand for `KitchenScheduler::new(capacities).schedule(recipes)`.
pub fn schedule(
    recipes: &[RecipeInput],
    capacities: Capacities,
) -> Result<Timeline, SchedulerError> {
    KitchenScheduler::new(capacities).schedule(recipes)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputDefect;
    use crate::task::RawStep;

    // ── Test helpers ──────────────────────────────────────────────────────────

    fn caps(entries: &[(&str, u32)]) -> Capacities {
        entries.iter().map(|&(c, n)| (c.to_string(), n)).collect()
    }

    fn span(tl: &Timeline, id: &str) -> (Seconds, Seconds) {
        let b = tl
            .block_for_task(id)
            .unwrap_or_else(|| panic!("no block for {id}"));
        (b.start, b.end)
    }

    /// Recipe A: A1(60s, board, attention) → A2(120s, stove, attention)
    /// Recipe B: B1(90s, board, attention) → B2(60s, oven, passive)
    fn bottleneck_recipes() -> Vec<RecipeInput> {
        vec![
            RecipeInput::new(
                "A",
                vec![
                    RawStep::new("A1", 60).with_id("A1").with_equipment("board").active(),
                    RawStep::new("A2", 120).with_id("A2").with_equipment("stove").active(),
                ],
            ),
            RecipeInput::new(
                "B",
                vec![
                    RawStep::new("B1", 90).with_id("B1").with_equipment("board").active(),
                    RawStep::new("B2", 60).with_id("B2").with_equipment("oven"),
                ],
            ),
        ]
    }

    // ── Reference scenarios ───────────────────────────────────────────────────

    #[test]
    fn serial_recipe_runs_back_to_back() {
        let recipes = vec![RecipeInput::new(
            "r",
            vec![
                RawStep::new("first", 60).with_id("t1").active(),
                RawStep::new("second", 120).with_id("t2").active(),
            ],
        )];
        let tl = schedule(&recipes, caps(&[(ATTENTION, 1)])).unwrap();

        assert_eq!(span(&tl, "t1"), (0, 60));
        assert_eq!(span(&tl, "t2"), (60, 180));
        assert_eq!(tl.makespan(), 180);
    }

    #[test]
    fn independent_passive_recipes_run_in_parallel() {
        let recipes = vec![
            RecipeInput::new(
                "a",
                vec![RawStep::new("bake", 90).with_id("a1").with_equipment("oven")],
            ),
            RecipeInput::new(
                "b",
                vec![RawStep::new("steam", 90).with_id("b1").with_equipment("steamer")],
            ),
        ];
        let tl = schedule(&recipes, caps(&[(ATTENTION, 1)])).unwrap();

        assert_eq!(span(&tl, "a1"), (0, 90));
        assert_eq!(span(&tl, "b1"), (0, 90));
        assert_eq!(tl.makespan(), 90);
    }

    #[test]
    fn attention_is_the_bottleneck() {
        let tl = schedule(
            &bottleneck_recipes(),
            caps(&[(ATTENTION, 1), ("board", 2), ("stove", 1)]),
        )
        .unwrap();

        assert_eq!(span(&tl, "A1"), (0, 60));
        assert_eq!(span(&tl, "B1"), (60, 150));
        assert_eq!(span(&tl, "A2"), (150, 270));
        assert_eq!(span(&tl, "B2"), (150, 210));
        assert_eq!(tl.makespan(), 270);

        // B1 waited on the cook, not on a board: it got the second board
        let b1 = tl.block_for_task("B1").unwrap();
        assert_eq!(
            b1.equipment,
            Some(EquipmentBinding {
                class: "board".into(),
                slot: InstanceSlot::Index(1),
            })
        );
        assert_eq!(b1.attention_instance, Some(0));

        // the oven is unconstrained: no instance tracked
        let b2 = tl.block_for_task("B2").unwrap();
        assert_eq!(b2.equipment.as_ref().map(|e| e.slot), Some(InstanceSlot::Unbounded));
        assert_eq!(b2.attention_instance, None);

        let graph = TaskModelBuilder::default()
            .build(&bottleneck_recipes())
            .unwrap();
        assert!(tl.verify(&graph).is_empty());
    }

    #[test]
    fn blocks_are_in_creation_order() {
        let tl = schedule(
            &bottleneck_recipes(),
            caps(&[(ATTENTION, 1), ("board", 2), ("stove", 1)]),
        )
        .unwrap();
        let order: Vec<&str> = tl.blocks().iter().map(|b| b.task.id.as_str()).collect();
        assert_eq!(order, vec!["A1", "B1", "A2", "B2"]);
    }

    // ── Tie-breaking ──────────────────────────────────────────────────────────

    #[test]
    fn equal_start_goes_to_earlier_recipe() {
        let recipes = vec![
            RecipeInput::new("first", vec![RawStep::new("x", 30).with_id("x").active()]),
            RecipeInput::new("second", vec![RawStep::new("y", 30).with_id("y").active()]),
        ];
        let tl = schedule(&recipes, caps(&[(ATTENTION, 1)])).unwrap();
        assert_eq!(span(&tl, "x"), (0, 30));
        assert_eq!(span(&tl, "y"), (30, 60));
    }

    #[test]
    fn equal_instances_go_to_lowest_index() {
        let recipes = vec![
            RecipeInput::new("a", vec![RawStep::new("a", 10).with_id("a").with_equipment("stove")]),
            RecipeInput::new("b", vec![RawStep::new("b", 10).with_id("b").with_equipment("stove")]),
        ];
        let tl = schedule(&recipes, caps(&[(ATTENTION, 1), ("stove", 2)])).unwrap();
        let slot = |id| tl.block_for_task(id).unwrap().equipment.as_ref().unwrap().slot;
        assert_eq!(slot("a"), InstanceSlot::Index(0));
        assert_eq!(slot("b"), InstanceSlot::Index(1));
        assert_eq!(tl.makespan(), 10);
    }

    // ── Resources ─────────────────────────────────────────────────────────────

    #[test]
    fn single_stove_serialises_passive_steps() {
        let recipes = vec![
            RecipeInput::new("a", vec![RawStep::new("simmer", 300).with_id("a").with_equipment("stove")]),
            RecipeInput::new("b", vec![RawStep::new("boil", 200).with_id("b").with_equipment("stove")]),
        ];
        let tl = schedule(&recipes, caps(&[(ATTENTION, 1), ("stove", 1)])).unwrap();
        assert_eq!(span(&tl, "a"), (0, 300));
        assert_eq!(span(&tl, "b"), (300, 500));
    }

    #[test]
    fn two_cooks_run_active_steps_in_parallel() {
        let recipes = vec![
            RecipeInput::new("a", vec![RawStep::new("knead", 120).with_id("a").active()]),
            RecipeInput::new("b", vec![RawStep::new("whisk", 120).with_id("b").active()]),
        ];
        let tl = schedule(&recipes, caps(&[(ATTENTION, 2)])).unwrap();
        assert_eq!(span(&tl, "a"), (0, 120));
        assert_eq!(span(&tl, "b"), (0, 120));
        assert_eq!(tl.block_for_task("b").unwrap().attention_instance, Some(1));
        assert_eq!(tl.blocks_for(ATTENTION, 1).len(), 1);
    }

    #[test]
    fn passive_step_does_not_hold_the_cook() {
        let recipes = vec![
            RecipeInput::new("bread", vec![RawStep::new("bake", 600).with_id("bake").with_equipment("oven")]),
            RecipeInput::new("salad", vec![RawStep::new("chop", 60).with_id("chop").active()]),
        ];
        let tl = schedule(&recipes, caps(&[(ATTENTION, 1), ("oven", 1)])).unwrap();
        assert_eq!(span(&tl, "bake"), (0, 600));
        assert_eq!(span(&tl, "chop"), (0, 60));
    }

    #[test]
    fn missing_attention_entry_defaults_to_one_cook() {
        let sched = KitchenScheduler::new(caps(&[("stove", 2)]));
        assert_eq!(sched.capacities().get(ATTENTION), Some(&DEFAULT_ATTENTION_CAPACITY));

        let recipes = vec![
            RecipeInput::new("a", vec![RawStep::new("x", 10).with_id("x").active()]),
            RecipeInput::new("b", vec![RawStep::new("y", 10).with_id("y").active()]),
        ];
        let tl = sched.schedule(&recipes).unwrap();
        assert_eq!(tl.makespan(), 20);
    }

    #[test]
    fn equipment_map_groups_tags_into_one_class() {
        let sched = KitchenScheduler::new(caps(&[(ATTENTION, 1), ("stove", 1)])).with_equipment(
            EquipmentMap::new()
                .with("frying_pan", "stove")
                .with("saucepan", "stove"),
        );
        let recipes = vec![
            RecipeInput::new("a", vec![RawStep::new("fry", 100).with_id("fry").with_equipment("frying_pan")]),
            RecipeInput::new("b", vec![RawStep::new("boil", 100).with_id("boil").with_equipment("saucepan")]),
        ];
        let tl = sched.schedule(&recipes).unwrap();
        assert_eq!(span(&tl, "fry"), (0, 100));
        assert_eq!(span(&tl, "boil"), (100, 200));
        assert_eq!(tl.blocks_for("stove", 0).len(), 2);
    }

    #[test]
    fn zero_duration_steps_do_not_block() {
        let recipes = vec![RecipeInput::new(
            "r",
            vec![
                RawStep::new("season", 0).with_id("s").active(),
                RawStep::new("serve", 30).with_id("t").active(),
            ],
        )];
        let tl = schedule(&recipes, caps(&[(ATTENTION, 1)])).unwrap();
        assert_eq!(span(&tl, "s"), (0, 0));
        assert_eq!(span(&tl, "t"), (0, 30));
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    #[test]
    fn zero_capacity_class_fails_fast() {
        let err = schedule(
            &bottleneck_recipes(),
            caps(&[(ATTENTION, 1), ("board", 2), ("stove", 0)]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchedulerError::ResourceStarvation {
                class: "stove".into(),
                task: "A2".into(),
            }
        );
    }

    #[test]
    fn invalid_input_returns_no_timeline() {
        let recipes = vec![RecipeInput::new("r", vec![RawStep::new("bad", -10)])];
        let err = schedule(&recipes, caps(&[(ATTENTION, 1)])).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::InvalidInput {
                reason: InputDefect::NegativeDuration { .. },
                ..
            }
        ));
    }

    #[test]
    fn near_max_durations_keep_exact_end_times() {
        let recipes = vec![RecipeInput::new(
            "stock",
            vec![RawStep::new("a", i64::MAX).active(), RawStep::new("b", i64::MAX).active()],
        )];
        let tl = schedule(&recipes, caps(&[(ATTENTION, 1)])).unwrap();
        let half = i64::MAX as Seconds;
        assert_eq!(span(&tl, "stock#1"), (half, half + half));
        assert_eq!(tl.makespan(), Seconds::MAX - 1);

        let overflowing = vec![RecipeInput::new(
            "stock",
            vec![
                RawStep::new("a", i64::MAX),
                RawStep::new("b", i64::MAX),
                RawStep::new("c", i64::MAX),
            ],
        )];
        let err = schedule(&overflowing, caps(&[(ATTENTION, 1)])).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::InvalidInput {
                reason: InputDefect::DurationOverflow { .. },
                ..
            }
        ));
    }

    // ── General ───────────────────────────────────────────────────────────────

    #[test]
    fn no_recipes_gives_empty_timeline() {
        let tl = schedule(&[], caps(&[(ATTENTION, 1)])).unwrap();
        assert!(tl.is_empty());
        assert_eq!(tl.makespan(), 0);
    }

    #[test]
    fn empty_recipes_are_skipped() {
        let recipes = vec![
            RecipeInput::new("empty", vec![]),
            RecipeInput::new("r", vec![RawStep::new("x", 10).with_id("x")]),
        ];
        let tl = schedule(&recipes, caps(&[(ATTENTION, 1)])).unwrap();
        assert_eq!(tl.len(), 1);
        assert_eq!(tl.makespan(), 10);
    }

    #[test]
    fn scheduler_is_deterministic() {
        let sched = KitchenScheduler::new(caps(&[(ATTENTION, 1), ("board", 2), ("stove", 1)]));
        let reference = sched.schedule(&bottleneck_recipes()).unwrap();
        let reference_yaml = serde_yaml::to_string(&reference).unwrap();

        for _ in 0..49 {
            let tl = sched.schedule(&bottleneck_recipes()).unwrap();
            assert_eq!(tl, reference);
            assert_eq!(serde_yaml::to_string(&tl).unwrap(), reference_yaml);
        }
    }

    #[test]
    fn scheduler_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KitchenScheduler>();
        assert_send_sync::<Timeline>();
    }
}
