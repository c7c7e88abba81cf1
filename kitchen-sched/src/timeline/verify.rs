/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! After-the-fact checking of a finished timeline against its task graph.
//!
//! Checks:
//! 1. Every task of the graph has exactly one block, and vice versa.
//! 2. `end == start + duration` for every block.
//! 3. Recipe precedence: each step starts no earlier than its predecessor ends.
//! 4. Exclusivity: no two blocks overlap on the same tracked instance.
//!
//! Returns *all* violations rather than the first, so a test failure or the
//! CLI's `--verify` report shows the whole picture.

use std::collections::HashMap;
use std::fmt;

use super::{LaneKey, ScheduledBlock, Timeline};
use crate::builder::TaskGraph;
use crate::task::Seconds;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A task of the graph has no block.
    Unscheduled { task: String },

    /// A task id appears in more than one block, or in none of the graph.
    UnexpectedBlock { task: String },

    DurationMismatch {
        task: String,
        start: Seconds,
        end: Seconds,
        duration: Seconds,
    },

    /// `later` starts before `earlier` (its in-recipe predecessor) ends.
    Precedence {
        recipe: String,
        earlier: String,
        later: String,
    },

    Overlap {
        lane: LaneKey,
        first: String,
        second: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Unscheduled { task } => write!(f, "task '{task}' was never scheduled"),
            Violation::UnexpectedBlock { task } => {
                write!(f, "block for '{task}' is duplicated or unknown")
            }
            Violation::DurationMismatch {
                task,
                start,
                end,
                duration,
            } => write!(
                f,
                "task '{task}' spans [{start}, {end}) but lasts {duration}s"
            ),
            Violation::Precedence {
                recipe,
                earlier,
                later,
            } => write!(
                f,
                "recipe '{recipe}': '{later}' starts before '{earlier}' ends"
            ),
            Violation::Overlap {
                lane,
                first,
                second,
            } => write!(f, "{lane}: '{first}' and '{second}' overlap"),
        }
    }
}

impl Timeline {
    /// Re-checks the timeline against `graph`; an empty result means valid.
    pub fn verify(&self, graph: &TaskGraph) -> Vec<Violation> {
        let mut violations = Vec::new();

        // 1. one block per task
        let mut by_id: HashMap<&str, &ScheduledBlock> = HashMap::new();
        for block in self.blocks() {
            if by_id.insert(block.task.id.as_str(), block).is_some() {
                violations.push(Violation::UnexpectedBlock {
                    task: block.task.id.clone(),
                });
            }
        }
        let mut known = 0usize;
        for task in graph.tasks() {
            if by_id.contains_key(task.id.as_str()) {
                known += 1;
            } else {
                violations.push(Violation::Unscheduled {
                    task: task.id.clone(),
                });
            }
        }
        if known < by_id.len() {
            for block in self.blocks() {
                if !graph.tasks().any(|t| t.id == block.task.id) {
                    violations.push(Violation::UnexpectedBlock {
                        task: block.task.id.clone(),
                    });
                }
            }
        }

        // 2. durations
        for block in self.blocks() {
            if block.start.checked_add(block.task.duration_seconds) != Some(block.end) {
                violations.push(Violation::DurationMismatch {
                    task: block.task.id.clone(),
                    start: block.start,
                    end: block.end,
                    duration: block.task.duration_seconds,
                });
            }
        }

        // 3. precedence
        for recipe in graph.recipes() {
            for pair in recipe.tasks.windows(2) {
                let (Some(prev), Some(next)) =
                    (by_id.get(pair[0].id.as_str()), by_id.get(pair[1].id.as_str()))
                else {
                    continue;
                };
                if next.start < prev.end {
                    violations.push(Violation::Precedence {
                        recipe: recipe.id.clone(),
                        earlier: prev.task.id.clone(),
                        later: next.task.id.clone(),
                    });
                }
            }
        }

        // 4. exclusivity — lanes are start-ordered, so compare each block
        // with the one reaching furthest so far
        for (lane, blocks) in self.lanes() {
            let mut furthest: Option<&ScheduledBlock> = None;
            for block in blocks {
                if let Some(prev) = furthest {
                    if prev.overlaps(block) {
                        violations.push(Violation::Overlap {
                            lane: lane.clone(),
                            first: prev.task.id.clone(),
                            second: block.task.id.clone(),
                        });
                    }
                }
                if furthest.map_or(true, |prev| block.end > prev.end) {
                    furthest = Some(block);
                }
            }
        }

        violations
    }
}
