/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Static feasibility checks around a scheduling run.
//!
//! # Before scheduling: starvation
//! A task that needs a class configured with capacity 0 can never start.  The
//! greedy loop would otherwise spin forever waiting for an instance that does
//! not exist, so the whole task set is checked against the capacity map up
//! front.
//!
//! # After scheduling: serial bounds
//! Two cheap bounds bracket any legal makespan:
//!
//! | Bound | Value | Why |
//! |---|---|---|
//! | lower | longest single recipe | its own precedence chain is serial |
//! | upper | sum of every duration | running everything one after another is always legal |
//!
//! The greedy schedule never leaves a task waiting longer than its binding
//! constraint forces, so it never exceeds the naive serial sum either.

use crate::builder::TaskGraph;
use crate::pool::Capacities;
use crate::task::{Seconds, Task};

// ── Public API ────────────────────────────────────────────────────────────────

/// First `(class, task)` pair, in recipe order, where `task` needs `class` but
/// `class` is configured with zero capacity.  `None` if every task can start.
///
/// Classes absent from `capacities` are unconstrained and never starve.
pub fn find_starved_class<'g>(
    graph: &'g TaskGraph,
    capacities: &Capacities,
) -> Option<(&'g str, &'g Task)> {
    graph.tasks().find_map(|task| {
        task.occupied_classes()
            .find(|class| capacities.get(*class) == Some(&0))
            .map(|class| (class, task))
    })
}

/// Duration of the longest recipe: no legal schedule can finish sooner.
pub fn serial_lower_bound(graph: &TaskGraph) -> Seconds {
    graph
        .recipes()
        .iter()
        .map(|r| r.serial_seconds())
        .max()
        .unwrap_or(0)
}

/// Sum of every task duration: the makespan of running everything serially.
pub fn serial_sum(graph: &TaskGraph) -> Seconds {
    graph
        .recipes()
        .iter()
        .fold(0, |acc: Seconds, r| acc.saturating_add(r.serial_seconds()))
}

/// Returns `Some(bound)` if `makespan` is below the serial lower bound —
/// which means the timeline is corrupt, not merely suboptimal.
pub fn check_lower_bound(makespan: Seconds, graph: &TaskGraph) -> Option<Seconds> {
    let bound = serial_lower_bound(graph);
    (makespan < bound).then_some(bound)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
