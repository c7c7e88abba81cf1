/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Timeline assembly: the scheduler's output and its per-lane views.
//!
//! A [`Timeline`] is built exactly once per scheduling run from the blocks in
//! the order the scheduler created them, and is immutable afterwards.  Lane
//! queries return borrowed, time-ordered views for the rendering layer (one
//! lane per physical instance, e.g. "stove #1", "attention #1").

pub mod verify;

pub use verify::Violation;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::pool::InstanceSlot;
use crate::task::{Seconds, Task, ATTENTION};

// ── ScheduledBlock ────────────────────────────────────────────────────────────

/// Equipment actually bound to a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentBinding {
    pub class: String,
    pub slot: InstanceSlot,
}

/// One task placed on the timeline.  Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledBlock {
    pub task: Task,
    pub start: Seconds,
    /// `start + task.duration_seconds`.
    pub end: Seconds,
    /// `None` when the task needs no equipment.
    pub equipment: Option<EquipmentBinding>,
    /// `Some` iff the task requires attention.
    pub attention_instance: Option<usize>,
}

impl ScheduledBlock {
    /// `true` if this block holds instance `index` of `class` (attention
    /// included).
    pub fn occupies(&self, class: &str, index: usize) -> bool {
        let on_equipment = self
            .equipment
            .as_ref()
            .is_some_and(|b| b.class == class && b.slot == InstanceSlot::Index(index));
        let on_attention = class == ATTENTION && self.attention_instance == Some(index);
        on_equipment || on_attention
    }

    /// Tracked lanes this block sits on.
    pub fn lanes(&self) -> impl Iterator<Item = LaneKey> + '_ {
        let equipment = self.equipment.as_ref().and_then(|b| {
            b.slot.index().map(|index| LaneKey {
                class: b.class.clone(),
                index,
            })
        });
        let attention = self.attention_instance.map(|index| LaneKey {
            class: ATTENTION.to_string(),
            index,
        });
        equipment.into_iter().chain(attention)
    }

    /// Half-open interval overlap; zero-length blocks overlap nothing.
    pub fn overlaps(&self, other: &ScheduledBlock) -> bool {
        if self.start == self.end || other.start == other.end {
            return false;
        }
        self.start < other.end && other.start < self.end
    }
}

// ── LaneKey ───────────────────────────────────────────────────────────────────

/// One physical resource instance.  Orders by class name, then index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LaneKey {
    pub class: String,
    pub index: usize,
}

impl fmt::Display for LaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.class, self.index + 1)
    }
}

// ── Timeline ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    blocks: Vec<ScheduledBlock>,
    makespan: Seconds,
}

impl Timeline {
    /// Wraps `blocks` (creation order) and computes the makespan.
    pub fn assemble(blocks: Vec<ScheduledBlock>) -> Self {
        let makespan = blocks.iter().map(|b| b.end).max().unwrap_or(0);
        Self { blocks, makespan }
    }

    /// All blocks in creation order.
    pub fn blocks(&self) -> &[ScheduledBlock] {
        &self.blocks
    }

    /// Latest end time over all blocks; `0` for an empty timeline.
    pub fn makespan(&self) -> Seconds {
        self.makespan
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block_for_task(&self, task_id: &str) -> Option<&ScheduledBlock> {
        self.blocks.iter().find(|b| b.task.id == task_id)
    }

    /// Blocks bound to instance `index` of `class`, ordered by start time.
    ///
    /// Works for `ATTENTION` as well as equipment classes.
    pub fn blocks_for(&self, class: &str, index: usize) -> Vec<&ScheduledBlock> {
        let mut lane: Vec<&ScheduledBlock> = self
            .blocks
            .iter()
            .filter(|b| b.occupies(class, index))
            .collect();
        // stable: equal starts keep creation order
        lane.sort_by_key(|b| b.start);
        lane
    }

    /// Every tracked lane holding at least one block, in [`LaneKey`] order,
    /// each lane time-ordered.
    pub fn lanes(&self) -> BTreeMap<LaneKey, Vec<&ScheduledBlock>> {
        let mut lanes: BTreeMap<LaneKey, Vec<&ScheduledBlock>> = BTreeMap::new();
        for block in &self.blocks {
            for key in block.lanes() {
                lanes.entry(key).or_default().push(block);
            }
        }
        for lane in lanes.values_mut() {
            lane.sort_by_key(|b| b.start);
        }
        lanes
    }

    /// Blocks bound to the unconstrained class `class`, ordered by start.
    pub fn unbounded_blocks(&self, class: &str) -> Vec<&ScheduledBlock> {
        let mut blocks: Vec<&ScheduledBlock> = self
            .blocks
            .iter()
            .filter(|b| {
                b.equipment
                    .as_ref()
                    .is_some_and(|e| e.class == class && e.slot == InstanceSlot::Unbounded)
            })
            .collect();
        blocks.sort_by_key(|b| b.start);
        blocks
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
