/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-run resource pool: instance availability per resource class.
//!
//! Every configured class owns `capacity` instances, each with a single
//! `next_free_at` time.  Classes absent from the capacity map are
//! unconstrained: they always report "free now" and are never reserved.
//!
//! The pool is created fresh inside every scheduling run and dropped with it;
//! it needs `&mut` for [`ResourcePool::reserve`] and is never shared.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::task::Seconds;

/// Capacity map: resource class → number of interchangeable instances.
///
/// `BTreeMap` (not `HashMap`) so that every walk over the classes is in
/// sorted order — required for deterministic logging and lane order.
pub type Capacities = BTreeMap<String, u32>;

// ── InstanceSlot ──────────────────────────────────────────────────────────────

/// Which instance of a class a task is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceSlot {
    /// A tracked instance, 0-based.
    Index(usize),
    /// The class is unconstrained; no instance is tracked.
    Unbounded,
}

impl InstanceSlot {
    pub fn index(self) -> Option<usize> {
        match self {
            InstanceSlot::Index(i) => Some(i),
            InstanceSlot::Unbounded => None,
        }
    }
}

impl fmt::Display for InstanceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceSlot::Index(i) => write!(f, "#{}", i + 1),
            InstanceSlot::Unbounded => write!(f, "unbounded"),
        }
    }
}

// ── ResourcePool ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ResourcePool {
    /// class → `next_free_at` per instance.
    instances: BTreeMap<String, Vec<Seconds>>,
}

impl ResourcePool {
    /// One instance per unit of capacity, all free at time 0.
    pub fn new(capacities: &Capacities) -> Self {
        let instances = capacities
            .iter()
            .map(|(class, &count)| (class.clone(), vec![0; count as usize]))
            .collect();
        Self { instances }
    }

    /// Configured capacity, or `None` for an unconstrained class.
    pub fn capacity(&self, class: &str) -> Option<usize> {
        self.instances.get(class).map(Vec::len)
    }

    pub fn is_constrained(&self, class: &str) -> bool {
        self.instances.contains_key(class)
    }

    /// Soonest time at which some instance of `class` is free, and which.
    ///
    /// Ties go to the lowest instance index.  An unconstrained class is
    /// always `(0, Unbounded)`.  Returns `None` only for a class configured
    /// with zero instances.
    pub fn earliest_available(&self, class: &str) -> Option<(Seconds, InstanceSlot)> {
        let Some(slots) = self.instances.get(class) else {
            return Some((0, InstanceSlot::Unbounded));
        };
        slots
            .iter()
            .enumerate()
            .min_by_key(|&(index, &free_at)| (free_at, index))
            .map(|(index, &free_at)| (free_at, InstanceSlot::Index(index)))
    }

    /// Marks instance `slot` of `class` busy over `[from, to)`.
    ///
    /// No-op for unconstrained classes and for [`InstanceSlot::Unbounded`].
    pub fn reserve(&mut self, class: &str, slot: InstanceSlot, from: Seconds, to: Seconds) {
        let InstanceSlot::Index(index) = slot else {
            return;
        };
        let Some(next_free_at) = self
            .instances
            .get_mut(class)
            .and_then(|slots| slots.get_mut(index))
        else {
            return;
        };

        debug_assert!(
            from >= *next_free_at,
            "{class} {slot} reserved from {from}s while busy until {next_free_at}s"
        );
        debug!(
            class = %class,
            instance = index,
            from_s = from,
            to_s = to,
            "instance reserved"
        );
        *next_free_at = to;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
