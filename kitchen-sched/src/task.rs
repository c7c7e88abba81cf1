/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core task data structures for the kitchen scheduler.
//!
//! Two distinct layers model the two sides of the scheduling pipeline:
//!
//! ```text
//! authoring layer ──(RecipeInput / RawStep)──►  builder  ──►  Task  ──(scheduler)──►  ScheduledBlock
//!                     ↑ raw, unvalidated                      ↑ normalised, immutable
//! ```
//!
//! # Ownership model
//! Raw records are **borrowed** by the [`TaskModelBuilder`]; it produces owned
//! [`Task`]s grouped into a [`TaskGraph`].  Tasks are never mutated after the
//! builder returns — the scheduler's per-run state (cursors, instance
//! availability) lives elsewhere.
//!
//! [`TaskModelBuilder`]: crate::builder::TaskModelBuilder
//! [`TaskGraph`]: crate::builder::TaskGraph

use serde::{Deserialize, Serialize};

// ── Units and well-known names ────────────────────────────────────────────────

/// Time in whole seconds since the start of the cooking session.
pub type Seconds = u64;

/// Name of the distinguished resource class that models the cook.
///
/// Consumed by every task with `requires_attention = true`, in addition to
/// the task's own equipment class.
pub const ATTENTION: &str = "attention";

// ── RawStep (input) ───────────────────────────────────────────────────────────

/// One cooking step as supplied by the recipe-authoring layer.
///
/// Every field the authoring layer may omit is optional here; the builder
/// decides what is missing versus defaulted.  `duration_seconds` is signed so
/// that a negative value can be reported instead of silently wrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawStep {
    /// Stable step identifier.  Generated as `"<recipe>#<index>"` when absent.
    #[serde(default)]
    pub id: Option<String>,

    /// Display label ("Chop onions").
    #[serde(default)]
    pub label: String,

    /// Duration in seconds.  Required; must be non-negative.
    #[serde(default)]
    pub duration_seconds: Option<i64>,

    /// `true` for an active step that needs the cook for its whole duration.
    #[serde(default)]
    pub requires_attention: bool,

    /// Free-form equipment tag ("frying_pan", "cutting_board", …), resolved
    /// to a resource class through the [`EquipmentMap`].
    ///
    /// [`EquipmentMap`]: crate::builder::EquipmentMap
    #[serde(default)]
    pub equipment: Option<String>,
}

impl RawStep {
    /// A passive step with no equipment.
    pub fn new(label: impl Into<String>, duration_seconds: i64) -> Self {
        Self {
            label: label.into(),
            duration_seconds: Some(duration_seconds),
            ..Default::default()
        }
    }

    /// Marks the step as needing the cook's attention.
    pub fn active(mut self) -> Self {
        self.requires_attention = true;
        self
    }

    /// Sets the equipment tag.
    pub fn with_equipment(mut self, tag: impl Into<String>) -> Self {
        self.equipment = Some(tag.into());
        self
    }

    /// Sets an explicit step id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

// ── RecipeInput (input) ───────────────────────────────────────────────────────

/// One recipe: an ordered list of raw steps.
///
/// The caller's step order is authoritative — it becomes each task's
/// `sequence_index` unchanged.  `steps == None` models a missing step list
/// (an error); `Some(vec![])` is a valid recipe that contributes no tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecipeInput {
    pub id: String,

    /// Display tag carried onto every task of the recipe.
    #[serde(default)]
    pub tag: String,

    #[serde(default)]
    pub steps: Option<Vec<RawStep>>,
}

impl RecipeInput {
    pub fn new(id: impl Into<String>, steps: Vec<RawStep>) -> Self {
        Self {
            id: id.into(),
            tag: String::new(),
            steps: Some(steps),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

// ── Task (normalised) ─────────────────────────────────────────────────────────

/// One cooking step bound to its recipe.
///
/// Produced by the builder from a [`RawStep`]:
///
/// * `duration_seconds` is validated non-negative and widened to [`Seconds`].
/// * `resource_class` is the *resolved* class, not the raw equipment tag.
/// * `recipe_index` is the recipe's insertion position in the `schedule()`
///   call, used for deterministic tie-breaking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Task {
    // ── Identity ──────────────────────────────────────────────────────────────
    pub id: String,
    pub recipe_id: String,
    pub recipe_index: usize,

    /// Position within the recipe, 0-based.
    pub sequence_index: usize,

    // ── Scheduling parameters ─────────────────────────────────────────────────
    pub duration_seconds: Seconds,
    pub requires_attention: bool,

    /// Equipment class occupied for the whole duration, if any.
    pub resource_class: Option<String>,

    // ── Display only ──────────────────────────────────────────────────────────
    pub label: String,
    pub recipe_tag: String,
}

impl Task {
    /// `true` for the first step of its recipe (no in-recipe predecessor).
    pub fn is_first(&self) -> bool {
        self.sequence_index == 0
    }

    /// Every resource class this task occupies, attention included.
    pub fn occupied_classes(&self) -> impl Iterator<Item = &str> {
        self.resource_class
            .as_deref()
            .into_iter()
            .chain(self.requires_attention.then_some(ATTENTION))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
