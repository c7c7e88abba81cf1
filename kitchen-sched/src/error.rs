/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the kitchen scheduler.
//!
//! Two layers model the two failure levels:
//!
//! * [`InputDefect`] — what exactly is wrong with one recipe or step
//!   (low-level, carries the offending values).
//! * [`SchedulerError`] — top-level failure returned from
//!   [`KitchenScheduler::schedule()`](crate::scheduler::KitchenScheduler::schedule).
//!
//! Both failure kinds are terminal for the call: no partial timeline is ever
//! returned.  Configuration loading uses `anyhow` instead; these typed
//! variants are what an API layer matches on to re-prompt the user.

use thiserror::Error;

// ── Input validation ──────────────────────────────────────────────────────────

/// Detailed reason why a recipe was rejected by the task model builder.
///
/// Carried inside [`SchedulerError::InvalidInput`] so the caller always knows
/// both *which* recipe failed and *why*.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputDefect {
    /// The recipe id is empty or whitespace only.
    EmptyRecipeId,

    /// Another recipe earlier in the same call already used this id.
    DuplicateRecipeId,

    /// The recipe's step list is absent (as opposed to present and empty).
    MissingSteps,

    /// A step has no `duration_seconds`.
    MissingDuration { step: String },

    /// A step has a negative `duration_seconds`.
    NegativeDuration { step: String, duration_seconds: i64 },

    /// Two steps (in any recipes of the call) share the same task id.
    DuplicateTaskId { step: String },

    /// Adding this step's duration pushes the call's total past `u64::MAX`
    /// seconds, so some end time could not be represented.
    DurationOverflow { step: String },
}

impl std::fmt::Display for InputDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputDefect::EmptyRecipeId => write!(f, "recipe id is empty"),

            InputDefect::DuplicateRecipeId => {
                write!(f, "recipe id is used by more than one recipe")
            }

            InputDefect::MissingSteps => write!(f, "recipe has no step list"),

            InputDefect::MissingDuration { step } => {
                write!(f, "step '{}' has no duration", step)
            }

            InputDefect::NegativeDuration {
                step,
                duration_seconds,
            } => write!(
                f,
                "step '{}' has negative duration {}s",
                step, duration_seconds
            ),

            InputDefect::DuplicateTaskId { step } => {
                write!(f, "task id '{}' is not unique", step)
            }

            InputDefect::DurationOverflow { step } => {
                write!(f, "step '{}' overflows the total cooking time", step)
            }
        }
    }
}

// ── Top-level scheduler errors ────────────────────────────────────────────────

/// Top-level error type returned by
/// [`KitchenScheduler::schedule()`](crate::scheduler::KitchenScheduler::schedule).
///
/// | Variant | Caller action |
/// |---|---|
/// | `InvalidInput` | fix the recipe data |
/// | `ResourceStarvation` | re-prompt for different resource counts |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Malformed recipe or step data.
    #[error("invalid input in recipe '{recipe}': {reason}")]
    InvalidInput { recipe: String, reason: InputDefect },

    /// A task needs a resource class whose configured capacity is zero, so it
    /// could never start.
    ///
    /// Detected before any scheduling happens; `task` is the first task (in
    /// recipe order) that needs the class.
    #[error("resource class '{class}' has zero capacity but task '{task}' requires it")]
    ResourceStarvation { class: String, task: String },
}

impl SchedulerError {
    pub(crate) fn invalid(recipe: impl Into<String>, reason: InputDefect) -> Self {
        SchedulerError::InvalidInput {
            recipe: recipe.into(),
            reason,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
