/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Kitchen scheduler – deterministic list scheduling of recipe steps.
//!
//! Module layout (data flows strictly upward):
//!
//! ```text
//! lib.rs
//! ├── task        – raw step / recipe records and the normalised Task
//! ├── error       – InputDefect / SchedulerError
//! ├── builder/    – task model builder + equipment lookup table
//! ├── pool        – per-run resource pool (instance next-free times)
//! ├── scheduler/  – greedy list scheduler + feasibility checks
//! ├── timeline/   – scheduled blocks, lanes, verification
//! └── config/     – YAML kitchen configuration and recipe book
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod pool;
pub mod scheduler;
pub mod task;
pub mod timeline;

pub use error::{InputDefect, SchedulerError};
pub use scheduler::{schedule, KitchenScheduler};
pub use timeline::{ScheduledBlock, Timeline};
