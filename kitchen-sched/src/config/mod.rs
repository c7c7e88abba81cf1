//! Kitchen configuration loading and management.
//!
//! The expected YAML structure is:
//! ```yaml
//! capacities:
//!   attention: 1
//!   stove: 4
//!   oven: 1
//!   board: 2
//! equipment:
//!   frying_pan: stove
//!   saucepan: stove
//!   cutting_board: board
//! ```
//!
//! Both sections are optional.  Classes named under `equipment` but absent
//! from `capacities` stay unconstrained.

pub mod recipes;

pub use recipes::RecipeBook;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::builder::EquipmentMap;
use crate::pool::Capacities;
use crate::scheduler::KitchenScheduler;
use crate::task::ATTENTION;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KitchenConfigFile {
    #[serde(default)]
    capacities: BTreeMap<String, u32>,
    #[serde(default)]
    equipment: BTreeMap<String, String>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Resource capacities and equipment lookup table for one kitchen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitchenConfig {
    pub capacities: Capacities,
    pub equipment: EquipmentMap,
}

impl KitchenConfig {
    /// The fallback kitchen used when no configuration file is supplied:
    /// one cook, a four-burner stove, one oven, two boards and two bowls.
    pub fn default_config() -> Self {
        let capacities = [(ATTENTION, 1), ("stove", 4), ("oven", 1), ("board", 2), ("bowl", 2)]
            .into_iter()
            .map(|(class, n)| (class.to_string(), n))
            .collect();
        let equipment = EquipmentMap::new()
            .with("frying_pan", "stove")
            .with("saucepan", "stove")
            .with("pot", "stove")
            .with("cutting_board", "board")
            .with("mixing_bowl", "bowl");
        Self {
            capacities,
            equipment,
        }
    }

    /// Builds a scheduler for this kitchen.
    pub fn scheduler(&self) -> KitchenScheduler {
        KitchenScheduler::new(self.capacities.clone()).with_equipment(self.equipment.clone())
    }
}

// ── KitchenConfigManager ──────────────────────────────────────────────────────

/// Loads and holds the kitchen configuration from a YAML file.
#[derive(Debug)]
pub struct KitchenConfigManager {
    config: KitchenConfig,

    /// Set to `true` after a successful [`load_from_file`](Self::load_from_file).
    loaded: bool,
}

impl Default for KitchenConfigManager {
    fn default() -> Self {
        Self {
            config: KitchenConfig::default_config(),
            loaded: false,
        }
    }
}

impl KitchenConfigManager {
    /// Creates a manager holding the default kitchen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `path` and replaces the current configuration.
    ///
    /// On error the previous configuration is kept but the manager is marked
    /// not loaded.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the YAML is
    /// structurally invalid.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        info!("Loading kitchen configuration from: {}", path.display());
        self.loaded = false;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        self.config = Self::parse(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;
        self.loaded = true;

        info!(
            "Successfully loaded {} resource class(es), {} equipment mapping(s)",
            self.config.capacities.len(),
            self.config.equipment.len(),
        );
        for (class, count) in &self.config.capacities {
            info!("  Class: {} | Capacity: {}", class, count);
        }

        Ok(())
    }

    fn parse(content: &str) -> Result<KitchenConfig> {
        let file: KitchenConfigFile = serde_yaml::from_str(content)?;

        for (class, count) in &file.capacities {
            if *count == 0 {
                warn!(class = %class, "resource class configured with zero capacity");
            }
        }
        for (tag, class) in &file.equipment {
            debug!("  Equipment: {} -> {}", tag, class);
            if !file.capacities.contains_key(class) && class != ATTENTION {
                debug!(class = %class, "class has no capacity entry and is unconstrained");
            }
        }

        Ok(KitchenConfig {
            capacities: file.capacities,
            equipment: file.equipment.into_iter().collect(),
        })
    }

    /// The current configuration (the default kitchen until a file loads).
    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Returns `true` after a successful call to [`load_from_file`](Self::load_from_file).
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
