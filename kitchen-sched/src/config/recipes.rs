//! Recipe book loading.
//!
//! ```yaml
//! recipes:
//!   - id: pasta
//!     tag: "Tomato pasta"
//!     steps:
//!       - label: "Chop onions"
//!         duration_seconds: 60
//!         requires_attention: true
//!         equipment: cutting_board
//!       - label: "Simmer sauce"
//!         duration_seconds: 900
//!         equipment: saucepan
//! ```
//!
//! Only the YAML shape is checked here; durations and ids are validated by
//! the task model builder when the book is scheduled.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::task::RecipeInput;

#[derive(Debug, Deserialize)]
struct RecipeBookFile {
    #[serde(default)]
    recipes: Vec<RecipeInput>,
}

/// An ordered list of recipes; file order is the recipe insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeBook {
    recipes: Vec<RecipeInput>,
}

impl RecipeBook {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading recipes from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open recipe file: {}", path.display()))?;
        let book = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        info!("Loaded {} recipe(s)", book.len());
        Ok(book)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: RecipeBookFile = serde_yaml::from_str(content)?;
        for recipe in &file.recipes {
            debug!(
                "  Recipe: {} | Steps: {}",
                recipe.id,
                recipe.steps.as_ref().map_or(0, Vec::len)
            );
        }
        Ok(Self {
            recipes: file.recipes,
        })
    }

    pub fn recipes(&self) -> &[RecipeInput] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl From<Vec<RecipeInput>> for RecipeBook {
    fn from(recipes: Vec<RecipeInput>) -> Self {
        Self { recipes }
    }
}
