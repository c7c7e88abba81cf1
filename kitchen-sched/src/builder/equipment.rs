/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Equipment tag → resource class lookup table.

use std::collections::BTreeMap;

/// Injectable mapping from free-form equipment tags to resource classes.
///
/// Resolved once per task by the builder.  A tag with no entry passes through
/// unchanged as its own class name, so `"oven"` with no mapping is class
/// `"oven"` — constrained only if the capacity map names it.
///
/// `BTreeMap` keeps iteration (and therefore logging) order stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentMap {
    table: BTreeMap<String, String>,
}

impl EquipmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the mapping for `tag`, builder style.
    pub fn with(mut self, tag: impl Into<String>, class: impl Into<String>) -> Self {
        self.insert(tag, class);
        self
    }

    /// Adds or replaces the mapping for `tag`.
    pub fn insert(&mut self, tag: impl Into<String>, class: impl Into<String>) {
        self.table.insert(tag.into(), class.into());
    }

    /// The resource class for `tag`.
    pub fn resolve(&self, tag: &str) -> String {
        self.table
            .get(tag)
            .cloned()
            .unwrap_or_else(|| tag.to_string())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.table.iter().map(|(t, c)| (t.as_str(), c.as_str()))
    }
}

impl FromIterator<(String, String)> for EquipmentMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            table: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_tag_resolves_to_class() {
        let map = EquipmentMap::new()
            .with("frying_pan", "stove")
            .with("saucepan", "stove");
        assert_eq!(map.resolve("frying_pan"), "stove");
        assert_eq!(map.resolve("saucepan"), "stove");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn unmapped_tag_passes_through() {
        let map = EquipmentMap::new().with("frying_pan", "stove");
        assert_eq!(map.resolve("blender"), "blender");
    }

    #[test]
    fn insert_replaces_previous_mapping() {
        let mut map = EquipmentMap::new();
        map.insert("wok", "stove");
        map.insert("wok", "burner");
        assert_eq!(map.resolve("wok"), "burner");
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("wok", "burner")]);
    }
}
