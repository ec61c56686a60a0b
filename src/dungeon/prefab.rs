//! Named ASCII block patterns loaded from JSON
//!
//! A prefab is a rectangular character grid plus a legend mapping each
//! symbol to a tile/material pair. Legend entries without a tile mark void
//! cells, which stamp nothing and let a prefab keep an irregular outline.

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, UndercroftError};
use crate::core::types::{Material, Tile};
use crate::dungeon::grid::Dungeon;

/// One legend symbol's meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Tile kind to stamp; `None` marks a void cell
    #[serde(default)]
    pub tile: Option<Tile>,
    /// Surface override; defaults to the tile kind's usual material
    #[serde(default)]
    pub material: Option<Material>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prefab {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub cells: Vec<String>,
    #[serde(default)]
    pub legend: AHashMap<char, LegendEntry>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Bundle file holding several prefabs
#[derive(Debug, Deserialize)]
struct PrefabBundle {
    prefabs: Vec<Prefab>,
}

impl Prefab {
    /// Check that the cell grid matches the declared dimensions
    pub fn validate(&self) -> Result<()> {
        let rows_ok = self.cells.len() as i32 == self.height
            && self
                .cells
                .iter()
                .all(|row| row.chars().count() as i32 == self.width);
        if rows_ok {
            Ok(())
        } else {
            Err(UndercroftError::PrefabShape {
                name: self.name.clone(),
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn from_file(path: &Path) -> Result<Prefab> {
        let raw = std::fs::read_to_string(path)?;
        let prefab: Prefab = serde_json::from_str(&raw)?;
        prefab.validate()?;
        Ok(prefab)
    }

    /// Stamp this prefab onto the grid with its own legend
    pub fn stamp(&self, grid: &mut Dungeon, px: i32, py: i32) {
        grid.stamp_prefab(px, py, &self.cells, &self.legend);
    }
}

/// Load every prefab under `dir`, keyed by name
///
/// Accepts single-prefab files and `{"prefabs": [...]}` bundles. Invalid
/// entries are skipped with a warning; a missing directory yields an empty
/// map rather than an error.
pub fn load_prefabs(dir: &Path) -> AHashMap<String, Prefab> {
    let mut out = AHashMap::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return out,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(?path, %err, "unreadable prefab file, skipped");
                continue;
            }
        };
        if let Ok(bundle) = serde_json::from_str::<PrefabBundle>(&raw) {
            for prefab in bundle.prefabs {
                match prefab.validate() {
                    Ok(()) => {
                        out.insert(prefab.name.clone(), prefab);
                    }
                    Err(err) => tracing::warn!(?path, %err, "invalid prefab in bundle, skipped"),
                }
            }
            continue;
        }
        let parsed = serde_json::from_str::<Prefab>(&raw)
            .map_err(UndercroftError::from)
            .and_then(|prefab| {
                prefab.validate()?;
                Ok(prefab)
            });
        match parsed {
            Ok(prefab) => {
                out.insert(prefab.name.clone(), prefab);
            }
            Err(err) => tracing::warn!(?path, %err, "invalid prefab file, skipped"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHRINE: &str = r####"{
        "name": "shrine",
        "width": 3,
        "height": 3,
        "cells": ["###", "#.#", "# #"],
        "legend": {
            "#": { "tile": "wall", "material": "obsidian" },
            ".": { "tile": "floor", "material": "marble" },
            " ": {}
        },
        "tags": ["decor"]
    }"####;

    #[test]
    fn test_prefab_parses_from_json() {
        let prefab: Prefab = serde_json::from_str(SHRINE).unwrap();
        assert!(prefab.validate().is_ok());
        assert_eq!(prefab.name, "shrine");
        assert_eq!(prefab.legend[&'.'].material, Some(Material::Marble));
        assert_eq!(prefab.legend[&' '].tile, None);
        assert_eq!(prefab.tags, vec!["decor".to_string()]);
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let mut prefab: Prefab = serde_json::from_str(SHRINE).unwrap();
        prefab.cells.pop();
        let err = prefab.validate().unwrap_err();
        assert!(matches!(err, UndercroftError::PrefabShape { .. }));
    }

    #[test]
    fn test_stamp_applies_legend() {
        let prefab: Prefab = serde_json::from_str(SHRINE).unwrap();
        let mut d = Dungeon::new(10, 10);
        prefab.stamp(&mut d, 4, 4);
        assert_eq!(d.tile_at(4, 4), Tile::Wall);
        assert_eq!(d.material_at(4, 4), Material::Obsidian);
        assert_eq!(d.tile_at(5, 5), Tile::Floor);
        assert_eq!(d.material_at(5, 5), Material::Marble);
        // void cell leaves the original wall and brick alone
        assert_eq!(d.tile_at(5, 6), Tile::Wall);
        assert_eq!(d.material_at(5, 6), Material::Brick);
    }

    #[test]
    fn test_bundle_deserializes() {
        let raw = format!(r#"{{ "prefabs": [{SHRINE}] }}"#);
        let bundle: PrefabBundle = serde_json::from_str(&raw).unwrap();
        assert_eq!(bundle.prefabs.len(), 1);
    }
}
