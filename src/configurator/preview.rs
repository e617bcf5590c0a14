//! Read-only projection of a selection into a renderable kitchen scene.
//!
//! Visualization consumers get a `SelectionSnapshot` (a copy, never a handle
//! into the session) and turn it into a `Scene`. Part geometry is fixed; only
//! visibility and colors depend on the selection.

use std::collections::BTreeMap;

use serde::Serialize;

use super::Selection;
use crate::catalog::Catalog;

/// Fallback color for a category with no material selected.
pub const DEFAULT_PART_COLOR: &str = "#E5E5E5";

/// Kitchen group offset in scene coordinates.
const SCENE_ORIGIN: [f32; 3] = [0.0, -1.0, 0.0];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSnapshot {
    pub model_id: Option<u32>,
    pub module_ids: Vec<String>,
    pub materials: BTreeMap<String, String>,
}

impl SelectionSnapshot {
    #[must_use]
    pub fn of(selection: &Selection) -> Self {
        Self {
            model_id: selection.model,
            module_ids: selection.modules.clone(),
            materials: selection.materials.clone(),
        }
    }

    #[must_use]
    pub fn has_module(&self, id: &str) -> bool {
        self.module_ids.iter().any(|m| m == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenePart {
    pub name: &'static str,
    pub position: [f32; 3],
    pub size: [f32; 3],
    pub color: String,
    pub metalness: f32,
    pub roughness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Label floated above the kitchen, when a model is selected.
    pub label: Option<String>,
    pub origin: [f32; 3],
    pub parts: Vec<ScenePart>,
}

impl Scene {
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&ScenePart> {
        self.parts.iter().find(|p| p.name == name)
    }
}

fn part(name: &'static str, position: [f32; 3], size: [f32; 3], color: &str, metalness: f32, roughness: f32) -> ScenePart {
    ScenePart { name, position, size, color: color.to_owned(), metalness, roughness }
}

fn category_color<'a>(snapshot: &SelectionSnapshot, catalog: &'a Catalog, category: &str) -> &'a str {
    snapshot
        .materials
        .get(category)
        .and_then(|id| catalog.material(id))
        .map_or(DEFAULT_PART_COLOR, |m| m.color.as_str())
}

#[must_use]
pub fn build_scene(snapshot: &SelectionSnapshot, catalog: &Catalog) -> Scene {
    let cabinet = category_color(snapshot, catalog, "cabinets");
    let countertop = category_color(snapshot, catalog, "countertop");
    let accent = category_color(snapshot, catalog, "accents");

    let mut parts = vec![
        part("base", [0.0, 0.5, 0.0], [3.0, 1.0, 1.5], cabinet, 0.3, 0.4),
        part("countertop", [0.0, 1.1, 0.0], [3.2, 0.1, 1.7], countertop, 0.1, 0.2),
    ];

    if snapshot.has_module("grill") {
        parts.push(part("grill", [-0.8, 1.15, 0.0], [0.6, 0.2, 0.6], "#2C2C2C", 0.8, 0.2));
    }
    if snapshot.has_module("sink") {
        parts.push(part("sink", [0.8, 1.15, 0.0], [0.5, 0.15, 0.5], "#E0E0E0", 0.9, 0.1));
    }
    if snapshot.has_module("storage") {
        parts.push(part("storage_left", [-1.2, 0.5, 0.8], [0.4, 1.0, 0.3], cabinet, 0.2, 0.5));
        parts.push(part("storage_right", [1.2, 0.5, 0.8], [0.4, 1.0, 0.3], cabinet, 0.2, 0.5));
    }
    if snapshot.has_module("prep") {
        parts.push(part("prep", [0.0, 1.15, 0.6], [1.0, 0.1, 0.4], countertop, 0.1, 0.2));
    }
    if snapshot.has_module("refrigerator") {
        parts.push(part("refrigerator", [1.5, 0.7, 0.0], [0.5, 1.4, 0.6], "#F0F0F0", 0.1, 0.3));
    }

    parts.push(part("accent_trim", [0.0, 0.2, 0.75], [3.0, 0.05, 0.1], accent, 0.5, 0.3));

    let label = snapshot
        .model_id
        .and_then(|id| catalog.model(id))
        .map(|m| m.name.clone());

    Scene { label, origin: SCENE_ORIGIN, parts }
}

#[cfg(test)]
#[path = "preview_test.rs"]
mod tests;
