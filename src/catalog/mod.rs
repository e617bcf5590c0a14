//! Option catalog: the selectable models, modules and materials.
//!
//! DESIGN
//! ======
//! A `Catalog` is built once at startup (from the content provider or the
//! built-in defaults) and then shared read-only behind an `Arc` by every
//! configurator session. Uniqueness of ids is checked at construction; after
//! that the catalog is never mutated, so selection references stay valid for
//! the lifetime of a session.

mod builtin;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Material categories the configurator offers a choice for.
pub const MATERIAL_CATEGORIES: [&str; 3] = ["cabinets", "countertop", "accents"];

// =============================================================================
// OPTION TYPES
// =============================================================================

/// A base kitchen model. Exactly one may be selected per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub base_price: u64,
    #[serde(default)]
    pub features: Vec<String>,
}

/// An add-on module (grill, sink, ...). Any subset may be selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub price: u64,
}

/// A material finish. One may be selected per material category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Display color token (hex), also used by the preview scene.
    pub color: String,
    #[serde(default)]
    pub price: u64,
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate model id {0}")]
    DuplicateModel(u32),
    #[error("duplicate module id {0:?}")]
    DuplicateModule(String),
    #[error("duplicate material id {0:?}")]
    DuplicateMaterial(String),
}

impl crate::error::ErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateModel(_) => "E_DUPLICATE_MODEL",
            Self::DuplicateModule(_) => "E_DUPLICATE_MODULE",
            Self::DuplicateMaterial(_) => "E_DUPLICATE_MATERIAL",
        }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Immutable set of options for configurator sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    models: Vec<Model>,
    modules: Vec<Module>,
    materials: Vec<Material>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids within any option kind.
    ///
    /// # Errors
    ///
    /// Returns the first duplicate id found.
    pub fn new(models: Vec<Model>, modules: Vec<Module>, materials: Vec<Material>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        if let Some(dup) = models.iter().find(|m| !seen.insert(m.id)) {
            return Err(CatalogError::DuplicateModel(dup.id));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = modules.iter().find(|m| !seen.insert(m.id.as_str())) {
            return Err(CatalogError::DuplicateModule(dup.id.clone()));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = materials.iter().find(|m| !seen.insert(m.id.as_str())) {
            return Err(CatalogError::DuplicateMaterial(dup.id.clone()));
        }

        Ok(Self { models, modules, materials })
    }

    /// The catalog shipped with the site, used when no content provider is
    /// configured or it yields nothing.
    #[must_use]
    pub fn builtin() -> Self {
        Self { models: builtin::models(), modules: builtin::modules(), materials: builtin::materials() }
    }

    #[must_use]
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    #[must_use]
    pub fn model(&self, id: u32) -> Option<&Model> {
        self.models.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn material(&self, id: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// A catalog with no models cannot drive the wizard past step 1.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
