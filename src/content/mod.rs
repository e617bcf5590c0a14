//! Content provider: read-only access to CMS-managed catalog documents.
//!
//! SYSTEM CONTEXT
//! ==============
//! Catalog content lives in a headless CMS. This module defines the query
//! contract (`ContentQuery`), the document shape returned for kitchen models,
//! and the `ContentSource` seam the rest of the service reads through. The
//! Sanity HTTP client in `sanity` is the production implementation; tests
//! substitute in-memory sources.
//!
//! Listing pages distinguish three outcomes: documents, no documents, and a
//! provider failure (`ContentState`). Catalog loading at startup treats the
//! latter two the same way and falls back to the built-in catalog.

pub mod image;
pub mod sanity;

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogError, Material, Model, Module};
use image::ImageSource;

/// Document type of kitchen models in the CMS.
pub const KITCHEN_MODEL_TYPE: &str = "outdoorKitchenModel";

/// Fields projected for every kitchen model query.
const KITCHEN_MODEL_PROJECTION: &str =
    "_id, title, description, heroImage, moduleTypes, materialFinishes, price, featured, publishedAt";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content provider not configured")]
    NotConfigured,

    #[error("content request failed: {0}")]
    Request(String),

    #[error("content provider returned status {status}")]
    Response { status: u16, body: String },

    #[error("content response parse failed: {0}")]
    Parse(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for ContentError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_CONTENT_NOT_CONFIGURED",
            Self::Request(_) => "E_CONTENT_REQUEST",
            Self::Response { .. } => "E_CONTENT_RESPONSE",
            Self::Parse(_) => "E_CONTENT_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Response { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// QUERY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub field: String,
    pub direction: SortDirection,
}

/// A content-type filter plus optional ordering key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentQuery {
    pub document_type: String,
    pub ordering: Option<Ordering>,
}

impl ContentQuery {
    /// All kitchen models, newest publication first.
    #[must_use]
    pub fn kitchen_models() -> Self {
        Self {
            document_type: KITCHEN_MODEL_TYPE.into(),
            ordering: Some(Ordering { field: "publishedAt".into(), direction: SortDirection::Desc }),
        }
    }

    /// Render as a GROQ query string. An ordering whose field is not a plain
    /// attribute path is left out of the query.
    #[must_use]
    pub fn to_groq(&self) -> String {
        let mut groq = format!("*[_type == \"{}\"]", self.document_type.replace('"', "\\\""));
        if let Some(order) = &self.ordering {
            if is_attribute_path(&order.field) {
                groq.push_str(&format!(" | order({} {})", order.field, order.direction.as_str()));
            } else {
                warn!(field = %order.field, "ignoring ordering on invalid field");
            }
        }
        groq.push_str(&format!(" {{ {KITCHEN_MODEL_PROJECTION} }}"));
        groq
    }
}

/// `name` or `a.b.c`, where every segment is `[A-Za-z_][A-Za-z0-9_]*`.
fn is_attribute_path(field: &str) -> bool {
    field.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

// =============================================================================
// DOCUMENTS
// =============================================================================

/// Missing GROQ projections come back as `null`; treat them as the default.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Whole-unit price from a CMS number. Negative or non-finite values are dropped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn price_from_number(n: &serde_json::Number) -> Option<u64> {
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f.round() as u64)
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleType {
    #[serde(rename = "_key", default, deserialize_with = "null_default")]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub price: Option<serde_json::Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialFinish {
    #[serde(rename = "_key", default, deserialize_with = "null_default")]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub image: Option<ImageSource>,
    #[serde(default)]
    pub price: Option<serde_json::Number>,
}

/// An `outdoorKitchenModel` document as projected by [`ContentQuery::to_groq`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default)]
    pub hero_image: Option<ImageSource>,
    #[serde(default, deserialize_with = "null_default")]
    pub module_types: Vec<ModuleType>,
    #[serde(default, deserialize_with = "null_default")]
    pub material_finishes: Vec<MaterialFinish>,
    #[serde(default)]
    pub price: Option<serde_json::Number>,
    #[serde(default, deserialize_with = "null_default")]
    pub featured: bool,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl KitchenDocument {
    #[must_use]
    pub fn price(&self) -> Option<u64> {
        self.price.as_ref().and_then(price_from_number)
    }
}

/// Outcome of a listing fetch as shown to visitors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContentState<T> {
    Loaded { items: Vec<T> },
    Empty,
    Error { message: String },
}

impl<T> ContentState<T> {
    #[must_use]
    pub fn from_result(result: Result<Vec<T>, ContentError>) -> Self {
        match result {
            Ok(items) if items.is_empty() => Self::Empty,
            Ok(items) => Self::Loaded { items },
            Err(e) => Self::Error { message: e.to_string() },
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ContentState<U> {
        match self {
            Self::Loaded { items } => ContentState::Loaded { items: items.into_iter().map(f).collect() },
            Self::Empty => ContentState::Empty,
            Self::Error { message } => ContentState::Error { message },
        }
    }
}

// =============================================================================
// SOURCE TRAIT
// =============================================================================

/// Read-only content query interface. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch documents matching `query`, in the query's order.
    ///
    /// # Errors
    ///
    /// Returns a [`ContentError`] when the provider is unreachable, answers
    /// with a non-success status, or returns an unparseable body.
    async fn fetch(&self, query: &ContentQuery) -> Result<Vec<KitchenDocument>, ContentError>;
}

// =============================================================================
// CATALOG MAPPING
// =============================================================================

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_owned()
}

fn option_key(key: &str, name: &str) -> String {
    if key.trim().is_empty() { slugify(name) } else { key.to_owned() }
}

/// Turn provider documents into a catalog.
///
/// Documents become models with ids `1..` in provider order. Module types and
/// material finishes are merged across documents by key; the first occurrence wins.
///
/// # Errors
///
/// Propagates [`CatalogError`] from catalog construction.
pub fn catalog_from_documents(documents: &[KitchenDocument]) -> Result<Catalog, CatalogError> {
    let mut models = Vec::with_capacity(documents.len());
    let mut modules: Vec<Module> = Vec::new();
    let mut materials: Vec<Material> = Vec::new();
    let mut module_keys = HashSet::new();
    let mut material_keys = HashSet::new();

    for (id, doc) in (1u32..).zip(documents) {
        models.push(Model {
            id,
            name: doc.title.clone(),
            description: doc.description.clone(),
            base_price: doc.price().unwrap_or(0),
            features: doc.module_types.iter().map(|m| m.name.clone()).collect(),
        });

        for module_type in &doc.module_types {
            let key = option_key(&module_type.key, &module_type.name);
            if key.is_empty() || !module_keys.insert(key.clone()) {
                continue;
            }
            modules.push(Module {
                id: key,
                name: module_type.name.clone(),
                description: module_type.description.clone().unwrap_or_default(),
                icon: module_type.icon.clone().unwrap_or_default(),
                price: module_type
                    .price
                    .as_ref()
                    .and_then(price_from_number)
                    .unwrap_or(0),
            });
        }

        for finish in &doc.material_finishes {
            let key = option_key(&finish.key, &finish.name);
            if key.is_empty() || !material_keys.insert(key.clone()) {
                continue;
            }
            materials.push(Material {
                id: key,
                name: finish.name.clone(),
                description: finish.description.clone().unwrap_or_default(),
                color: finish.color.clone().unwrap_or_default(),
                price: finish
                    .price
                    .as_ref()
                    .and_then(price_from_number)
                    .unwrap_or(0),
            });
        }
    }

    Catalog::new(models, modules, materials)
}

/// Load the session catalog from `source`, falling back to the built-in
/// catalog when the provider fails or has no models.
pub async fn load_catalog(source: &dyn ContentSource) -> Catalog {
    match source.fetch(&ContentQuery::kitchen_models()).await {
        Ok(documents) if documents.is_empty() => {
            warn!("content provider returned no kitchen models; using built-in catalog");
            Catalog::builtin()
        }
        Ok(documents) => match catalog_from_documents(&documents) {
            Ok(catalog) if catalog.models().is_empty() || catalog.modules().is_empty() || catalog.materials().is_empty() => {
                warn!(
                    models = catalog.models().len(),
                    modules = catalog.modules().len(),
                    materials = catalog.materials().len(),
                    "content catalog incomplete; using built-in catalog"
                );
                Catalog::builtin()
            }
            Ok(catalog) => {
                info!(
                    models = catalog.models().len(),
                    modules = catalog.modules().len(),
                    materials = catalog.materials().len(),
                    "catalog loaded from content provider"
                );
                catalog
            }
            Err(e) => {
                warn!(error = %e, "content catalog invalid; using built-in catalog");
                Catalog::builtin()
            }
        },
        Err(e) => {
            warn!(error = %e, "content fetch failed; using built-in catalog");
            Catalog::builtin()
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
