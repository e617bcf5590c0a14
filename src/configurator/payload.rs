//! Submission payload handed to the quote sink.

use serde::Serialize;

use super::{ContactInfo, Selection, pricing};
use crate::catalog::{Catalog, Material, Model, Module};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub contact_info: ContactInfo,
    pub configuration: ConfigurationPayload,
    pub configuration_summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationPayload {
    pub model: Option<Model>,
    /// Full module records for the selected ids, in selection order.
    pub modules: Vec<Module>,
    pub materials: Vec<MaterialChoice>,
    pub total_price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialChoice {
    pub category: String,
    pub material: Material,
}

/// Resolve the selection against the catalog into a self-contained payload.
#[must_use]
pub fn build(catalog: &Catalog, selection: &Selection, contact: &ContactInfo) -> SubmissionPayload {
    let model = selection.model.and_then(|id| catalog.model(id)).cloned();
    let modules = selection
        .modules
        .iter()
        .filter_map(|id| catalog.module(id))
        .cloned()
        .collect();
    let materials = selection
        .materials
        .iter()
        .filter_map(|(category, id)| {
            catalog
                .material(id)
                .map(|material| MaterialChoice { category: category.clone(), material: material.clone() })
        })
        .collect();

    SubmissionPayload {
        contact_info: contact.clone(),
        configuration: ConfigurationPayload {
            model,
            modules,
            materials,
            total_price: pricing::total_price(catalog, selection),
        },
        configuration_summary: pricing::configuration_summary(catalog, selection),
    }
}

#[cfg(test)]
#[path = "payload_test.rs"]
mod tests;
