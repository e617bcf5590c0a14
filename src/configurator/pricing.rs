//! Derived pricing and the human-readable configuration summary.
//!
//! All functions are pure over `(catalog, selection)`. Ids that do not resolve
//! in the catalog contribute nothing and are skipped in listings.

use std::fmt::Write;

use serde::Serialize;

use super::Selection;
use crate::catalog::Catalog;

const SUMMARY_HEADER: &str = "Kitchen Configuration Summary:";
const NOT_SELECTED: &str = "Not selected";

/// The three additive terms of the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub base: u64,
    pub modules: u64,
    pub materials: u64,
    pub total: u64,
}

/// Display entry for one material category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialSummary {
    pub category: String,
    pub name: String,
    pub price: u64,
}

#[must_use]
pub fn price_breakdown(catalog: &Catalog, selection: &Selection) -> PriceBreakdown {
    let base = selection
        .model
        .and_then(|id| catalog.model(id))
        .map_or(0, |m| m.base_price);
    let modules = selection
        .modules
        .iter()
        .filter_map(|id| catalog.module(id))
        .fold(0u64, |acc, m| acc.saturating_add(m.price));
    let materials = selection
        .materials
        .values()
        .filter_map(|id| catalog.material(id))
        .fold(0u64, |acc, m| acc.saturating_add(m.price));

    PriceBreakdown { base, modules, materials, total: base.saturating_add(modules).saturating_add(materials) }
}

#[must_use]
pub fn total_price(catalog: &Catalog, selection: &Selection) -> u64 {
    price_breakdown(catalog, selection).total
}

#[must_use]
pub fn module_names(catalog: &Catalog, selection: &Selection) -> Vec<String> {
    selection
        .modules
        .iter()
        .filter_map(|id| catalog.module(id))
        .map(|m| m.name.clone())
        .collect()
}

/// One entry per selected category, in category order.
#[must_use]
pub fn material_summaries(catalog: &Catalog, selection: &Selection) -> Vec<MaterialSummary> {
    selection
        .materials
        .iter()
        .map(|(category, id)| {
            let material = catalog.material(id);
            MaterialSummary {
                category: category.clone(),
                name: material.map_or_else(|| NOT_SELECTED.to_owned(), |m| m.name.clone()),
                price: material.map_or(0, |m| m.price),
            }
        })
        .collect()
}

/// Deterministic text block used both for the on-screen preview and the
/// submission payload. Sections: model, modules, materials, total.
#[must_use]
pub fn configuration_summary(catalog: &Catalog, selection: &Selection) -> String {
    let mut out = String::new();
    let _ = write!(out, "{SUMMARY_HEADER}\n\n");

    if let Some(model) = selection.model.and_then(|id| catalog.model(id)) {
        let _ = writeln!(out, "Model: {}", model.name);
        let _ = writeln!(out, "Description: {}", model.description);
        let _ = write!(out, "Base Price: {}\n\n", format_price(model.base_price));
    }

    if !selection.modules.is_empty() {
        out.push_str("Selected Modules:\n");
        for module in selection.modules.iter().filter_map(|id| catalog.module(id)) {
            let _ = writeln!(out, "- {}: {}", module.name, format_price(module.price));
        }
        out.push('\n');
    }

    if !selection.materials.is_empty() {
        out.push_str("Selected Materials:\n");
        for (category, id) in &selection.materials {
            let Some(material) = catalog.material(id) else {
                continue;
            };
            let _ = write!(out, "- {}: {}", capitalize(category), material.name);
            if material.price > 0 {
                let _ = write!(out, " (+{})", format_price(material.price));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    let _ = write!(out, "Total Estimated Price: {}", format_price(total_price(catalog, selection)));
    out
}

/// `13897` -> `"$13,897"`.
#[must_use]
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Uppercase the first character, leave the rest untouched.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "pricing_test.rs"]
mod tests;
