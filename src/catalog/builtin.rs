//! Hard-coded catalog for sites without a content provider.

use super::{Material, Model, Module};

fn model(id: u32, name: &str, description: &str, base_price: u64, features: [&str; 3]) -> Model {
    Model {
        id,
        name: name.into(),
        description: description.into(),
        base_price,
        features: features.iter().map(|f| (*f).to_owned()).collect(),
    }
}

fn module(id: &str, name: &str, description: &str, icon: &str, price: u64) -> Module {
    Module { id: id.into(), name: name.into(), description: description.into(), icon: icon.into(), price }
}

fn material(id: &str, name: &str, description: &str, color: &str, price: u64) -> Material {
    Material { id: id.into(), name: name.into(), description: description.into(), color: color.into(), price }
}

pub(super) fn models() -> Vec<Model> {
    vec![
        model(
            1,
            "Classic Series",
            "Timeless elegance with traditional design elements",
            8999,
            ["Stainless steel construction", "Built-in grill", "Prep station"],
        ),
        model(
            2,
            "Modern Series",
            "Sleek contemporary design with cutting-edge features",
            12999,
            ["Premium finishes", "Smart technology", "Modular design"],
        ),
        model(
            3,
            "Luxury Series",
            "Ultimate sophistication with custom luxury options",
            19999,
            ["Custom materials", "Professional-grade appliances", "Full customization"],
        ),
    ]
}

pub(super) fn modules() -> Vec<Module> {
    vec![
        module("grill", "Built-in Grill", "Professional-grade gas grill with side burners", "🔥", 2499),
        module("sink", "Stainless Steel Sink", "Weather-resistant sink with faucet", "💧", 899),
        module("storage", "Storage Cabinets", "Spacious storage with weatherproof doors", "📦", 1299),
        module("prep", "Prep Station", "Large work surface for food preparation", "🔪", 799),
        module("refrigerator", "Outdoor Refrigerator", "Weather-resistant refrigeration unit", "❄️", 1899),
        module("drawers", "Drawer System", "Smooth-gliding drawer storage", "🗄️", 599),
    ]
}

pub(super) fn materials() -> Vec<Material> {
    vec![
        material("stainless-steel", "Stainless Steel", "Durable and easy to maintain", "#C0C0C0", 0),
        material("teak-wood", "Teak Wood", "Premium weather-resistant hardwood", "#8B4513", 1500),
        material("composite", "Composite", "Modern composite material", "#2F4F4F", 800),
        material("stone", "Natural Stone", "Elegant natural stone finish", "#696969", 2200),
        material("powder-coated", "Powder Coated", "Custom color powder coating", "#4682B4", 600),
    ]
}
