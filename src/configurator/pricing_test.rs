use super::*;

fn selection(model: Option<u32>, modules: &[&str], materials: &[(&str, &str)]) -> Selection {
    Selection {
        model,
        modules: modules.iter().map(|m| (*m).to_owned()).collect(),
        materials: materials
            .iter()
            .map(|(c, m)| ((*c).to_owned(), (*m).to_owned()))
            .collect(),
    }
}

// =============================================================================
// format_price / capitalize
// =============================================================================

#[test]
fn format_price_groups_thousands() {
    assert_eq!(format_price(0), "$0");
    assert_eq!(format_price(999), "$999");
    assert_eq!(format_price(8999), "$8,999");
    assert_eq!(format_price(13897), "$13,897");
    assert_eq!(format_price(1_000_000), "$1,000,000");
}

#[test]
fn capitalize_first_letter_only() {
    assert_eq!(capitalize("cabinets"), "Cabinets");
    assert_eq!(capitalize("outdoor bar"), "Outdoor bar");
    assert_eq!(capitalize(""), "");
}

// =============================================================================
// breakdown
// =============================================================================

#[test]
fn breakdown_sums_components() {
    let catalog = Catalog::builtin();
    let sel = selection(Some(1), &["grill", "sink"], &[("cabinets", "teak-wood")]);
    let b = price_breakdown(&catalog, &sel);
    assert_eq!(b, PriceBreakdown { base: 8999, modules: 3398, materials: 1500, total: 13897 });
}

#[test]
fn unknown_ids_contribute_zero() {
    let catalog = Catalog::builtin();
    let sel = selection(Some(77), &["grill", "hot-tub"], &[("cabinets", "unobtanium")]);
    let b = price_breakdown(&catalog, &sel);
    assert_eq!(b, PriceBreakdown { base: 0, modules: 2499, materials: 0, total: 2499 });
}

#[test]
fn same_material_in_two_categories_counts_twice() {
    let catalog = Catalog::builtin();
    let sel = selection(None, &[], &[("cabinets", "stone"), ("countertop", "stone")]);
    assert_eq!(total_price(&catalog, &sel), 4400);
}

// =============================================================================
// projections
// =============================================================================

#[test]
fn module_names_follow_selection_order() {
    let catalog = Catalog::builtin();
    let sel = selection(None, &["sink", "grill", "bogus"], &[]);
    assert_eq!(module_names(&catalog, &sel), vec!["Stainless Steel Sink", "Built-in Grill"]);
}

#[test]
fn material_summaries_one_per_category() {
    let catalog = Catalog::builtin();
    let sel = selection(None, &[], &[("countertop", "stone"), ("accents", "gone")]);
    let summaries = material_summaries(&catalog, &sel);
    assert_eq!(
        summaries,
        vec![
            MaterialSummary { category: "accents".into(), name: "Not selected".into(), price: 0 },
            MaterialSummary { category: "countertop".into(), name: "Natural Stone".into(), price: 2200 },
        ]
    );
}

// =============================================================================
// configuration_summary
// =============================================================================

#[test]
fn summary_full_configuration() {
    let catalog = Catalog::builtin();
    let sel = selection(
        Some(1),
        &["grill", "sink"],
        &[("cabinets", "teak-wood"), ("countertop", "stainless-steel")],
    );
    let expected = "Kitchen Configuration Summary:\n\n\
        Model: Classic Series\n\
        Description: Timeless elegance with traditional design elements\n\
        Base Price: $8,999\n\n\
        Selected Modules:\n\
        - Built-in Grill: $2,499\n\
        - Stainless Steel Sink: $899\n\n\
        Selected Materials:\n\
        - Cabinets: Teak Wood (+$1,500)\n\
        - Countertop: Stainless Steel\n\n\
        Total Estimated Price: $13,897";
    assert_eq!(configuration_summary(&catalog, &sel), expected);
}

#[test]
fn summary_empty_selection_has_only_total() {
    let catalog = Catalog::builtin();
    let summary = configuration_summary(&catalog, &Selection::default());
    assert_eq!(summary, "Kitchen Configuration Summary:\n\nTotal Estimated Price: $0");
}

#[test]
fn summary_is_reproducible() {
    let catalog = Catalog::builtin();
    let sel = selection(Some(3), &["drawers", "prep"], &[("accents", "powder-coated"), ("cabinets", "stone")]);
    let a = configuration_summary(&catalog, &sel);
    let b = configuration_summary(&catalog, &sel.clone());
    assert_eq!(a, b);
}

#[test]
fn summary_orders_materials_by_category() {
    let catalog = Catalog::builtin();
    let sel = selection(None, &[], &[("countertop", "composite"), ("accents", "stone")]);
    let summary = configuration_summary(&catalog, &sel);
    let accents = summary.find("Accents").unwrap();
    let countertop = summary.find("Countertop").unwrap();
    assert!(accents < countertop);
}
