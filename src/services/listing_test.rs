use super::*;
use crate::state::test_helpers;
use std::sync::Arc;

fn doc(json: serde_json::Value) -> KitchenDocument {
    serde_json::from_value(json).unwrap()
}

fn resolver() -> ImageResolver {
    ImageResolver::new("proj1", "production")
}

// =============================================================================
// ModelCard
// =============================================================================

#[test]
fn card_previews_first_three_options() {
    let card = ModelCard::from_document(
        &doc(serde_json::json!({
            "_id": "a",
            "title": "Luxury",
            "moduleTypes": [
                { "name": "Grill" }, { "name": "Sink" }, { "name": "Fridge" }, { "name": "Pizza Oven" }
            ],
            "materialFinishes": [{ "name": "Teak" }]
        })),
        None,
    );
    assert_eq!(card.module_count, 4);
    assert_eq!(card.module_preview, vec!["Grill", "Sink", "Fridge"]);
    assert_eq!(card.material_count, 1);
    assert_eq!(card.material_preview, vec!["Teak"]);
}

#[test]
fn card_price_label_skips_missing_and_zero() {
    let priced = ModelCard::from_document(&doc(serde_json::json!({ "_id": "a", "title": "A", "price": 19999 })), None);
    assert_eq!(priced.price_label.as_deref(), Some("$19,999"));

    let free = ModelCard::from_document(&doc(serde_json::json!({ "_id": "b", "title": "B", "price": 0 })), None);
    assert_eq!(free.price, Some(0));
    assert!(free.price_label.is_none());

    let unpriced = ModelCard::from_document(&doc(serde_json::json!({ "_id": "c", "title": "C" })), None);
    assert!(unpriced.price_label.is_none());
}

#[test]
fn card_hero_image_uses_alt_text() {
    let card = ModelCard::from_document(
        &doc(serde_json::json!({
            "_id": "a",
            "title": "Classic",
            "heroImage": { "asset": { "_ref": "image-abc-1200x800-webp" }, "alt": "Patio kitchen" }
        })),
        Some(&resolver()),
    );
    let hero = card.hero_image.unwrap();
    assert_eq!(hero.url, "https://cdn.sanity.io/images/proj1/production/abc-1200x800.webp?w=800&q=75");
    assert_eq!(hero.placeholder_url, "https://cdn.sanity.io/images/proj1/production/abc-1200x800.webp?w=20&blur=50&q=75");
    assert_eq!(hero.alt, "Patio kitchen");
}

#[test]
fn card_without_resolver_has_no_hero() {
    let card = ModelCard::from_document(
        &doc(serde_json::json!({
            "_id": "a",
            "title": "Classic",
            "heroImage": { "asset": { "_ref": "image-abc-1200x800-webp" } }
        })),
        None,
    );
    assert!(card.hero_image.is_none());
}

#[test]
fn malformed_hero_ref_is_skipped() {
    let card = ModelCard::from_document(
        &doc(serde_json::json!({
            "_id": "a",
            "title": "Classic",
            "heroImage": { "asset": { "_ref": "file-abc-pdf" } }
        })),
        Some(&resolver()),
    );
    assert!(card.hero_image.is_none());
}

// =============================================================================
// fetch_cards / renditions
// =============================================================================

struct StaticSource(Vec<KitchenDocument>);

#[async_trait::async_trait]
impl crate::content::ContentSource for StaticSource {
    async fn fetch(&self, _query: &ContentQuery) -> Result<Vec<KitchenDocument>, ContentError> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn fetch_cards_without_provider_is_error() {
    let state = test_helpers::test_app_state();
    assert!(fetch_cards(&state, false).await.is_error());
}

#[tokio::test]
async fn featured_filter_can_empty_the_feed() {
    let source = StaticSource(vec![doc(serde_json::json!({ "_id": "a", "title": "A", "featured": false }))]);
    let state = test_helpers::test_app_state().with_content(Arc::new(source), resolver());

    assert!(matches!(fetch_cards(&state, false).await, ContentState::Loaded { .. }));
    assert_eq!(fetch_cards(&state, true).await, ContentState::Empty);
}

#[tokio::test]
async fn error_rendition_is_not_cached() {
    let state = test_helpers::test_app_state();
    let body = model_listing(&state).await;
    assert_eq!(body["state"], "error");
    assert!(state.pages.get_fresh(LISTING_PATH).await.is_none());
}

#[tokio::test]
async fn loaded_rendition_is_cached() {
    let source = StaticSource(vec![doc(serde_json::json!({ "_id": "a", "title": "A", "featured": true }))]);
    let state = test_helpers::test_app_state().with_content(Arc::new(source), resolver());

    let body = home_feed(&state).await;
    assert_eq!(body["state"], "loaded");
    assert_eq!(state.pages.get_fresh(HOME_PATH).await, Some(body));
}
