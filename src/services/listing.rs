//! Content listing pages: the model listing and the featured home feed.
//!
//! Both pages project provider documents into `ModelCard`s and are served
//! through the page cache. Provider failures render as the `error` state and
//! are never cached, so the next visitor retries the provider.

use serde::Serialize;
use tracing::warn;

use super::page_cache::{HOME_PATH, LISTING_PATH};
use crate::configurator::pricing::format_price;
use crate::content::image::{ImageResolver, ImageSource};
use crate::content::{ContentError, ContentQuery, ContentState, KitchenDocument};
use crate::state::AppState;

/// Width of listing hero images.
pub const HERO_IMAGE_WIDTH: u32 = 800;
/// Number of module and material names previewed on a card.
pub const CARD_PREVIEW_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroImage {
    pub url: String,
    pub placeholder_url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub featured: bool,
    pub price: Option<u64>,
    /// `$12,999`; absent when the document has no (or a zero) price.
    pub price_label: Option<String>,
    pub hero_image: Option<HeroImage>,
    pub module_count: usize,
    pub module_preview: Vec<String>,
    pub material_count: usize,
    pub material_preview: Vec<String>,
    pub published_at: Option<String>,
}

impl ModelCard {
    #[must_use]
    pub fn from_document(doc: &KitchenDocument, images: Option<&ImageResolver>) -> Self {
        let price = doc.price();
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            description: doc.description.clone(),
            featured: doc.featured,
            price,
            price_label: price.filter(|p| *p > 0).map(format_price),
            hero_image: doc
                .hero_image
                .as_ref()
                .zip(images)
                .and_then(|(source, resolver)| hero_image(resolver, source, &doc.title)),
            module_count: doc.module_types.len(),
            module_preview: doc
                .module_types
                .iter()
                .take(CARD_PREVIEW_LEN)
                .map(|m| m.name.clone())
                .collect(),
            material_count: doc.material_finishes.len(),
            material_preview: doc
                .material_finishes
                .iter()
                .take(CARD_PREVIEW_LEN)
                .map(|m| m.name.clone())
                .collect(),
            published_at: doc.published_at.clone(),
        }
    }
}

fn hero_image(resolver: &ImageResolver, source: &ImageSource, title: &str) -> Option<HeroImage> {
    let resolved = resolver
        .image_url(source, HERO_IMAGE_WIDTH, crate::content::image::DEFAULT_QUALITY)
        .and_then(|url| resolver.blur_placeholder(source).map(|placeholder| (url, placeholder)));

    match resolved {
        Ok((url, placeholder_url)) => Some(HeroImage {
            url,
            placeholder_url,
            alt: source
                .alt
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| title.to_owned()),
        }),
        Err(e) => {
            warn!(error = %e, %title, "skipping hero image");
            None
        }
    }
}

/// Fetch kitchen models and project them into cards.
pub async fn fetch_cards(state: &AppState, featured_only: bool) -> ContentState<ModelCard> {
    let result = match &state.content {
        Some(source) => source.fetch(&ContentQuery::kitchen_models()).await,
        None => Err(ContentError::NotConfigured),
    };

    let page = ContentState::from_result(result.map(|docs| {
        docs.iter()
            .filter(|doc| !featured_only || doc.featured)
            .map(|doc| ModelCard::from_document(doc, state.images.as_ref()))
            .collect()
    }));
    if let ContentState::Error { message } = &page {
        warn!(%message, featured_only, "content listing failed");
    }
    page
}

async fn render(state: &AppState, featured_only: bool) -> (serde_json::Value, bool) {
    let page = fetch_cards(state, featured_only).await;
    let cacheable = !page.is_error();
    match serde_json::to_value(&page) {
        Ok(body) => (body, cacheable),
        Err(e) => (serde_json::json!({ "state": "error", "message": e.to_string() }), false),
    }
}

/// Rendition of the model listing page.
pub async fn model_listing(state: &AppState) -> serde_json::Value {
    state
        .pages
        .get_or_render(LISTING_PATH, || render(state, false))
        .await
}

/// Rendition of the home feed (featured models only).
pub async fn home_feed(state: &AppState) -> serde_json::Value {
    state
        .pages
        .get_or_render(HOME_PATH, || render(state, true))
        .await
}

#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;
