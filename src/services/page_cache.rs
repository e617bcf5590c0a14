//! Page cache for content renditions with an ISR window.
//!
//! A rendition is the JSON body served for a path. Reads within the TTL are
//! answered from memory; a stale or missing entry is re-rendered on the next
//! read. The revalidation webhook drops entries outright.
//!
//! Each path carries a generation that `invalidate` bumps. A render captures
//! the generation before it starts and stores only if it is still current,
//! so a rendition that began before a revalidation never lands in the cache.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Rendition key for the model listing.
pub const LISTING_PATH: &str = "/models";
/// Rendition key for the home feed.
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone)]
struct CachedPage {
    body: serde_json::Value,
    rendered_at: Instant,
}

#[derive(Debug, Default)]
struct Pages {
    entries: HashMap<String, CachedPage>,
    generations: HashMap<String, u64>,
}

impl Pages {
    fn generation(&self, path: &str) -> u64 {
        self.generations.get(path).copied().unwrap_or(0)
    }
}

#[derive(Clone)]
pub struct PageCache {
    pages: Arc<RwLock<Pages>>,
    ttl: Duration,
}

impl PageCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { pages: Arc::new(RwLock::new(Pages::default())), ttl }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached body for `path` if it was rendered less than one TTL ago.
    pub async fn get_fresh(&self, path: &str) -> Option<serde_json::Value> {
        self.get_fresh_at(path, Instant::now()).await
    }

    async fn get_fresh_at(&self, path: &str, now: Instant) -> Option<serde_json::Value> {
        let pages = self.pages.read().await;
        let page = pages.entries.get(path)?;
        (now.saturating_duration_since(page.rendered_at) < self.ttl).then(|| page.body.clone())
    }

    pub async fn store(&self, path: &str, body: serde_json::Value) {
        self.store_at(path, body, Instant::now()).await;
    }

    async fn store_at(&self, path: &str, body: serde_json::Value, rendered_at: Instant) {
        let mut pages = self.pages.write().await;
        pages.entries.insert(path.to_owned(), CachedPage { body, rendered_at });
    }

    async fn generation(&self, path: &str) -> u64 {
        self.pages.read().await.generation(path)
    }

    /// Store `body` only if `path` has not been invalidated since `generation`.
    async fn store_if_current(&self, path: &str, body: serde_json::Value, generation: u64) -> bool {
        let mut pages = self.pages.write().await;
        if pages.generation(path) != generation {
            return false;
        }
        pages
            .entries
            .insert(path.to_owned(), CachedPage { body, rendered_at: Instant::now() });
        true
    }

    /// Drop the renditions for `paths` and bump their generations.
    /// Returns how many renditions were present.
    pub async fn invalidate(&self, paths: &[&str]) -> usize {
        let mut pages = self.pages.write().await;
        let mut removed = 0;
        for path in paths {
            *pages.generations.entry((*path).to_owned()).or_insert(0) += 1;
            if pages.entries.remove(*path).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Serve `path` from cache, or render and store it.
    ///
    /// `render` returns the body plus whether it may be cached; failed
    /// renditions are served once and not stored.
    pub async fn get_or_render<F, Fut>(&self, path: &str, render: F) -> serde_json::Value
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = (serde_json::Value, bool)>,
    {
        if let Some(body) = self.get_fresh(path).await {
            tracing::debug!(%path, "page cache hit");
            return body;
        }

        let generation = self.generation(path).await;
        let (body, cacheable) = render().await;
        if cacheable && !self.store_if_current(path, body.clone(), generation).await {
            tracing::debug!(%path, "page invalidated during render; not caching");
        }
        body
    }
}

#[cfg(test)]
#[path = "page_cache_test.rs"]
mod tests;
