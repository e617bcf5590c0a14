//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the shared catalog, the map of live configurator sessions, the
//! optional content provider and image resolver, the quote sink, and the
//! listing page cache.
//!
//! Sessions are anonymous, so each one records when it was last touched.
//! Opening a session sweeps out the ones idle for longer than the idle TTL.
//! A session with a delivery in flight is kept until the delivery lands.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::{DEFAULT_PAGE_CACHE_TTL_SECS, DEFAULT_SESSION_IDLE_TTL_SECS};
use crate::configurator::{Configurator, SubmissionStatus};
use crate::content::ContentSource;
use crate::content::image::ImageResolver;
use crate::services::page_cache::PageCache;
use crate::services::quote::QuoteSink;

/// A live configurator plus its idle clock.
pub struct Session {
    pub configurator: Configurator,
    last_touched: Instant,
}

impl Session {
    fn new(configurator: Configurator, now: Instant) -> Self {
        Self { configurator, last_touched: now }
    }

    fn is_idle(&self, now: Instant, ttl: Duration) -> bool {
        !matches!(self.configurator.submission(), SubmissionStatus::InFlight)
            && now.saturating_duration_since(self.last_touched) >= ttl
    }
}

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// Live configurator sessions keyed by session ID.
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    pub session_idle_ttl: Duration,
    /// Optional CMS client. `None` if the content provider is not configured.
    pub content: Option<Arc<dyn ContentSource>>,
    pub images: Option<ImageResolver>,
    pub quote_sink: Arc<dyn QuoteSink>,
    pub pages: PageCache,
    pub revalidate_secret: Option<String>,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: Catalog, quote_sink: Arc<dyn QuoteSink>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_idle_ttl: Duration::from_secs(DEFAULT_SESSION_IDLE_TTL_SECS),
            content: None,
            images: None,
            quote_sink,
            pages: PageCache::new(Duration::from_secs(DEFAULT_PAGE_CACHE_TTL_SECS)),
            revalidate_secret: None,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: Arc<dyn ContentSource>, images: ImageResolver) -> Self {
        self.content = Some(content);
        self.images = Some(images);
        self
    }

    #[must_use]
    pub fn with_page_ttl(mut self, ttl: Duration) -> Self {
        self.pages = PageCache::new(ttl);
        self
    }

    #[must_use]
    pub fn with_session_idle_ttl(mut self, ttl: Duration) -> Self {
        self.session_idle_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_revalidate_secret(mut self, secret: Option<String>) -> Self {
        self.revalidate_secret = secret;
        self
    }

    /// Start a new session against the shared catalog and return its ID.
    /// Idle sessions are evicted first.
    pub async fn open_session(&self) -> Uuid {
        self.open_session_at(Instant::now()).await
    }

    async fn open_session_at(&self, now: Instant) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        let evicted = evict_idle(&mut sessions, now, self.session_idle_ttl);
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "evicted idle configurator sessions");
        }
        sessions.insert(id, Session::new(Configurator::new(Arc::clone(&self.catalog)), now));
        id
    }

    /// Run `f` against a session and mark it touched. `None` if it does not exist.
    pub async fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&mut Configurator) -> T) -> Option<T> {
        self.with_session_at(id, Instant::now(), f).await
    }

    async fn with_session_at<T>(&self, id: Uuid, now: Instant, f: impl FnOnce(&mut Configurator) -> T) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.last_touched = now;
        Some(f(&mut session.configurator))
    }

    /// Drop sessions untouched for at least the idle TTL. Returns how many went.
    pub async fn evict_idle_sessions(&self) -> usize {
        self.evict_idle_sessions_at(Instant::now()).await
    }

    async fn evict_idle_sessions_at(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_idle(&mut sessions, now, self.session_idle_ttl)
    }

    /// Drop a session. Returns whether it existed.
    pub async fn close_session(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }
}

fn evict_idle(sessions: &mut HashMap<Uuid, Session>, now: Instant, ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, session| !session.is_idle(now, ttl));
    before - sessions.len()
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::configurator::payload::SubmissionPayload;
    use crate::services::quote::SinkError;

    /// Sink that accepts everything and remembers what it saw.
    #[derive(Default)]
    pub struct RecordingSink {
        pub delivered: std::sync::Mutex<Vec<SubmissionPayload>>,
    }

    #[async_trait::async_trait]
    impl QuoteSink for RecordingSink {
        async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), SinkError> {
            self.delivered.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    /// `AppState` over the built-in catalog with a recording sink and no content provider.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(Catalog::builtin(), Arc::new(RecordingSink::default()))
    }

    #[must_use]
    pub fn test_app_state_with_sink(sink: Arc<dyn QuoteSink>) -> AppState {
        AppState::new(Catalog::builtin(), sink)
    }

    /// Seed a session with model 1, the grill, and complete contact details.
    pub async fn seed_ready_session(state: &AppState) -> Uuid {
        let id = state.open_session().await;
        state
            .with_session(id, |session| {
                session.select_model(1);
                session.toggle_module("grill");
                session.update_contact(crate::configurator::ContactField::Name, "Ada Lovelace");
                session.update_contact(crate::configurator::ContactField::Email, "ada@example.com");
            })
            .await
            .unwrap();
        id
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
