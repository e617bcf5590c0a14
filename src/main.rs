use std::sync::Arc;
use std::time::Duration;

use hearthline::catalog::Catalog;
use hearthline::config::AppConfig;
use hearthline::content::image::ImageResolver;
use hearthline::content::sanity::SanityClient;
use hearthline::content::{self, ContentSource};
use hearthline::routes;
use hearthline::services::quote;
use hearthline::state::AppState;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().expect("invalid configuration");

    // Content provider is optional: without it the built-in catalog is used
    // and listing pages report the error state.
    let provider = match &config.sanity {
        Some(sanity) => match SanityClient::new(sanity.clone(), config.content_timeouts) {
            Ok(client) => {
                tracing::info!(project = %sanity.project_id, dataset = %sanity.dataset, "content provider configured");
                let images = ImageResolver::new(&sanity.project_id, &sanity.dataset);
                Some((Arc::new(client) as Arc<dyn ContentSource>, images))
            }
            Err(e) => {
                tracing::warn!(error = %e, "content provider unavailable; using built-in catalog");
                None
            }
        },
        None => {
            tracing::info!("SANITY_PROJECT_ID not set; using built-in catalog");
            None
        }
    };

    let catalog = match &provider {
        Some((source, _)) => content::load_catalog(source.as_ref()).await,
        None => Catalog::builtin(),
    };

    let sink = quote::sink_from_config(&config.quote_sink).expect("quote sink init failed");

    let mut state = AppState::new(catalog, sink)
        .with_page_ttl(Duration::from_secs(config.page_cache_ttl_secs))
        .with_session_idle_ttl(Duration::from_secs(config.session_idle_ttl_secs))
        .with_revalidate_secret(config.revalidate_secret.clone());
    if let Some((source, images)) = provider {
        state = state.with_content(source, images);
    }

    let app = routes::app(state, config.website_dir.as_deref());
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "hearthline listening");
    axum::serve(listener, app).await.expect("server failed");
}
