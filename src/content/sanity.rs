//! Sanity query API client.
//!
//! Thin HTTP wrapper over `GET /v<version>/data/query/<dataset>`. Pure parsing
//! in `parse_response` for testability.

use std::time::Duration;

use serde::Deserialize;

use super::{ContentError, ContentQuery, ContentSource, KitchenDocument, null_default};
use crate::config::{HttpTimeouts, SanityConfig};

// =============================================================================
// CLIENT
// =============================================================================

pub struct SanityClient {
    http: reqwest::Client,
    config: SanityConfig,
}

impl SanityClient {
    /// # Errors
    ///
    /// Returns [`ContentError::HttpClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(config: SanityConfig, timeouts: HttpTimeouts) -> Result<Self, ContentError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ContentError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn query_url(&self) -> String {
        query_url(&self.config)
    }
}

/// `https://<project>.api[cdn].sanity.io/v<version>/data/query/<dataset>`.
pub(crate) fn query_url(config: &SanityConfig) -> String {
    let host = if config.use_cdn { "apicdn.sanity.io" } else { "api.sanity.io" };
    format!(
        "https://{}.{host}/v{}/data/query/{}",
        config.project_id,
        config.api_version.trim_start_matches('v'),
        config.dataset
    )
}

#[async_trait::async_trait]
impl ContentSource for SanityClient {
    async fn fetch(&self, query: &ContentQuery) -> Result<Vec<KitchenDocument>, ContentError> {
        let groq = query.to_groq();
        tracing::debug!(query = %groq, "content query");

        let mut request = self
            .http
            .get(self.query_url())
            .query(&[("query", groq.as_str())]);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ContentError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ContentError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(ContentError::Response { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default, deserialize_with = "null_default")]
    result: Vec<KitchenDocument>,
}

fn parse_response(json: &str) -> Result<Vec<KitchenDocument>, ContentError> {
    let response: QueryResponse = serde_json::from_str(json).map_err(|e| ContentError::Parse(e.to_string()))?;
    Ok(response.result)
}

#[cfg(test)]
#[path = "sanity_test.rs"]
mod tests;
