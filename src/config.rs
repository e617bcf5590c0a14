//! Service configuration parsed from environment variables.
//!
//! `main` loads an optional `.env` file first, then reads everything here.
//! Parsing goes through a key lookup closure so tests never touch the
//! process environment.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SANITY_DATASET: &str = "production";
pub const DEFAULT_SANITY_API_VERSION: &str = "2024-01-01";
pub const DEFAULT_CONTENT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CONTENT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_PAGE_CACHE_TTL_SECS: u64 = 60;
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 3600;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {var}")]
    Missing { var: String },

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Connection settings for the Sanity content lake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteSinkKind {
    Log,
    Http,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteSinkConfig {
    /// Log payloads only.
    Log,
    /// POST payloads as JSON to `url`.
    Http { url: String },
    /// Email the summary through Resend.
    Email { api_key: String, from: String, to: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub website_dir: Option<PathBuf>,
    pub sanity: Option<SanityConfig>,
    pub revalidate_secret: Option<String>,
    pub content_timeouts: HttpTimeouts,
    pub page_cache_ttl_secs: u64,
    pub session_idle_ttl_secs: u64,
    pub quote_sink: QuoteSinkConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// Optional:
    /// - `PORT`: listen port (default 3000)
    /// - `WEBSITE_DIR`: static site served for unmatched paths
    /// - `SANITY_PROJECT_ID`: enables the content provider
    /// - `SANITY_DATASET` (default `production`), `SANITY_API_VERSION`,
    ///   `SANITY_USE_CDN` (default true), `SANITY_API_TOKEN`
    /// - `SANITY_REVALIDATE_SECRET`: required for the revalidation webhook to accept calls
    /// - `CONTENT_REQUEST_TIMEOUT_SECS` (default 15), `CONTENT_CONNECT_TIMEOUT_SECS` (default 5)
    /// - `PAGE_CACHE_TTL_SECS`: ISR window (default 60)
    /// - `SESSION_IDLE_TTL_SECS`: untouched sessions are dropped after this long (default 3600)
    /// - `QUOTE_SINK`: `log` (default), `http`, or `email`
    /// - `QUOTE_SINK_URL` (http), `RESEND_API_KEY` + `QUOTE_EMAIL_FROM` + `QUOTE_EMAIL_TO` (email)
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unparseable values or a sink missing its settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or(&get, "PORT", DEFAULT_PORT)?;
        let website_dir = get("WEBSITE_DIR").map(PathBuf::from);

        let sanity = match get("SANITY_PROJECT_ID") {
            Some(project_id) => Some(SanityConfig {
                project_id,
                dataset: get("SANITY_DATASET").unwrap_or_else(|| DEFAULT_SANITY_DATASET.into()),
                api_version: get("SANITY_API_VERSION").unwrap_or_else(|| DEFAULT_SANITY_API_VERSION.into()),
                use_cdn: parse_bool(&get, "SANITY_USE_CDN")?.unwrap_or(true),
                token: get("SANITY_API_TOKEN"),
            }),
            None => None,
        };

        let content_timeouts = HttpTimeouts {
            request_secs: parse_or(&get, "CONTENT_REQUEST_TIMEOUT_SECS", DEFAULT_CONTENT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_or(&get, "CONTENT_CONNECT_TIMEOUT_SECS", DEFAULT_CONTENT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self {
            port,
            website_dir,
            sanity,
            revalidate_secret: get("SANITY_REVALIDATE_SECRET"),
            content_timeouts,
            page_cache_ttl_secs: parse_or(&get, "PAGE_CACHE_TTL_SECS", DEFAULT_PAGE_CACHE_TTL_SECS)?,
            session_idle_ttl_secs: parse_or(&get, "SESSION_IDLE_TTL_SECS", DEFAULT_SESSION_IDLE_TTL_SECS)?,
            quote_sink: quote_sink_config(&get)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var: key.into(), value: raw }),
        None => Ok(default),
    }
}

fn parse_bool(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = get(key) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Invalid { var: key.into(), value: raw }),
    }
}

fn parse_sink_kind(raw: Option<&str>) -> Result<QuoteSinkKind, ConfigError> {
    match raw.map(str::trim).unwrap_or("log") {
        "log" => Ok(QuoteSinkKind::Log),
        "http" => Ok(QuoteSinkKind::Http),
        "email" => Ok(QuoteSinkKind::Email),
        other => Err(ConfigError::Invalid { var: "QUOTE_SINK".into(), value: other.into() }),
    }
}

fn quote_sink_config(get: &impl Fn(&str) -> Option<String>) -> Result<QuoteSinkConfig, ConfigError> {
    let require = |key: &str| get(key).ok_or_else(|| ConfigError::Missing { var: key.into() });

    match parse_sink_kind(get("QUOTE_SINK").as_deref())? {
        QuoteSinkKind::Log => Ok(QuoteSinkConfig::Log),
        QuoteSinkKind::Http => Ok(QuoteSinkConfig::Http { url: require("QUOTE_SINK_URL")? }),
        QuoteSinkKind::Email => Ok(QuoteSinkConfig::Email {
            api_key: require("RESEND_API_KEY")?,
            from: require("QUOTE_EMAIL_FROM")?,
            to: require("QUOTE_EMAIL_TO")?,
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
