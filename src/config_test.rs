use super::*;
use std::collections::HashMap;

fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    AppConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn defaults_with_empty_environment() {
    let cfg = config_from(&[]).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert!(cfg.website_dir.is_none());
    assert!(cfg.sanity.is_none());
    assert!(cfg.revalidate_secret.is_none());
    assert_eq!(
        cfg.content_timeouts,
        HttpTimeouts {
            request_secs: DEFAULT_CONTENT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONTENT_CONNECT_TIMEOUT_SECS
        }
    );
    assert_eq!(cfg.page_cache_ttl_secs, DEFAULT_PAGE_CACHE_TTL_SECS);
    assert_eq!(cfg.session_idle_ttl_secs, DEFAULT_SESSION_IDLE_TTL_SECS);
    assert_eq!(cfg.quote_sink, QuoteSinkConfig::Log);
}

#[test]
fn sanity_enabled_by_project_id() {
    let cfg = config_from(&[("SANITY_PROJECT_ID", "abc123")]).unwrap();
    let sanity = cfg.sanity.unwrap();
    assert_eq!(sanity.project_id, "abc123");
    assert_eq!(sanity.dataset, DEFAULT_SANITY_DATASET);
    assert_eq!(sanity.api_version, DEFAULT_SANITY_API_VERSION);
    assert!(sanity.use_cdn);
    assert!(sanity.token.is_none());
}

#[test]
fn sanity_overrides() {
    let cfg = config_from(&[
        ("SANITY_PROJECT_ID", "abc123"),
        ("SANITY_DATASET", "staging"),
        ("SANITY_API_VERSION", "2023-05-03"),
        ("SANITY_USE_CDN", "off"),
        ("SANITY_API_TOKEN", "sk-read"),
        ("SANITY_REVALIDATE_SECRET", "hush"),
    ])
    .unwrap();
    let sanity = cfg.sanity.unwrap();
    assert_eq!(sanity.dataset, "staging");
    assert_eq!(sanity.api_version, "2023-05-03");
    assert!(!sanity.use_cdn);
    assert_eq!(sanity.token.as_deref(), Some("sk-read"));
    assert_eq!(cfg.revalidate_secret.as_deref(), Some("hush"));
}

#[test]
fn blank_values_count_as_unset() {
    let cfg = config_from(&[("SANITY_PROJECT_ID", "  "), ("PORT", ""), ("SANITY_REVALIDATE_SECRET", "")]).unwrap();
    assert!(cfg.sanity.is_none());
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert!(cfg.revalidate_secret.is_none());
}

#[test]
fn numeric_overrides_parse() {
    let cfg = config_from(&[
        ("PORT", "8080"),
        ("CONTENT_REQUEST_TIMEOUT_SECS", "30"),
        ("CONTENT_CONNECT_TIMEOUT_SECS", " 2 "),
        ("PAGE_CACHE_TTL_SECS", "0"),
        ("SESSION_IDLE_TTL_SECS", "900"),
        ("WEBSITE_DIR", "/srv/site"),
    ])
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.content_timeouts, HttpTimeouts { request_secs: 30, connect_secs: 2 });
    assert_eq!(cfg.page_cache_ttl_secs, 0);
    assert_eq!(cfg.session_idle_ttl_secs, 900);
    assert_eq!(cfg.website_dir, Some(PathBuf::from("/srv/site")));
}

#[test]
fn invalid_port_errors() {
    let err = config_from(&[("PORT", "eighty")]).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "PORT".into(), value: "eighty".into() });
}

#[test]
fn invalid_bool_errors() {
    let err = config_from(&[("SANITY_PROJECT_ID", "p"), ("SANITY_USE_CDN", "sometimes")]).unwrap_err();
    assert!(err.to_string().contains("SANITY_USE_CDN"));
}

#[test]
fn http_sink_requires_url() {
    let err = config_from(&[("QUOTE_SINK", "http")]).unwrap_err();
    assert_eq!(err, ConfigError::Missing { var: "QUOTE_SINK_URL".into() });

    let cfg = config_from(&[("QUOTE_SINK", "http"), ("QUOTE_SINK_URL", "https://crm.test/quotes")]).unwrap();
    assert_eq!(cfg.quote_sink, QuoteSinkConfig::Http { url: "https://crm.test/quotes".into() });
}

#[test]
fn email_sink_requires_all_settings() {
    let err = config_from(&[("QUOTE_SINK", "email"), ("RESEND_API_KEY", "re_123")]).unwrap_err();
    assert_eq!(err, ConfigError::Missing { var: "QUOTE_EMAIL_FROM".into() });

    let cfg = config_from(&[
        ("QUOTE_SINK", "email"),
        ("RESEND_API_KEY", "re_123"),
        ("QUOTE_EMAIL_FROM", "quotes@hearthline.test"),
        ("QUOTE_EMAIL_TO", "sales@hearthline.test"),
    ])
    .unwrap();
    assert_eq!(
        cfg.quote_sink,
        QuoteSinkConfig::Email {
            api_key: "re_123".into(),
            from: "quotes@hearthline.test".into(),
            to: "sales@hearthline.test".into()
        }
    );
}

#[test]
fn unknown_sink_kind_errors() {
    let err = config_from(&[("QUOTE_SINK", "carrier-pigeon")]).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "QUOTE_SINK".into(), value: "carrier-pigeon".into() });
}
