use super::*;
use crate::error::ErrorCode;
use std::time::Duration;

/// `YYYY-MM-DDTHH:MM:SS[.fraction]Z`, dated this year.
fn assert_rfc3339_utc(timestamp: &str) {
    let bytes = timestamp.as_bytes();
    assert!(timestamp.len() >= 20, "{timestamp}");
    for (index, separator) in [(4, b'-'), (7, b'-'), (10, b'T'), (13, b':'), (16, b':')] {
        assert_eq!(bytes[index], separator, "{timestamp}");
    }
    assert!(timestamp.ends_with('Z'), "{timestamp}");
    assert!(timestamp.starts_with(&OffsetDateTime::now_utc().year().to_string()), "{timestamp}");
}

#[test]
fn secret_matches_equal_values() {
    assert!(secret_matches(Some("hush"), Some("hush")));
}

#[test]
fn secret_rejects_mismatch_and_absence() {
    assert!(!secret_matches(Some("hush"), Some("Hush")));
    assert!(!secret_matches(Some("hush"), None));
    assert!(!secret_matches(None, Some("hush")));
    assert!(!secret_matches(None, None));
}

#[tokio::test]
async fn revalidate_drops_listing_pages() {
    let pages = PageCache::new(Duration::from_secs(60));
    pages.store(LISTING_PATH, serde_json::json!(1)).await;
    pages.store(HOME_PATH, serde_json::json!(2)).await;
    pages.store("/other", serde_json::json!(3)).await;

    let timestamp = revalidate_pages(&pages, Some("hush"), Some("hush")).await.unwrap();
    assert_rfc3339_utc(&timestamp);

    assert!(pages.get_fresh(LISTING_PATH).await.is_none());
    assert!(pages.get_fresh(HOME_PATH).await.is_none());
    assert!(pages.get_fresh("/other").await.is_some());
}

#[tokio::test]
async fn revalidate_with_wrong_secret_keeps_pages() {
    let pages = PageCache::new(Duration::from_secs(60));
    pages.store(LISTING_PATH, serde_json::json!(1)).await;

    let err = revalidate_pages(&pages, Some("hush"), Some("guess")).await.unwrap_err();
    assert!(matches!(err, RevalidateError::InvalidSecret));
    assert_eq!(err.error_code(), "E_INVALID_SECRET");
    assert!(pages.get_fresh(LISTING_PATH).await.is_some());
}
