//! Revalidation trigger: drops cached listing renditions on CMS publish.

use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::page_cache::{HOME_PATH, LISTING_PATH, PageCache};

/// Paths re-rendered after a publish.
pub const REVALIDATED_PATHS: [&str; 2] = [LISTING_PATH, HOME_PATH];

#[derive(Debug, thiserror::Error)]
pub enum RevalidateError {
    #[error("invalid secret")]
    InvalidSecret,

    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl crate::error::ErrorCode for RevalidateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSecret => "E_INVALID_SECRET",
            Self::Timestamp(_) => "E_REVALIDATE",
        }
    }
}

/// Compare secrets through their SHA-256 digests. No configured secret matches nothing.
#[must_use]
pub fn secret_matches(expected: Option<&str>, provided: Option<&str>) -> bool {
    let (Some(expected), Some(provided)) = (expected, provided) else {
        return false;
    };
    Sha256::digest(expected.as_bytes()) == Sha256::digest(provided.as_bytes())
}

/// Authenticate the call, then drop the listing renditions.
///
/// Returns the RFC 3339 time of the revalidation.
///
/// # Errors
///
/// [`RevalidateError::InvalidSecret`] on a missing or wrong secret, or
/// [`RevalidateError::Timestamp`] if the current time cannot be formatted.
pub async fn revalidate_pages(
    pages: &PageCache,
    expected: Option<&str>,
    provided: Option<&str>,
) -> Result<String, RevalidateError> {
    if !secret_matches(expected, provided) {
        return Err(RevalidateError::InvalidSecret);
    }

    let dropped = pages.invalidate(&REVALIDATED_PATHS).await;
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;
    tracing::info!(dropped, paths = ?REVALIDATED_PATHS, "pages revalidated");
    Ok(timestamp)
}

#[cfg(test)]
#[path = "revalidation_test.rs"]
mod tests;
