//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the quote intake flow and the cached content pages so
//! route handlers can stay focused on protocol translation.

pub mod listing;
pub mod page_cache;
pub mod quote;
pub mod revalidation;
