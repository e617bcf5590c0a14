//! Outdoor kitchen configurator service.
//!
//! Visitors step through a four-step wizard (model, modules, materials,
//! contact) against a shared option catalog, see a running price, and submit
//! a quote request. Catalog content and listing pages come from a headless
//! CMS when one is configured.

pub mod catalog;
pub mod config;
pub mod configurator;
pub mod content;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
