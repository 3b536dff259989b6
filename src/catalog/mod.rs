//! Catalog — paginated list and detail reads over the public creature API.
//!
//! DESIGN
//! ======
//! `client` speaks HTTP, `browser` adds pagination and caching on top of the
//! `CatalogSource` trait, `types` holds wire shapes and display records.

pub mod browser;
pub mod client;
pub mod pagination;
pub mod types;

#[cfg(test)]
pub(crate) mod fake_api;

pub use browser::{CatalogBrowser, CatalogKey};
pub use client::{CatalogClient, CatalogSource};
pub use pagination::{PageWindow, Pagination};
pub use types::{CatalogError, CatalogPage, CreatureDetail, NamedResource};
