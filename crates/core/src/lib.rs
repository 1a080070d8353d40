//! Naked Pineapple Sitemap Core - Sitemap generation for the storefront.
//!
//! This crate turns commerce resource metadata (handles, update timestamps,
//! page counts) into Sitemap protocol documents:
//! - a `<sitemapindex>` linking one sitemap per resource type and page
//! - a `<urlset>` per resource type and page, with `hreflang` alternates
//!
//! # Architecture
//!
//! The core crate contains only types, traits, and pure rendering - no HTTP
//! clients and no server. Commerce data is reached through the
//! [`CommerceDataSource`] trait, which the storefront binary implements on
//! top of the Shopify Storefront API.
//!
//! # Modules
//!
//! - [`types`] - Resource types, items, page counts, change frequencies
//! - [`source`] - The two-operation data source trait
//! - [`render`] - String rendering of entries and document envelopes
//! - [`index`] - Sitemap index builder
//! - [`page`] - Per-type, per-page sitemap builder
//! - [`error`] - Sitemap generation errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod index;
pub mod page;
pub mod render;
pub mod source;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;

pub use error::SitemapError;
pub use index::SitemapIndexBuilder;
pub use page::{ChangeFreqResolver, LinkBuilder, SitemapPageBuilder};
pub use render::XmlDocument;
pub use source::CommerceDataSource;
pub use types::*;
