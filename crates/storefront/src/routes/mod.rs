//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//!
//! # Sitemaps (application/xml, Cache-Control: max-age=86400)
//! GET  /sitemap.xml                 - Sitemap index
//! GET  /sitemap/{type}/{page}.xml   - One page of one resource type
//! GET  /sitemap-empty.xml           - Placeholder sitemap listing the home page
//! ```

pub mod sitemap;

use axum::{Router, routing::get};
use pineapple_sitemap_core::CommerceDataSource;

use crate::state::AppState;

/// Create the sitemap routes router.
pub fn sitemap_routes<S>() -> Router<AppState<S>>
where
    S: CommerceDataSource + 'static,
{
    Router::new()
        .route("/sitemap.xml", get(sitemap::index::<S>))
        .route("/sitemap-empty.xml", get(sitemap::empty::<S>))
        // The page segment carries the `.xml` suffix; the handler strips it
        .route("/sitemap/{type}/{page}", get(sitemap::page::<S>))
}

/// Create all routes for the storefront.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: CommerceDataSource + 'static,
{
    Router::new()
        .route("/health", get(health))
        .merge(sitemap_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Shopify.
pub async fn health() -> &'static str {
    "ok"
}
