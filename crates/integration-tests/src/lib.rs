//! Integration test harness for the sitemap server.
//!
//! Spawns the real router on an ephemeral port, backed either by an
//! in-memory data source or by the Shopify client pointed at a fake
//! GraphQL endpoint.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pineapple-sitemap-integration-tests
//!
//! # Include the live Shopify test (needs SHOPIFY_* and STOREFRONT_BASE_URL)
//! cargo test -p pineapple-sitemap-integration-tests -- --ignored
//! ```

use std::net::SocketAddr;

use axum::Router;
use pineapple_sitemap_core::CommerceDataSource;
use pineapple_sitemap_storefront::app;
use pineapple_sitemap_storefront::config::{ShopifyStorefrontConfig, StorefrontConfig};
use pineapple_sitemap_storefront::state::AppState;
use secrecy::SecretString;
use tokio::net::TcpListener;

/// Storefront origin used by tests that don't care about the value.
pub const TEST_BASE_URL: &str = "https://hydrogen.test";

/// Access token the fake Shopify endpoint expects.
pub const TEST_TOKEN: &str = "shpat_integration";

/// A server running on a background task.
#[derive(Debug, Clone, Copy)]
pub struct TestServer {
    pub addr: SocketAddr,
}

impl TestServer {
    /// Absolute URL for a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// Shopify settings for a store that is never contacted.
#[must_use]
pub fn test_shopify_config() -> ShopifyStorefrontConfig {
    ShopifyStorefrontConfig {
        store: "hydrogen-test.myshopify.com".to_string(),
        api_version: "2026-01".to_string(),
        storefront_private_token: SecretString::from(TEST_TOKEN),
    }
}

/// Config with defaults and [`TEST_BASE_URL`] as the origin.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig::new(TEST_BASE_URL, test_shopify_config())
}

/// Serve an arbitrary router on `127.0.0.1:0`.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn serve(router: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    TestServer { addr }
}

/// Spawn the sitemap server with the given data source.
pub async fn spawn_app<S>(config: StorefrontConfig, source: S) -> TestServer
where
    S: CommerceDataSource + 'static,
{
    serve(app(AppState::with_source(config, source))).await
}
