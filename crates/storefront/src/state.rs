//! Application state shared across handlers.

use std::sync::Arc;

use pineapple_sitemap_core::CommerceDataSource;

use crate::config::StorefrontConfig;
use crate::shopify::StorefrontClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the commerce data source. The data source defaults to
/// the Shopify Storefront API client; tests substitute an in-memory one.
pub struct AppState<S = StorefrontClient> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    config: StorefrontConfig,
    source: S,
}

impl AppState {
    /// Create application state backed by the Shopify Storefront API.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let storefront = StorefrontClient::new(&config.shopify);
        Self::with_source(config, storefront)
    }
}

impl<S: CommerceDataSource> AppState<S> {
    /// Create application state with an explicit data source.
    #[must_use]
    pub fn with_source(config: StorefrontConfig, source: S) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, source }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce data source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.inner.source
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
