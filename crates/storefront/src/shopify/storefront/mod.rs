//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` request/response envelopes with `reqwest` 0.13 for
//! HTTP. Implements [`CommerceDataSource`] so the sitemap builders can query
//! Shopify directly.

pub mod queries;

use std::num::NonZeroU32;
use std::sync::Arc;

use graphql_client::{QueryBody, Response};
use pineapple_sitemap_core::{CommerceDataSource, PageCounts, ResourceItem, ResourceType};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::{GraphQLError, ShopifyError};

use queries::{
    NoVariables, PageVariables, SITEMAP_INDEX_QUERY, SitemapIndexData, SitemapResourcesData,
    page_counts_from, resources_query,
};

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Cheaply cloneable; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            config.store, config.api_version
        );
        Self::with_endpoint(endpoint, config.storefront_private_token.clone())
    }

    /// Create a client against an explicit GraphQL endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>, access_token: SecretString) -> Self {
        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                access_token,
            }),
        }
    }

    /// GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL document and return its `data`.
    ///
    /// Returns `Ok(None)` when Shopify answered without errors and without data.
    async fn execute<V, D>(&self, body: &QueryBody<V>) -> Result<Option<D>, ShopifyError>
    where
        V: Serialize + Sync,
        D: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            // See: https://shopify.dev/docs/storefronts/headless/building-with-the-storefront-api/getting-started
            .header(
                "Shopify-Storefront-Private-Token",
                self.inner.access_token.expose_secret(),
            )
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read the body as text first so failures can be logged
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = body.operation_name,
                body = %truncate(&response_text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
                "HTTP {status}: {}",
                truncate(&response_text, 200)
            ))]));
        }

        let response: Response<D> = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                operation = body.operation_name,
                body = %truncate(&response_text, 500),
                "Failed to parse Shopify GraphQL response"
            );
            ShopifyError::Parse(e)
        })?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(GraphQLError::from).collect(),
            ));
        }

        Ok(response.data)
    }
}

impl CommerceDataSource for StorefrontClient {
    type Error = ShopifyError;

    #[instrument(skip(self), fields(types = resource_types.len()))]
    async fn page_counts(
        &self,
        resource_types: &[ResourceType],
    ) -> Result<Option<PageCounts>, ShopifyError> {
        let body = QueryBody {
            variables: NoVariables {},
            query: SITEMAP_INDEX_QUERY,
            operation_name: "SitemapIndex",
        };

        let data: Option<SitemapIndexData> = self.execute(&body).await?;

        Ok(data.map(|data| page_counts_from(&data, resource_types)))
    }

    #[instrument(skip(self), fields(resource_type = %resource_type, page = page.get()))]
    async fn resources(
        &self,
        resource_type: ResourceType,
        page: NonZeroU32,
    ) -> Result<Option<Vec<ResourceItem>>, ShopifyError> {
        // Pages beyond GraphQL's Int range cannot exist
        let Ok(page) = i32::try_from(page.get()) else {
            debug!("Page outside GraphQL Int range");
            return Ok(None);
        };

        let (operation_name, query) = resources_query(resource_type);
        let body = QueryBody {
            variables: PageVariables { page },
            query,
            operation_name,
        };

        let data: Option<SitemapResourcesData> = self.execute(&body).await?;
        let items = data.and_then(SitemapResourcesData::into_items);

        debug!(
            items = items.as_ref().map_or(0, Vec::len),
            "Fetched sitemap resources"
        );
        Ok(items)
    }
}

/// First `max` characters of a response body, for logs and error messages.
fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
