//! Sitemap index generation.
//!
//! One batched page-count query, then one `<sitemap>` entry per resource type
//! and page, followed by any custom URLs:
//!
//! ```text
//! {base}/sitemap/products/1.xml
//! {base}/sitemap/products/2.xml
//! {base}/sitemap/pages/1.xml
//! {custom url}
//! ```

use crate::error::SitemapError;
use crate::render::{XmlDocument, render_index_document, render_index_entry};
use crate::source::CommerceDataSource;
use crate::types::{PageCounts, ResourceType};

/// Builds the `<sitemapindex>` document.
#[derive(Debug, Clone)]
pub struct SitemapIndexBuilder {
    base_url: String,
    resource_types: Vec<ResourceType>,
    custom_urls: Vec<String>,
}

impl SitemapIndexBuilder {
    /// Create a builder covering every resource type and no custom URLs.
    ///
    /// `base_url` is the storefront origin without a trailing slash.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            resource_types: ResourceType::ALL.to_vec(),
            custom_urls: Vec::new(),
        }
    }

    /// Restrict and order the resource types listed in the index.
    #[must_use]
    pub fn resource_types(mut self, resource_types: impl IntoIterator<Item = ResourceType>) -> Self {
        self.resource_types = resource_types.into_iter().collect();
        self
    }

    /// Absolute URLs appended verbatim after the generated entries.
    #[must_use]
    pub fn custom_urls<I, S>(mut self, custom_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_urls = custom_urls.into_iter().map(Into::into).collect();
        self
    }

    /// Query page counts and render the index.
    ///
    /// # Errors
    ///
    /// Returns `SitemapError::DataUnavailable` if the data source answered
    /// without data, or `SitemapError::Source` if the query failed.
    pub async fn build<S>(&self, source: &S) -> Result<XmlDocument, SitemapError>
    where
        S: CommerceDataSource,
    {
        let counts = source
            .page_counts(&self.resource_types)
            .await
            .map_err(SitemapError::source)?
            .ok_or(SitemapError::DataUnavailable)?;

        Ok(self.render(&counts))
    }

    /// Render the index from already-fetched page counts.
    #[must_use]
    pub fn render(&self, counts: &PageCounts) -> XmlDocument {
        let generated = self.resource_types.iter().flat_map(|&resource_type| {
            let count = counts.get(resource_type).unwrap_or(0);
            (1..=count).map(move |page| self.page_url(resource_type, page))
        });
        let custom = self.custom_urls.iter().cloned();

        render_index_document(
            generated
                .chain(custom)
                .map(|url| render_index_entry(&url))
                .collect::<Vec<_>>(),
        )
    }

    /// URL of one per-type page sitemap.
    #[must_use]
    pub fn page_url(&self, resource_type: ResourceType, page: u32) -> String {
        format!("{}/sitemap/{resource_type}/{page}.xml", self.base_url)
    }
}
