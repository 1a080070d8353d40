//! GraphQL documents and response shapes for Storefront API sitemap queries.

use std::collections::HashMap;

use pineapple_sitemap_core::{PageCounts, ResourceItem, ResourceType};
use serde::{Deserialize, Serialize};

/// Page counts for every resource type in one request. Aliases match
/// `ResourceType`'s path segments so the response keys deserialize directly.
pub const SITEMAP_INDEX_QUERY: &str = r"query SitemapIndex {
  products: sitemap(type: PRODUCT) { pagesCount { count } }
  collections: sitemap(type: COLLECTION) { pagesCount { count } }
  articles: sitemap(type: ARTICLE) { pagesCount { count } }
  pages: sitemap(type: PAGE) { pagesCount { count } }
  blogs: sitemap(type: BLOG) { pagesCount { count } }
  metaObjects: sitemap(type: METAOBJECT) { pagesCount { count } }
}";

const PRODUCT_SITEMAP_QUERY: &str = r"query SitemapProducts($page: Int!) {
  sitemap(type: PRODUCT) { resources(page: $page) { items { handle updatedAt } } }
}";

const COLLECTION_SITEMAP_QUERY: &str = r"query SitemapCollections($page: Int!) {
  sitemap(type: COLLECTION) { resources(page: $page) { items { handle updatedAt } } }
}";

const ARTICLE_SITEMAP_QUERY: &str = r"query SitemapArticles($page: Int!) {
  sitemap(type: ARTICLE) { resources(page: $page) { items { handle updatedAt } } }
}";

const PAGE_SITEMAP_QUERY: &str = r"query SitemapPages($page: Int!) {
  sitemap(type: PAGE) { resources(page: $page) { items { handle updatedAt } } }
}";

const BLOG_SITEMAP_QUERY: &str = r"query SitemapBlogs($page: Int!) {
  sitemap(type: BLOG) { resources(page: $page) { items { handle updatedAt } } }
}";

const METAOBJECT_SITEMAP_QUERY: &str = r"query SitemapMetaobjects($page: Int!) {
  sitemap(type: METAOBJECT) {
    resources(page: $page) {
      items {
        handle
        updatedAt
        ... on SitemapResourceMetaobject { type }
      }
    }
  }
}";

/// Operation name and document for one page of a resource type.
#[must_use]
pub const fn resources_query(resource_type: ResourceType) -> (&'static str, &'static str) {
    match resource_type {
        ResourceType::Products => ("SitemapProducts", PRODUCT_SITEMAP_QUERY),
        ResourceType::Collections => ("SitemapCollections", COLLECTION_SITEMAP_QUERY),
        ResourceType::Articles => ("SitemapArticles", ARTICLE_SITEMAP_QUERY),
        ResourceType::Pages => ("SitemapPages", PAGE_SITEMAP_QUERY),
        ResourceType::Blogs => ("SitemapBlogs", BLOG_SITEMAP_QUERY),
        ResourceType::MetaObjects => ("SitemapMetaobjects", METAOBJECT_SITEMAP_QUERY),
    }
}

// =============================================================================
// Variables
// =============================================================================

/// The index query takes no variables.
#[derive(Debug, Serialize)]
pub struct NoVariables {}

/// Variables for resource page queries.
///
/// GraphQL `Int` is a signed 32-bit integer.
#[derive(Debug, Serialize)]
pub struct PageVariables {
    pub page: i32,
}

// =============================================================================
// Responses
// =============================================================================

/// `data` of the index query, keyed by alias.
pub type SitemapIndexData = HashMap<ResourceType, Option<SitemapPagesCount>>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapPagesCount {
    pub pages_count: Option<Count>,
}

#[derive(Debug, Deserialize)]
pub struct Count {
    pub count: u32,
}

/// Keep only the requested types that Shopify reported a count for.
#[must_use]
pub fn page_counts_from(data: &SitemapIndexData, requested: &[ResourceType]) -> PageCounts {
    requested
        .iter()
        .filter_map(|kind| {
            let count = data
                .get(kind)?
                .as_ref()?
                .pages_count
                .as_ref()?
                .count;
            Some((*kind, count))
        })
        .collect()
}

/// `data` of a resource page query.
#[derive(Debug, Deserialize)]
pub struct SitemapResourcesData {
    pub sitemap: Option<SitemapResources>,
}

#[derive(Debug, Deserialize)]
pub struct SitemapResources {
    pub resources: Option<ResourcePage>,
}

#[derive(Debug, Deserialize)]
pub struct ResourcePage {
    pub items: Vec<ResourceItem>,
}

impl SitemapResourcesData {
    /// Items on the page, or `None` if Shopify returned no page.
    #[must_use]
    pub fn into_items(self) -> Option<Vec<ResourceItem>> {
        self.sitemap?.resources.map(|page| page.items)
    }
}
