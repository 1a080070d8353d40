//! Sitemap-eligible commerce resources.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SitemapError;

/// Category of content eligible for sitemap inclusion.
///
/// The string form (see [`ResourceType::as_str`]) is the path segment used in
/// `/sitemap/{type}/{page}.xml` URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
    Products,
    Collections,
    Articles,
    Pages,
    Blogs,
    MetaObjects,
}

impl ResourceType {
    /// Every resource type, in the default index order.
    pub const ALL: [Self; 6] = [
        Self::Products,
        Self::Collections,
        Self::Articles,
        Self::Pages,
        Self::Blogs,
        Self::MetaObjects,
    ];

    /// Path segment for this resource type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Collections => "collections",
            Self::Articles => "articles",
            Self::Pages => "pages",
            Self::Blogs => "blogs",
            Self::MetaObjects => "metaObjects",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = SitemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SitemapError::UnsupportedResourceType(s.to_string()))
    }
}

/// A single sitemap-eligible entity returned by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceItem {
    /// URL path segment identifying the resource.
    pub handle: String,
    /// Last update timestamp, emitted verbatim as `<lastmod>`.
    pub updated_at: String,
    /// Metaobject definition type; replaces the requested resource type
    /// when building this item's links.
    #[serde(rename = "type", default)]
    pub sub_type: Option<String>,
}

impl ResourceItem {
    /// Create an item without a sub-type.
    pub fn new(handle: impl Into<String>, updated_at: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            updated_at: updated_at.into(),
            sub_type: None,
        }
    }

    /// Set the metaobject sub-type.
    #[must_use]
    pub fn with_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = Some(sub_type.into());
        self
    }

    /// Type string used for this item's links: its own sub-type when present,
    /// otherwise the requested resource type.
    #[must_use]
    pub fn link_type(&self, requested: ResourceType) -> &str {
        self.sub_type.as_deref().unwrap_or_else(|| requested.as_str())
    }
}

/// Page counts per resource type, as returned by one batched query.
///
/// A type absent from the map was not reported by the data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCounts {
    counts: HashMap<ResourceType, u32>,
}

impl PageCounts {
    /// Create an empty set of counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the page count for a resource type.
    pub fn insert(&mut self, resource_type: ResourceType, count: u32) {
        self.counts.insert(resource_type, count);
    }

    /// Page count for a resource type, if the data source reported one.
    #[must_use]
    pub fn get(&self, resource_type: ResourceType) -> Option<u32> {
        self.counts.get(&resource_type).copied()
    }

    /// Whether no resource type was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(ResourceType, u32)> for PageCounts {
    fn from_iter<I: IntoIterator<Item = (ResourceType, u32)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}
