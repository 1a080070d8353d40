//! Sitemap generation errors.

use std::num::NonZeroU32;

use thiserror::Error;

use crate::types::ResourceType;

/// Boxed error from a data source implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building a sitemap document.
///
/// Every variant is terminal for the current request: nothing is rendered
/// and nothing is retried.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// The data source returned no page counts for an index request.
    #[error("No sitemap data available")]
    DataUnavailable,

    /// The requested resource type is not one of the recognised types.
    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceType(String),

    /// The data source returned no items for the requested type and page.
    #[error("No {resource_type} found on sitemap page {page}")]
    NotFound {
        resource_type: ResourceType,
        page: NonZeroU32,
    },

    /// The data source itself failed (transport, upstream API errors).
    #[error("Data source error: {0}")]
    Source(#[source] BoxError),
}

impl SitemapError {
    /// Wrap a data source failure.
    pub fn source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Source(Box::new(err))
    }

    /// Whether this error means "no such document" rather than a failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DataUnavailable | Self::UnsupportedResourceType(_) | Self::NotFound { .. }
        )
    }
}
