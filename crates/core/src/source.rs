//! Commerce data source abstraction.
//!
//! The builders issue exactly one call per document: [`page_counts`] for the
//! index, [`resources`] for a page. Implementations decide how that call
//! reaches the commerce backend (the storefront uses one batched GraphQL
//! request per call).
//!
//! [`page_counts`]: CommerceDataSource::page_counts
//! [`resources`]: CommerceDataSource::resources

use std::future::Future;
use std::num::NonZeroU32;

use crate::types::{PageCounts, ResourceItem, ResourceType};

/// Query interface over paginated commerce resource metadata.
pub trait CommerceDataSource: Send + Sync {
    /// Error raised when the backend cannot be reached or rejects the query.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Page counts for every requested resource type, in one round-trip.
    ///
    /// Returns `Ok(None)` when the backend answered without data.
    fn page_counts(
        &self,
        resource_types: &[ResourceType],
    ) -> impl Future<Output = Result<Option<PageCounts>, Self::Error>> + Send;

    /// Items on one 1-indexed page of a resource type, in backend order.
    ///
    /// Returns `Ok(None)` when the backend answered without data.
    fn resources(
        &self,
        resource_type: ResourceType,
        page: NonZeroU32,
    ) -> impl Future<Output = Result<Option<Vec<ResourceItem>>, Self::Error>> + Send;
}
