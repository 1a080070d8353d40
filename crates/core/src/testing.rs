//! In-memory data source for tests.
//!
//! Enabled with the `testing` feature so the storefront and integration tests
//! can exercise the builders and routes without a Shopify store.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::source::CommerceDataSource;
use crate::types::{PageCounts, ResourceItem, ResourceType};

/// Error returned by a [`MemoryDataSource`] configured with [`failing`].
///
/// [`failing`]: MemoryDataSource::failing
#[derive(Debug, thiserror::Error)]
#[error("memory data source unavailable")]
pub struct MemorySourceError;

/// Data source backed by fixed page counts and pages.
///
/// Clones share the query counters.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataSource {
    counts: Option<PageCounts>,
    pages: HashMap<ResourceType, Vec<Vec<ResourceItem>>>,
    failing: bool,
    page_count_queries: Arc<AtomicUsize>,
    resource_queries: Arc<AtomicUsize>,
}

impl MemoryDataSource {
    /// Source with no data: index queries answer `None`, pages answer `None`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `count` pages for a resource type.
    #[must_use]
    pub fn with_page_count(mut self, resource_type: ResourceType, count: u32) -> Self {
        self.counts
            .get_or_insert_with(PageCounts::new)
            .insert(resource_type, count);
        self
    }

    /// Append the next page of items for a resource type.
    ///
    /// Also reports the resulting number of pages in the page counts.
    #[must_use]
    pub fn with_page(mut self, resource_type: ResourceType, items: Vec<ResourceItem>) -> Self {
        let pages = self.pages.entry(resource_type).or_default();
        pages.push(items);
        let count = u32::try_from(pages.len()).unwrap_or(u32::MAX);
        self.with_page_count(resource_type, count)
    }

    /// Make every query fail.
    #[must_use]
    pub const fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Number of `page_counts` calls made so far.
    #[must_use]
    pub fn page_count_queries(&self) -> usize {
        self.page_count_queries.load(Ordering::SeqCst)
    }

    /// Number of `resources` calls made so far.
    #[must_use]
    pub fn resource_queries(&self) -> usize {
        self.resource_queries.load(Ordering::SeqCst)
    }
}

/// Failure mode shared by both operations.
type MemoryResult<T> = Result<T, MemorySourceError>;

impl CommerceDataSource for MemoryDataSource {
    type Error = MemorySourceError;

    async fn page_counts(&self, resource_types: &[ResourceType]) -> MemoryResult<Option<PageCounts>> {
        self.page_count_queries.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(MemorySourceError);
        }

        Ok(self.counts.as_ref().map(|counts| {
            resource_types
                .iter()
                .filter_map(|&kind| counts.get(kind).map(|count| (kind, count)))
                .collect()
        }))
    }

    async fn resources(
        &self,
        resource_type: ResourceType,
        page: NonZeroU32,
    ) -> MemoryResult<Option<Vec<ResourceItem>>> {
        self.resource_queries.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(MemorySourceError);
        }

        let index = usize::try_from(page.get() - 1).unwrap_or(usize::MAX);
        Ok(self
            .pages
            .get(&resource_type)
            .and_then(|pages| pages.get(index))
            .cloned())
    }
}
