//! Per-type, per-page sitemap generation.
//!
//! URL shape and change frequency are policy supplied by the caller through
//! [`LinkBuilder`] and [`ChangeFreqResolver`]. Both receive the item's
//! resolved type: its metaobject sub-type when present, otherwise the
//! requested resource type.

use std::num::NonZeroU32;

use crate::error::SitemapError;
use crate::render::{
    AlternateLink, SitemapUrlEntry, XmlDocument, render_url_entry, render_urlset_document,
};
use crate::source::CommerceDataSource;
use crate::types::{ChangeFrequency, ResourceItem, ResourceType};

/// Produces the canonical or locale-specific URL for one resource.
pub trait LinkBuilder: Send + Sync {
    /// Build a URL. `locale` is `None` for the canonical `<loc>`.
    fn link(&self, resource_type: &str, base_url: &str, handle: &str, locale: Option<&str>)
    -> String;
}

impl<F> LinkBuilder for F
where
    F: Fn(&str, &str, &str, Option<&str>) -> String + Send + Sync,
{
    fn link(
        &self,
        resource_type: &str,
        base_url: &str,
        handle: &str,
        locale: Option<&str>,
    ) -> String {
        self(resource_type, base_url, handle, locale)
    }
}

/// Decides the `<changefreq>` of one resource.
pub trait ChangeFreqResolver: Send + Sync {
    fn change_freq(&self, resource_type: &str, handle: &str) -> ChangeFrequency;
}

impl<F> ChangeFreqResolver for F
where
    F: Fn(&str, &str) -> ChangeFrequency + Send + Sync,
{
    fn change_freq(&self, resource_type: &str, handle: &str) -> ChangeFrequency {
        self(resource_type, handle)
    }
}

/// Builds one `<urlset>` document for a resource type and page.
pub struct SitemapPageBuilder<'a> {
    base_url: &'a str,
    link_builder: &'a dyn LinkBuilder,
    locales: &'a [String],
    change_freq: Option<&'a dyn ChangeFreqResolver>,
}

impl<'a> SitemapPageBuilder<'a> {
    /// Create a builder with no locales and the default `weekly` frequency.
    #[must_use]
    pub fn new(base_url: &'a str, link_builder: &'a dyn LinkBuilder) -> Self {
        Self {
            base_url,
            link_builder,
            locales: &[],
            change_freq: None,
        }
    }

    /// Locales to emit alternate links for, in output order.
    #[must_use]
    pub fn locales(mut self, locales: &'a [String]) -> Self {
        self.locales = locales;
        self
    }

    /// Override the default `weekly` change frequency.
    #[must_use]
    pub fn change_freq(mut self, resolver: &'a dyn ChangeFreqResolver) -> Self {
        self.change_freq = Some(resolver);
        self
    }

    /// Query one page of items and render it.
    ///
    /// # Errors
    ///
    /// Returns `SitemapError::NotFound` if the page has no items, or
    /// `SitemapError::Source` if the query failed.
    pub async fn build<S>(
        &self,
        resource_type: ResourceType,
        page: NonZeroU32,
        source: &S,
    ) -> Result<XmlDocument, SitemapError>
    where
        S: CommerceDataSource,
    {
        let items = source
            .resources(resource_type, page)
            .await
            .map_err(SitemapError::source)?
            .unwrap_or_default();

        self.render(resource_type, page, &items)
    }

    /// Render already-fetched items, in the order given.
    ///
    /// Items without a handle are skipped; they have no page to link to.
    ///
    /// # Errors
    ///
    /// Returns `SitemapError::NotFound` if no item has a handle.
    pub fn render(
        &self,
        resource_type: ResourceType,
        page: NonZeroU32,
        items: &[ResourceItem],
    ) -> Result<XmlDocument, SitemapError> {
        let entries: Vec<String> = items
            .iter()
            .filter(|item| !item.handle.is_empty())
            .map(|item| render_url_entry(&self.entry(resource_type, item)))
            .collect();

        if entries.is_empty() {
            return Err(SitemapError::NotFound {
                resource_type,
                page,
            });
        }

        Ok(render_urlset_document(entries))
    }

    /// Build the `<url>` entry for one item.
    #[must_use]
    pub fn entry(&self, resource_type: ResourceType, item: &ResourceItem) -> SitemapUrlEntry {
        let link_type = item.link_type(resource_type);

        let changefreq = self
            .change_freq
            .map_or_else(ChangeFrequency::default, |resolver| {
                resolver.change_freq(link_type, &item.handle)
            });

        let alternates = self
            .locales
            .iter()
            .map(|locale| AlternateLink {
                locale: locale.clone(),
                href: self.link_builder.link(
                    link_type,
                    self.base_url,
                    &item.handle,
                    Some(locale),
                ),
            })
            .collect();

        SitemapUrlEntry {
            loc: self
                .link_builder
                .link(link_type, self.base_url, &item.handle, None),
            lastmod: item.updated_at.clone(),
            changefreq,
            alternates,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::testing::MemoryDataSource;

    fn link(kind: &str, base: &str, handle: &str, locale: Option<&str>) -> String {
        match locale {
            Some(locale) => format!("{base}/{locale}/{kind}/{handle}"),
            None => format!("{base}/{kind}/{handle}"),
        }
    }

    fn page(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn locales(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn test_single_product_two_locales() {
        let source = MemoryDataSource::new().with_page(
            ResourceType::Products,
            vec![ResourceItem::new("a", "2024-01-01")],
        );
        let locales = locales(&["en", "fr"]);

        let doc = SitemapPageBuilder::new("https://x", &link)
            .locales(&locales)
            .build(ResourceType::Products, page(1), &source)
            .await
            .unwrap();

        let xml = doc.as_str();
        assert_eq!(xml.matches("<url>").count(), 1);
        assert!(xml.contains("<loc>https://x/products/a</loc>"));
        assert!(xml.contains("<lastmod>2024-01-01</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains(
            r#"<xhtml:link rel="alternate" hreflang="en" href="https://x/en/products/a" />"#
        ));
        assert!(xml.contains(
            r#"<xhtml:link rel="alternate" hreflang="fr" href="https://x/fr/products/a" />"#
        ));
        assert!(xml.find("hreflang=\"en\"").unwrap() < xml.find("hreflang=\"fr\"").unwrap());
    }

    #[tokio::test]
    async fn test_one_url_per_item_in_source_order() {
        let source = MemoryDataSource::new().with_page(
            ResourceType::Collections,
            vec![
                ResourceItem::new("zeta", "2024-02-01"),
                ResourceItem::new("alpha", "2024-01-01"),
                ResourceItem::new("mid", "2024-03-01"),
            ],
        );
        let locales = locales(&["en-us", "en-ca", "fr-ca"]);

        let doc = SitemapPageBuilder::new("https://x", &link)
            .locales(&locales)
            .build(ResourceType::Collections, page(1), &source)
            .await
            .unwrap();

        let xml = doc.as_str();
        assert_eq!(xml.matches("<url>").count(), 3);
        assert_eq!(xml.matches("<xhtml:link").count(), 9);
        let zeta = xml.find("/collections/zeta</loc>").unwrap();
        let alpha = xml.find("/collections/alpha</loc>").unwrap();
        let mid = xml.find("/collections/mid</loc>").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[tokio::test]
    async fn test_metaobject_sub_type_overrides_link_type() {
        let source = MemoryDataSource::new().with_page(
            ResourceType::MetaObjects,
            vec![
                ResourceItem::new("sourdough", "2024-01-01").with_sub_type("recipes"),
                ResourceItem::new("untyped", "2024-01-01"),
            ],
        );
        let locales = locales(&["fr"]);
        let seen = std::sync::Mutex::new(Vec::new());
        let resolver = |kind: &str, handle: &str| {
            seen.lock().unwrap().push(format!("{kind}:{handle}"));
            ChangeFrequency::Monthly
        };

        let doc = SitemapPageBuilder::new("https://x", &link)
            .locales(&locales)
            .change_freq(&resolver)
            .build(ResourceType::MetaObjects, page(1), &source)
            .await
            .unwrap();

        let xml = doc.as_str();
        assert!(xml.contains("<loc>https://x/recipes/sourdough</loc>"));
        assert!(xml.contains(r#"href="https://x/fr/recipes/sourdough""#));
        assert!(xml.contains("<loc>https://x/metaObjects/untyped</loc>"));
        assert_eq!(xml.matches("<changefreq>monthly</changefreq>").count(), 2);
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["recipes:sourdough", "metaObjects:untyped"]
        );
    }

    #[tokio::test]
    async fn test_lastmod_is_verbatim() {
        let source = MemoryDataSource::new().with_page(
            ResourceType::Pages,
            vec![ResourceItem::new("about", "not-a-date")],
        );

        let doc = SitemapPageBuilder::new("https://x", &link)
            .build(ResourceType::Pages, page(1), &source)
            .await
            .unwrap();

        assert!(doc.as_str().contains("<lastmod>not-a-date</lastmod>"));
    }

    #[tokio::test]
    async fn test_last_page_succeeds_next_page_not_found() {
        let source = MemoryDataSource::new()
            .with_page(ResourceType::Products, vec![ResourceItem::new("a", "2024-01-01")])
            .with_page(ResourceType::Products, vec![ResourceItem::new("b", "2024-01-01")]);
        let builder = SitemapPageBuilder::new("https://x", &link);

        assert!(builder.build(ResourceType::Products, page(2), &source).await.is_ok());

        let err = builder
            .build(ResourceType::Products, page(3), &source)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SitemapError::NotFound { resource_type: ResourceType::Products, page } if page.get() == 3
        ));
    }

    #[tokio::test]
    async fn test_empty_page_is_not_found() {
        let source = MemoryDataSource::new().with_page(ResourceType::Blogs, vec![]);
        let err = SitemapPageBuilder::new("https://x", &link)
            .build(ResourceType::Blogs, page(1), &source)
            .await
            .unwrap_err();
        assert!(matches!(err, SitemapError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_build_is_idempotent() {
        let source = MemoryDataSource::new().with_page(
            ResourceType::Articles,
            vec![
                ResourceItem::new("one", "2024-01-01"),
                ResourceItem::new("two", "2024-01-02"),
            ],
        );
        let locales = locales(&["en", "de"]);
        let builder = SitemapPageBuilder::new("https://x", &link).locales(&locales);

        let first = builder
            .build(ResourceType::Articles, page(1), &source)
            .await
            .unwrap();
        let second = builder
            .build(ResourceType::Articles, page(1), &source)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(source.resource_queries(), 2);
    }

    #[test]
    fn test_items_without_handle_are_skipped() {
        let builder = SitemapPageBuilder::new("https://x", &link);
        let items = vec![
            ResourceItem::new("", "2024-01-01"),
            ResourceItem::new("kept", "2024-01-01"),
        ];
        let doc = builder
            .render(ResourceType::Products, page(1), &items)
            .unwrap();
        assert_eq!(doc.as_str().matches("<url>").count(), 1);

        let err = builder
            .render(ResourceType::Products, page(1), &items[..1])
            .unwrap_err();
        assert!(matches!(err, SitemapError::NotFound { .. }));
    }
}
