//! Sitemap route handlers.
//!
//! Delegates to the core builders and attaches the XML content type and a
//! one-day cache lifetime. Builder errors become 404s (see `AppError`).

use std::num::NonZeroU32;

use axum::{
    extract::{Path, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE, VARY},
    response::{IntoResponse, Response},
};
use pineapple_sitemap_core::{
    CommerceDataSource, ResourceType, SitemapIndexBuilder, SitemapPageBuilder, XmlDocument,
    render::render_empty_sitemap,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::links::storefront_link;
use crate::state::AppState;

/// Sitemaps are regenerated at most once a day by downstream caches.
pub const SITEMAP_CACHE_CONTROL: &str = "max-age=86400";

const XML_CONTENT_TYPE: &str = "application/xml";

/// `GET /sitemap.xml`
#[instrument(skip(state))]
pub async fn index<S>(State(state): State<AppState<S>>) -> Result<Response>
where
    S: CommerceDataSource + 'static,
{
    let config = state.config();

    let doc = SitemapIndexBuilder::new(config.base_url.as_str())
        .resource_types(config.sitemap.index_types.iter().copied())
        .custom_urls(config.sitemap.custom_urls.iter().cloned())
        .build(state.source())
        .await?;

    let mut response = xml_response(doc);
    response.headers_mut().insert(
        VARY,
        axum::http::HeaderValue::from_static("Accept-Encoding, Accept-Language"),
    );
    Ok(response)
}

/// `GET /sitemap/{type}/{page}.xml`
#[instrument(skip(state))]
pub async fn page<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, page)): Path<(String, String)>,
) -> Result<Response>
where
    S: CommerceDataSource + 'static,
{
    let resource_type = resource_type.parse::<ResourceType>()?;
    let page = parse_page_segment(&page)
        .ok_or_else(|| AppError::NotFound(format!("sitemap page segment '{page}'")))?;

    let config = state.config();
    let link_builder = storefront_link;
    let mut builder = SitemapPageBuilder::new(&config.base_url, &link_builder)
        .locales(&config.sitemap.locales);
    if !config.sitemap.change_freq.is_empty() {
        builder = builder.change_freq(&config.sitemap.change_freq);
    }

    let doc = builder.build(resource_type, page, state.source()).await?;

    Ok(xml_response(doc))
}

/// `GET /sitemap-empty.xml`
pub async fn empty<S>(State(state): State<AppState<S>>) -> Response
where
    S: CommerceDataSource + 'static,
{
    xml_response(render_empty_sitemap(&state.config().base_url))
}

/// Parse a `{page}.xml` path segment into a 1-indexed page number.
///
/// Only the canonical spelling is accepted: ASCII digits without a sign or
/// leading zeros, within GraphQL's 32-bit signed `Int`.
fn parse_page_segment(segment: &str) -> Option<NonZeroU32> {
    let digits = segment.strip_suffix(".xml")?;
    if !digits.starts_with(|c: char| matches!(c, '1'..='9'))
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let page = digits.parse::<i32>().ok()?;
    NonZeroU32::new(u32::try_from(page).ok()?)
}

fn xml_response(doc: XmlDocument) -> Response {
    (
        [
            (CONTENT_TYPE, XML_CONTENT_TYPE),
            (CACHE_CONTROL, SITEMAP_CACHE_CONTROL),
        ],
        doc.into_string(),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use pineapple_sitemap_core::ResourceItem;
    use pineapple_sitemap_core::testing::MemoryDataSource;
    use secrecy::SecretString;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{ShopifyStorefrontConfig, StorefrontConfig};
    use crate::routes::routes;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig::new(
            "https://shop.test",
            ShopifyStorefrontConfig {
                store: "shop-test.myshopify.com".to_string(),
                api_version: "2026-01".to_string(),
                storefront_private_token: SecretString::from("shpat_test"),
            },
        )
    }

    fn app(config: StorefrontConfig, source: MemoryDataSource) -> Router {
        routes().with_state(AppState::with_source(config, source))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn test_parse_page_segment() {
        assert_eq!(parse_page_segment("1.xml"), NonZeroU32::new(1));
        assert_eq!(parse_page_segment("12.xml"), NonZeroU32::new(12));
        assert_eq!(parse_page_segment("0.xml"), None);
        assert_eq!(parse_page_segment("1"), None);
        assert_eq!(parse_page_segment("one.xml"), None);
        assert_eq!(parse_page_segment("-1.xml"), None);
    }

    #[test]
    fn test_parse_page_segment_rejects_aliases() {
        assert_eq!(parse_page_segment("+1.xml"), None);
        assert_eq!(parse_page_segment("01.xml"), None);
        assert_eq!(parse_page_segment(" 1.xml"), None);
        assert_eq!(parse_page_segment(".xml"), None);
    }

    #[test]
    fn test_parse_page_segment_fits_graphql_int() {
        assert_eq!(parse_page_segment("2147483647.xml"), NonZeroU32::new(2_147_483_647));
        assert_eq!(parse_page_segment("2147483648.xml"), None);
        assert_eq!(parse_page_segment("3000000000.xml"), None);
        assert_eq!(parse_page_segment("99999999999.xml"), None);
    }

    #[tokio::test]
    async fn test_index_uses_configured_types_and_custom_urls() {
        let source = MemoryDataSource::new()
            .with_page_count(ResourceType::Products, 2)
            .with_page_count(ResourceType::Pages, 1)
            .with_page_count(ResourceType::Blogs, 5);

        let (status, headers, body) = get(app(test_config(), source), "/sitemap.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CONTENT_TYPE], "application/xml");
        assert_eq!(headers[CACHE_CONTROL], "max-age=86400");
        assert_eq!(headers[VARY], "Accept-Encoding, Accept-Language");

        assert!(body.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(body.contains("<loc>https://shop.test/sitemap/products/2.xml</loc>"));
        assert!(body.contains("<loc>https://shop.test/sitemap/pages/1.xml</loc>"));
        // blogs are not in the default index types
        assert!(!body.contains("/sitemap/blogs/"));
        assert!(body.ends_with(
            "<sitemap><loc>https://shop.test/sitemap-empty.xml</loc></sitemap></sitemapindex>"
        ));
    }

    #[tokio::test]
    async fn test_index_without_data_is_404() {
        let (status, _, body) = get(app(test_config(), MemoryDataSource::new()), "/sitemap.xml").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "No data found");
    }

    #[tokio::test]
    async fn test_index_upstream_failure_is_502() {
        let source = MemoryDataSource::new().failing();
        let (status, _, body) = get(app(test_config(), source), "/sitemap.xml").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, "External service error");
    }

    #[tokio::test]
    async fn test_page_renders_locales_and_change_freq() {
        let source = MemoryDataSource::new().with_page(
            ResourceType::Products,
            vec![ResourceItem::new("pineapple-tee", "2024-06-01T00:00:00Z")],
        );
        let mut config = test_config();
        config.sitemap.locales = vec!["en-ca".to_string(), "fr-ca".to_string()];
        config.sitemap.change_freq = "products=daily".parse().unwrap();

        let (status, headers, body) =
            get(app(config, source), "/sitemap/products/1.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CONTENT_TYPE], "application/xml");
        assert_eq!(headers[CACHE_CONTROL], "max-age=86400");
        assert!(headers.get(VARY).is_none());
        assert!(body.contains("<loc>https://shop.test/products/pineapple-tee</loc>"));
        assert!(body.contains("<lastmod>2024-06-01T00:00:00Z</lastmod>"));
        assert!(body.contains("<changefreq>daily</changefreq>"));
        assert!(body.contains(
            r#"<xhtml:link rel="alternate" hreflang="fr-ca" href="https://shop.test/fr-ca/products/pineapple-tee" />"#
        ));
        assert_eq!(body.matches("<xhtml:link").count(), 2);
    }

    #[tokio::test]
    async fn test_page_metaobject_uses_sub_type_path() {
        let source = MemoryDataSource::new().with_page(
            ResourceType::MetaObjects,
            vec![ResourceItem::new("sourdough", "2024-01-01").with_sub_type("recipes")],
        );

        let (status, _, body) = get(app(test_config(), source), "/sitemap/metaObjects/1.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<loc>https://shop.test/recipes/sourdough</loc>"));
        assert!(body.contains("<changefreq>weekly</changefreq>"));
    }

    #[tokio::test]
    async fn test_page_past_last_is_404() {
        let source = MemoryDataSource::new()
            .with_page(ResourceType::Pages, vec![ResourceItem::new("about", "2024-01-01")]);
        let app = app(test_config(), source);

        let (status, _, _) = get(app.clone(), "/sitemap/pages/1.xml").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, body) = get(app, "/sitemap/pages/2.xml").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found");
    }

    #[tokio::test]
    async fn test_unsupported_type_is_404_without_query() {
        let source = MemoryDataSource::new();
        let (status, _, body) =
            get(app(test_config(), source.clone()), "/sitemap/prodcuts/1.xml").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found");
        assert_eq!(source.resource_queries(), 0);
    }

    #[tokio::test]
    async fn test_malformed_page_is_404() {
        let source = MemoryDataSource::new().with_page(
            ResourceType::Products,
            vec![ResourceItem::new("pineapple-tee", "2024-06-01")],
        );
        for uri in [
            "/sitemap/products/0.xml",
            "/sitemap/products/1",
            "/sitemap/products/x.xml",
            "/sitemap/products/+1.xml",
            "/sitemap/products/01.xml",
            "/sitemap/products/2147483648.xml",
        ] {
            let (status, _, _) = get(app(test_config(), source.clone()), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }
        // rejected before any upstream query
        assert_eq!(source.resource_queries(), 0);
    }

    #[tokio::test]
    async fn test_empty_sitemap() {
        let (status, headers, body) =
            get(app(test_config(), MemoryDataSource::new()), "/sitemap-empty.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CACHE_CONTROL], "max-age=86400");
        assert!(body.contains("<url><loc>https://shop.test/</loc></url>"));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = get(app(test_config(), MemoryDataSource::new()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
