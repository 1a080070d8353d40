//! Sitemap XML rendering.
//!
//! Pure string formatting - no I/O. Documents are a fixed prefix, entries
//! joined by newlines, and a fixed suffix:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:xhtml="http://www.w3.org/1999/xhtml"><url>
//!   <loc>https://example.com/products/tee</loc>
//!   <lastmod>2024-01-01</lastmod>
//!   <changefreq>weekly</changefreq>
//!   <xhtml:link rel="alternate" hreflang="fr" href="https://example.com/fr/products/tee" />
//! </url></urlset>
//! ```

use std::borrow::Cow;

use crate::types::ChangeFrequency;

// ============================================================================
// Constants
// ============================================================================

// Literal forms so the envelope prefixes can be assembled with `concat!`.
macro_rules! xml_declaration {
    () => {
        r#"<?xml version="1.0" encoding="UTF-8"?>"#
    };
}

macro_rules! sitemap_ns {
    () => {
        "http://www.sitemaps.org/schemas/sitemap/0.9"
    };
}

macro_rules! xhtml_ns {
    () => {
        "http://www.w3.org/1999/xhtml"
    };
}

macro_rules! image_ns {
    () => {
        "http://www.google.com/schemas/sitemap-image/1.1"
    };
}

/// Sitemap protocol namespace.
pub const SITEMAP_NS: &str = sitemap_ns!();

/// XHTML namespace, declared for `hreflang` alternate links.
pub const XHTML_NS: &str = xhtml_ns!();

/// Google image sitemap extension namespace.
pub const IMAGE_NS: &str = image_ns!();

const XML_DECLARATION: &str = xml_declaration!();

const SITEMAP_INDEX_PREFIX: &str = concat!(
    xml_declaration!(),
    "\n<sitemapindex xmlns=\"",
    sitemap_ns!(),
    "\">"
);
const SITEMAP_INDEX_SUFFIX: &str = "</sitemapindex>";

const URLSET_PREFIX: &str = concat!(
    xml_declaration!(),
    "\n<urlset xmlns=\"",
    sitemap_ns!(),
    "\" xmlns:xhtml=\"",
    xhtml_ns!(),
    "\">"
);
const URLSET_SUFFIX: &str = "</urlset>";

// ============================================================================
// Document
// ============================================================================

/// A rendered sitemap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument(String);

impl XmlDocument {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<XmlDocument> for String {
    fn from(doc: XmlDocument) -> Self {
        doc.0
    }
}

// ============================================================================
// Entries
// ============================================================================

/// An `hreflang` alternate for one `<url>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateLink {
    pub locale: String,
    pub href: String,
}

/// One `<url>` entry of a page sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapUrlEntry {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: ChangeFrequency,
    pub alternates: Vec<AlternateLink>,
}

/// Render one `<sitemap>` entry of a sitemap index.
#[must_use]
pub fn render_index_entry(url: &str) -> String {
    format!("<sitemap><loc>{}</loc></sitemap>", escape_xml(url))
}

/// Render one `<url>` entry, with one alternate line per locale.
#[must_use]
pub fn render_url_entry(entry: &SitemapUrlEntry) -> String {
    let mut xml = String::with_capacity(160 + entry.alternates.len() * 96);

    xml.push_str("<url>\n");
    xml.push_str(&format!("  <loc>{}</loc>\n", escape_xml(&entry.loc)));
    xml.push_str(&format!("  <lastmod>{}</lastmod>\n", escape_xml(&entry.lastmod)));
    xml.push_str(&format!("  <changefreq>{}</changefreq>\n", entry.changefreq));
    for alternate in &entry.alternates {
        xml.push_str(&render_alternate_link(alternate));
        xml.push('\n');
    }
    xml.push_str("</url>");

    xml
}

/// Render one `<xhtml:link>` alternate line (indented, no trailing newline).
#[must_use]
pub fn render_alternate_link(alternate: &AlternateLink) -> String {
    format!(
        r#"  <xhtml:link rel="alternate" hreflang="{}" href="{}" />"#,
        escape_xml(&alternate.locale),
        escape_xml(&alternate.href)
    )
}

/// Wrap rendered `<sitemap>` entries in the `<sitemapindex>` envelope.
#[must_use]
pub fn render_index_document<I>(entries: I) -> XmlDocument
where
    I: IntoIterator<Item = String>,
{
    wrap(SITEMAP_INDEX_PREFIX, entries, SITEMAP_INDEX_SUFFIX)
}

/// Wrap rendered `<url>` entries in the `<urlset>` envelope.
#[must_use]
pub fn render_urlset_document<I>(entries: I) -> XmlDocument
where
    I: IntoIterator<Item = String>,
{
    wrap(URLSET_PREFIX, entries, URLSET_SUFFIX)
}

/// Placeholder sitemap listing only the storefront root.
///
/// Keeps crawlers that request every index entry from hitting an empty
/// document when a store has no content of some kind.
#[must_use]
pub fn render_empty_sitemap(base_url: &str) -> XmlDocument {
    XmlDocument(format!(
        "{XML_DECLARATION}\n<urlset xmlns=\"{SITEMAP_NS}\" xmlns:image=\"{IMAGE_NS}\">\n  <url><loc>{}/</loc></url>\n</urlset>",
        escape_xml(base_url)
    ))
}

fn wrap<I>(prefix: &str, entries: I, suffix: &str) -> XmlDocument
where
    I: IntoIterator<Item = String>,
{
    let body = entries.into_iter().collect::<Vec<_>>().join("\n");

    let mut xml = String::with_capacity(prefix.len() + body.len() + suffix.len());
    xml.push_str(prefix);
    xml.push_str(&body);
    xml.push_str(suffix);
    XmlDocument(xml)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Escape special XML characters. Borrows when nothing needs escaping.
#[must_use]
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

// ============================================================================
// Tests
// ============================================================================
