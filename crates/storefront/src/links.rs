//! Storefront URL shape and change-frequency policy for sitemaps.

use std::collections::HashMap;

use pineapple_sitemap_core::{ChangeFreqResolver, ChangeFrequency};

/// Build a storefront URL for a sitemap resource.
///
/// ```text
/// {base}/{type}/{handle}            canonical
/// {base}/{locale}/{type}/{handle}   alternate
/// ```
///
/// `resource_type` is the resolved type: `products`, `collections`, ... or a
/// metaobject definition type, which is used as the path segment as-is.
#[must_use]
pub fn storefront_link(
    resource_type: &str,
    base_url: &str,
    handle: &str,
    locale: Option<&str>,
) -> String {
    match locale {
        Some(locale) => format!("{base_url}/{locale}/{resource_type}/{handle}"),
        None => format!("{base_url}/{resource_type}/{handle}"),
    }
}

/// Per-type `<changefreq>` overrides.
///
/// Keys are resolved types, so metaobject definition types can be targeted
/// directly. Types without an override get `weekly`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeFreqPolicy {
    by_type: HashMap<String, ChangeFrequency>,
}

impl ChangeFreqPolicy {
    /// Set the frequency for one resolved type.
    pub fn insert(&mut self, resource_type: impl Into<String>, freq: ChangeFrequency) {
        self.by_type.insert(resource_type.into(), freq);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl ChangeFreqResolver for ChangeFreqPolicy {
    fn change_freq(&self, resource_type: &str, _handle: &str) -> ChangeFrequency {
        self.by_type
            .get(resource_type)
            .copied()
            .unwrap_or_default()
    }
}

/// Parses `type=freq` pairs separated by commas, e.g. `products=daily,pages=monthly`.
impl std::str::FromStr for ChangeFreqPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut policy = Self::default();
        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (kind, freq) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected type=frequency, got '{pair}'"))?;
            let kind = kind.trim();
            if kind.is_empty() {
                return Err(format!("missing resource type in '{pair}'"));
            }
            policy.insert(kind, freq.trim().parse()?);
        }
        Ok(policy)
    }
}
