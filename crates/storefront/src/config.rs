//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (its origin prefixes every sitemap URL)
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` - Storefront API private access token
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `SITEMAP_INDEX_TYPES` - Resource types listed in `/sitemap.xml`
//!   (default: products,pages,collections,articles)
//! - `SITEMAP_LOCALES` - Locales for `hreflang` alternates, comma separated (default: none)
//! - `SITEMAP_CUSTOM_URLS` - Extra index entries, comma separated
//!   (default: `{base_url}/sitemap-empty.xml`)
//! - `SITEMAP_CHANGEFREQ` - Per-type change frequency, e.g. `products=daily,pages=monthly`
//!   (default: weekly for everything)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use pineapple_sitemap_core::ResourceType;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::links::ChangeFreqPolicy;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Resource types listed in the sitemap index unless configured otherwise.
pub const DEFAULT_INDEX_TYPES: [ResourceType; 4] = [
    ResourceType::Products,
    ResourceType::Pages,
    ResourceType::Collections,
    ResourceType::Articles,
];

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public origin of the storefront, without trailing slash
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// Sitemap generation settings
    pub sitemap: SitemapConfig,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Storefront API private access token (server-side only)
    pub storefront_private_token: SecretString,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_private_token", &"[REDACTED]")
            .finish()
    }
}

/// Sitemap generation settings.
#[derive(Debug, Clone)]
pub struct SitemapConfig {
    /// Resource types listed in `/sitemap.xml`, in output order
    pub index_types: Vec<ResourceType>,
    /// Locales for `hreflang` alternate links, in output order
    pub locales: Vec<String>,
    /// Absolute URLs appended to the index verbatim
    pub custom_urls: Vec<String>,
    /// Per-type `<changefreq>` overrides
    pub change_freq: ChangeFreqPolicy,
}

impl SitemapConfig {
    /// Defaults for a storefront at `base_url`.
    #[must_use]
    pub fn with_defaults(base_url: &str) -> Self {
        Self {
            index_types: DEFAULT_INDEX_TYPES.to_vec(),
            locales: Vec::new(),
            custom_urls: vec![format!("{base_url}/sitemap-empty.xml")],
            change_freq: ChangeFreqPolicy::default(),
        }
    }
}

/// Sentry configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN; Sentry is disabled when unset
    pub dsn: Option<String>,
    /// Environment name reported with events
    pub environment: Option<String>,
    /// Error event sample rate
    pub sample_rate: f32,
    /// Performance trace sample rate
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = normalize_base_url(&get_required_env("STOREFRONT_BASE_URL")?)
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e))?;
        let static_dir =
            PathBuf::from(get_env_or_default("STOREFRONT_STATIC_DIR", "crates/storefront/static"));

        let shopify = ShopifyStorefrontConfig::from_env()?;
        let sitemap = SitemapConfig::from_env(&base_url)?;
        let sentry = SentryConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            shopify,
            sitemap,
            sentry,
        })
    }

    /// Configuration for a storefront at `base_url` with default bind
    /// address, static directory, sitemap settings, and Sentry disabled.
    #[must_use]
    pub fn new(base_url: impl Into<String>, shopify: ShopifyStorefrontConfig) -> Self {
        let base_url = base_url.into();
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            sitemap: SitemapConfig::with_defaults(&base_url),
            base_url,
            static_dir: PathBuf::from("crates/storefront/static"),
            shopify,
            sentry: SentryConfig::default(),
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyStorefrontConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store: get_required_env("SHOPIFY_STORE")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2026-01"),
            storefront_private_token: get_validated_secret("SHOPIFY_STOREFRONT_PRIVATE_TOKEN")?,
        })
    }
}

impl SitemapConfig {
    fn from_env(base_url: &str) -> Result<Self, ConfigError> {
        let mut config = Self::with_defaults(base_url);

        if let Some(value) = get_optional_env("SITEMAP_INDEX_TYPES") {
            config.index_types = parse_resource_types(&value).map_err(|e| {
                ConfigError::InvalidEnvVar("SITEMAP_INDEX_TYPES".to_string(), e)
            })?;
        }
        if let Some(value) = get_optional_env("SITEMAP_LOCALES") {
            config.locales = split_list(&value);
        }
        if let Some(value) = get_optional_env("SITEMAP_CUSTOM_URLS") {
            config.custom_urls = split_list(&value);
        }
        if let Some(value) = get_optional_env("SITEMAP_CHANGEFREQ") {
            config.change_freq = value
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("SITEMAP_CHANGEFREQ".to_string(), e))?;
        }

        Ok(config)
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a sample rate in `0.0..=1.0`.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(value) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = value
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Reduce a URL to its origin (`scheme://host[:port]`).
fn normalize_base_url(value: &str) -> Result<String, String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    if url.host_str().is_none() {
        return Err("must have a host".to_string());
    }
    Ok(url.origin().ascii_serialization())
}

/// Split a comma-separated list, dropping empty items.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a comma-separated list of resource type path segments.
fn parse_resource_types(value: &str) -> Result<Vec<ResourceType>, String> {
    split_list(value)
        .iter()
        .map(|s| s.parse::<ResourceType>().map_err(|e| e.to_string()))
        .collect()
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token issued by Shopify."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
