//! Shopify Storefront API client for sitemap data.
//!
//! # Architecture
//!
//! - Hand-written GraphQL documents sent through `graphql_client`'s request
//!   and response envelopes, with `reqwest` for HTTP
//! - Shopify is source of truth - no local sync and no response cache; the
//!   sitemap routes set HTTP caching headers instead
//! - One request per sitemap document: a batched page-count query for the
//!   index, one resource page query per page sitemap
//!
//! # Example
//!
//! ```rust,ignore
//! use pineapple_sitemap_core::{CommerceDataSource, ResourceType};
//! use pineapple_sitemap_storefront::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config.shopify);
//! let counts = client.page_counts(&ResourceType::ALL).await?;
//! ```

mod storefront;

pub use storefront::StorefrontClient;

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Storefront API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error with only a message (transport-level failures).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(e: graphql_client::Error) -> Self {
        Self {
            message: e.message,
            locations: e.locations.map_or_else(Vec::new, |locs| {
                locs.into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect()
            }),
            path: e.path.map_or_else(Vec::new, |p| {
                p.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                        graphql_client::PathFragment::Index(i) => {
                            serde_json::Value::Number(i.into())
                        }
                    })
                    .collect()
            }),
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_formatting() {
        let err = ShopifyError::GraphQL(vec![
            GraphQLError::message("Field 'sitemap' doesn't exist on type 'QueryRoot'"),
            GraphQLError::message("Throttled"),
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field 'sitemap' doesn't exist on type 'QueryRoot'; Throttled"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 3, column: 7 }],
            path: vec![
                serde_json::Value::String("metaObjects".to_string()),
                serde_json::Value::String("pagesCount".to_string()),
            ],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: metaObjects.pagesCount at line 3:7"
        );
    }

    #[test]
    fn test_graphql_error_no_details() {
        let err = ShopifyError::GraphQL(vec![GraphQLError::message("")]);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");

        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_graphql_error_from_client_error() {
        let client_error: graphql_client::Error = serde_json::from_str(
            r#"{"message":"Invalid page","locations":[{"line":2,"column":5}],"path":["sitemap","resources",0]}"#,
        )
        .expect("valid error json");
        let err = GraphQLError::from(client_error);
        assert_eq!(err.message, "Invalid page");
        assert_eq!(err.locations.len(), 1);
        assert_eq!(err.path.len(), 3);
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(2);
        assert_eq!(err.to_string(), "Rate limited, retry after 2 seconds");
    }
}
