//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pineapple_sitemap_core::SitemapError;
use thiserror::Error;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Sitemap generation failed or found nothing to render.
    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Resource not found (malformed or out-of-range path).
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Sitemap(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::Sitemap(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Capture upstream failures to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Sitemap not found");
        }

        // Don't expose upstream error details to clients
        let message = match &self {
            Self::Sitemap(SitemapError::DataUnavailable) => "No data found",
            Self::Sitemap(SitemapError::Source(_)) => "External service error",
            Self::Sitemap(_) | Self::NotFound(_) => "Not found",
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use pineapple_sitemap_core::ResourceType;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("sitemap page 0".to_string());
        assert_eq!(err.to_string(), "Not found: sitemap page 0");

        let err = AppError::from(SitemapError::DataUnavailable);
        assert_eq!(err.to_string(), "Sitemap error: No sitemap data available");
    }

    #[test]
    fn test_sitemap_errors_map_to_not_found() {
        assert_eq!(
            get_status(SitemapError::DataUnavailable.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(SitemapError::UnsupportedResourceType("widgets".to_string()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(
                SitemapError::NotFound {
                    resource_type: ResourceType::Products,
                    page: NonZeroU32::MIN,
                }
                .into()
            ),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_source_error_is_bad_gateway() {
        let err = SitemapError::source(std::io::Error::other("connection reset"));
        assert_eq!(get_status(err.into()), StatusCode::BAD_GATEWAY);
    }
}
