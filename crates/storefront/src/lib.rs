//! Naked Pineapple sitemap server library.
//!
//! Serves `/sitemap.xml` and the per-type page sitemaps from the Shopify
//! Storefront API. Exposed as a library so the router can be driven
//! in-process by tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod links;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Request, Response, header::CACHE_CONTROL},
};
use pineapple_sitemap_core::CommerceDataSource;
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::state::AppState;

/// Static assets are fingerprinted at build time.
const STATIC_CACHE_CONTROL: &str = "public, max-age=31536000";

/// Build the storefront router with all middleware except Sentry.
///
/// Sentry layers are added by the binary so tests don't need a client.
pub fn app<S>(state: AppState<S>) -> Router
where
    S: CommerceDataSource + 'static,
{
    let static_files = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(STATIC_CACHE_CONTROL),
        ))
        .service(ServeDir::new(&state.config().static_dir));

    routes::routes()
        .nest_service("/static", static_files)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
}
