//! foxsportscards1of1 storefront library.
//!
//! Server-rendered catalog, release countdowns, session cart and WhatsApp
//! checkout. The binary in `main.rs` only wires configuration, tracing and
//! the listener around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod cms;
pub mod config;
pub mod error;
pub mod filters;
pub mod home;
pub mod middleware;
pub mod order;
pub mod release;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;

use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    routing::get,
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::error::NotFoundTemplate;
use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the storefront router with every page, middleware and state.
///
/// Sentry layers are added by the binary so tests run without a client.
pub fn app(state: AppState) -> Router {
    let session_layer =
        middleware::create_session_layer(state.sessions().clone(), state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .route_service("/hero.jpg", ServeFile::new(format!("{STATIC_DIR}/hero.jpg")))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the CMS.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> (StatusCode, NotFoundTemplate) {
    (StatusCode::NOT_FOUND, NotFoundTemplate)
}
