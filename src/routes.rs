//! Top-level router configuration combining API, redirect and web routes.
//!
//! # Route Structure
//!
//! - `GET  /`             - Entry page
//! - `GET  /health`       - Health check
//! - `POST /api/shorten`  - Create a short link
//! - `GET  /api/list`     - Recent links
//! - `GET  /{code}`       - Short link redirect
//!
//! Static routes win over `/{code}`, which is why `api` and `health` are
//! never generated as codes.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use crate::web;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All routes with tracing, without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(web::routes::routes())
        .route("/health", get(health_handler))
        .nest("/api", api::routes::routes())
        .route("/{code}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application service served by [`crate::server::run`].
///
/// Trailing slashes are trimmed before routing, so `/abc123/` resolves
/// like `/abc123`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
