//! API route configuration.

use crate::api::handlers::{list_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// JSON API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten` - Create a short link
/// - `GET  /list`    - Most recent links, newest first
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/list", get(list_handler))
}
