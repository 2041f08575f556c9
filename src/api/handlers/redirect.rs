//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::error::AppError;
use crate::state::AppState;
use crate::web::handlers::NotFoundTemplate;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the code
/// 2. Count the click (best-effort, see [`crate::application::services::LinkService::resolve`])
/// 3. Return 302 Found with `Location` set to the stored target
///
/// # Errors
///
/// Returns 404 with an HTML page if the code is unknown.
/// Returns 500 with a JSON error body on store failures.
pub async fn redirect_handler(Path(code): Path<String>, State(state): State<AppState>) -> Response {
    match state.link_service.resolve(&code).await {
        Ok(target) => found(&target),
        Err(AppError::NotFound { code }) => {
            tracing::debug!(%code, "Unknown short code");
            (StatusCode::NOT_FOUND, NotFoundTemplate::new(code)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Builds a 302 response for `target`.
///
/// The stored string is used as is when it is a legal header value,
/// otherwise its percent-encoded serialization.
fn found(target: &str) -> Response {
    let location = HeaderValue::from_str(target).ok().or_else(|| {
        Url::parse(target)
            .ok()
            .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
    });

    match location {
        Some(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        None => {
            tracing::error!(%target, "Stored target is not a valid Location header");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
