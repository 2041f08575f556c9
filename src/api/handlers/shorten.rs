//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::RequestOrigin;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "example.com/some/page" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "short": "http://localhost:3000/aZ3kP9",
///   "code": "aZ3kP9"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request for a blank, invalid or oversized URL, or an unreadable body
/// - 500 Internal Server Error if no free code was found or the store failed
pub async fn shorten_handler(
    State(state): State<AppState>,
    origin: RequestOrigin,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    payload.validate()?;

    let short = state
        .link_service
        .shorten(&payload.url, origin.as_str())
        .await?;

    Ok(Json(ShortenResponse {
        code: short.code().to_string(),
        short: short.short_url,
    }))
}
