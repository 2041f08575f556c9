//! Handler for the recent links listing.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use validator::Validate;

use crate::api::dto::list::{LinkListItem, ListQuery};
use crate::application::services::DEFAULT_LIST_LIMIT;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::RequestOrigin;

/// Lists the most recently created links, newest first.
///
/// # Endpoint
///
/// `GET /api/list?limit=20`
///
/// `limit` is optional (1 to 100, default 100). Short URLs are built from
/// the origin of this request.
///
/// # Response
///
/// ```json
/// [
///   {
///     "code": "aZ3kP9",
///     "target": "https://example.com",
///     "url": "https://example.com",
///     "clicks": 2,
///     "short": "http://localhost:3000/aZ3kP9"
///   }
/// ]
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed or out-of-range `limit`.
pub async fn list_handler(
    State(state): State<AppState>,
    origin: RequestOrigin,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<LinkListItem>>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    query.validate()?;

    let links = state
        .link_service
        .list_recent(query.limit.unwrap_or(DEFAULT_LIST_LIMIT), origin.as_str())
        .await?;

    Ok(Json(links.into_iter().map(LinkListItem::from).collect()))
}
