//! Entry page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::application::services::MAX_LIST_LIMIT;

/// Template for the entry page.
///
/// Renders `templates/index.html`: a form posting to `/api/shorten` and a
/// table filled from `/api/list` by a small inline script.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
struct IndexTemplate {
    list_limit: i64,
}

/// Renders the entry page.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler() -> impl IntoResponse {
    IndexTemplate {
        list_limit: MAX_LIST_LIMIT,
    }
}
