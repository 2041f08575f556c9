//! Not-found page for unknown short codes.

use askama::Template;
use askama_web::WebTemplate;

/// HTML body sent with a 404 from the redirect route.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    code: String,
}

impl NotFoundTemplate {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
