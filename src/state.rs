//! Shared application state passed to all HTTP handlers.

use std::sync::Arc;

use crate::application::services::LinkService;

/// Application state shared across all request handlers.
///
/// Cloned per request by axum; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    /// Trust `X-Forwarded-*` headers when deriving the request origin.
    pub behind_proxy: bool,
    /// Origin used when a request carries no usable host.
    pub public_url: String,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>, behind_proxy: bool, public_url: String) -> Self {
        Self {
            link_service,
            behind_proxy,
            public_url,
        }
    }
}
