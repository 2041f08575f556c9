//! # snaplink
//!
//! A small URL shortening service built with Axum and SQLite.
//!
//! Long URLs are stored under random six character codes; visiting
//! `/{code}` redirects to the target and counts the click.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - The `Link` entity and the repository trait
//! - **Application Layer** ([`application`]) - [`LinkService`](application::services::LinkService):
//!   normalization, code allocation, resolution and listing
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite pool, migrations and repository
//! - **API Layer** ([`api`]) - JSON endpoints, the redirect and the health probe
//! - **Web Layer** ([`web`]) - HTML entry page and not-found page
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://shortener.db"   # optional, this is the default
//! cargo run
//!
//! curl -X POST localhost:3000/api/shorten \
//!      -H 'Content-Type: application/json' \
//!      -d '{"url":"example.com"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, LinkSummary, ShortLink};
    pub use crate::domain::entities::{Link, NewLink};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
