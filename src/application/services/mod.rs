//! Business logic services for the application layer.

pub mod link_service;

pub use link_service::{
    DEFAULT_INCREMENT_BUDGET, DEFAULT_LIST_LIMIT, DEFAULT_MAX_ATTEMPTS, LinkService, LinkSummary,
    MAX_LIST_LIMIT, ShortLink,
};
