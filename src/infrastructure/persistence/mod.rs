//! SQLite persistence.
//!
//! - [`pool`] - Connection pool setup and embedded migrations
//! - [`SqliteLinkRepository`] - Link storage and retrieval

pub mod pool;
pub mod sqlite_link_repository;

pub use pool::{PoolSettings, connect, run_migrations};
pub use sqlite_link_repository::SqliteLinkRepository;
