//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! - [`persistence`] - SQLite pool setup and repository implementations

pub mod persistence;
