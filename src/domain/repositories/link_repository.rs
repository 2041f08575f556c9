//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for link records.
///
/// There is deliberately no update or delete operation: once stored, a
/// code always points at the same target.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteLinkRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the code is already taken. The
    /// check is the store's unique constraint, so it holds across concurrent
    /// requests.
    ///
    /// Returns [`AppError::Database`] on other database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Atomically adds one to the click counter of the given link.
    ///
    /// Returns `Ok(false)` if no link has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on database errors.
    async fn increment_clicks(&self, id: i64) -> Result<bool, AppError>;

    /// Lists the most recently created links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on database errors.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Link>, AppError>;

    /// Performs a trivial round-trip to the store.
    async fn ping(&self) -> Result<(), AppError>;
}
