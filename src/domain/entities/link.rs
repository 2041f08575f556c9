//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A stored mapping from a short code to its target URL.
///
/// `id`, `code`, `target` and `created_at` never change once the record is
/// created. `clicks` only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        target: String,
        created_at: DateTime<Utc>,
        clicks: i64,
    ) -> Self {
        Self {
            id,
            code,
            target,
            created_at,
            clicks,
        }
    }

    /// Returns true if the link has never been resolved.
    pub fn is_unvisited(&self) -> bool {
        self.clicks == 0
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub target: String,
}

impl NewLink {
    pub fn new(code: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            target: target.into(),
        }
    }
}
