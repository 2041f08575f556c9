//! Link creation, resolution and listing service.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, is_reserved};
use crate::utils::url_normalizer::{UrlNormalizationError, normalize_url};

/// Insert attempts per shorten request before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 8;

/// Number of links listed when the caller does not ask for fewer.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Upper bound for a single listing.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Longest a redirect waits for its click to be counted.
pub const DEFAULT_INCREMENT_BUDGET: Duration = Duration::from_secs(1);

/// Extra attempts for a failed click increment, and the pause between them.
const INCREMENT_RETRIES: usize = 1;
const INCREMENT_RETRY_DELAY_MS: u64 = 10;

/// A freshly created link together with its public URL.
#[derive(Debug, Clone)]
pub struct ShortLink {
    pub link: Link,
    pub short_url: String,
}

impl ShortLink {
    pub fn code(&self) -> &str {
        &self.link.code
    }
}

/// Read-only projection of a link for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSummary {
    pub code: String,
    pub target: String,
    pub clicks: i64,
    pub short_url: String,
}

/// Service for creating, resolving and listing shortened links.
///
/// The store handle is injected; the service keeps no global state and can
/// be shared between requests behind an `Arc`.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    generator: CodeGenerator,
    max_attempts: usize,
    increment_budget: Duration,
}

impl LinkService {
    /// Creates a link service with default code length and attempt budget.
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self {
            repository,
            generator: CodeGenerator::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            increment_budget: DEFAULT_INCREMENT_BUDGET,
        }
    }

    /// Overrides the length of generated codes.
    pub fn with_code_length(mut self, length: usize) -> Self {
        self.generator = CodeGenerator::new(length);
        self
    }

    /// Overrides the number of insert attempts per shorten request.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Overrides how long [`resolve`](Self::resolve) waits for the click count.
    pub fn with_increment_budget(mut self, budget: Duration) -> Self {
        self.increment_budget = budget;
        self
    }

    /// Validates `raw_url` and stores it under a fresh random code.
    ///
    /// # Code Generation
    ///
    /// Each attempt draws a new code and inserts it. A code that is already
    /// taken is reported by the store's unique constraint and retried with a
    /// new candidate, up to the configured number of attempts.
    ///
    /// # Errors
    ///
    /// - [`AppError::EmptyInput`] if the trimmed input is empty
    /// - [`AppError::InvalidUrl`] if the normalized URL is not well-formed
    /// - [`AppError::CodeExhausted`] if every attempt collided
    /// - [`AppError::Database`] on other store failures
    pub async fn shorten(&self, raw_url: &str, origin: &str) -> Result<ShortLink, AppError> {
        let target = normalize_url(raw_url).map_err(|e| match e {
            UrlNormalizationError::Empty => AppError::EmptyInput,
            other => AppError::InvalidUrl {
                reason: other.to_string(),
            },
        })?;

        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate();
            if is_reserved(&code) {
                continue;
            }

            let new_link = NewLink::new(code, target.as_str());

            match self.repository.create(new_link).await {
                Ok(link) => {
                    info!(code = %link.code, target = %link.target, attempt, "Short link created");
                    let short_url = Self::short_url(origin, &link.code);
                    return Ok(ShortLink { link, short_url });
                }
                Err(AppError::DuplicateCode { code }) => {
                    debug!(%code, attempt, "Short code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::CodeExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Looks up the target for `code` and counts the visit.
    ///
    /// The click increment is best-effort: one failed attempt is retried, and
    /// the whole increment is cut off after the increment budget (one second
    /// by default). A redirect therefore waits at most the lookup plus that
    /// budget, even while another writer holds the database lock. A failed or
    /// abandoned increment is logged and the target is returned anyway.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Database`] if the lookup itself fails.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let link = self.get_link(code).await?;

        let strategy = FixedInterval::from_millis(INCREMENT_RETRY_DELAY_MS).take(INCREMENT_RETRIES);
        let increment = Retry::spawn(strategy, || self.repository.increment_clicks(link.id));
        match timeout(self.increment_budget, increment).await {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => warn!(code, id = link.id, "Link vanished before its click was counted"),
            Ok(Err(e)) => warn!(code, id = link.id, error = %e, "Failed to count click"),
            Err(_) => warn!(
                code,
                id = link.id,
                budget_ms = self.increment_budget.as_millis() as u64,
                "Click count timed out"
            ),
        }

        Ok(link.target)
    }

    /// Retrieves a link by its short code without counting a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    /// Returns [`AppError::Database`] on database errors.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound {
                code: code.to_string(),
            })
    }

    /// Lists the newest links with short URLs built from `origin`.
    ///
    /// `limit` is clamped to `0..=MAX_LIST_LIMIT`.
    pub async fn list_recent(&self, limit: i64, origin: &str) -> Result<Vec<LinkSummary>, AppError> {
        let limit = limit.clamp(0, MAX_LIST_LIMIT);
        let links = self.repository.list_recent(limit).await?;

        Ok(links
            .into_iter()
            .map(|link| LinkSummary {
                short_url: Self::short_url(origin, &link.code),
                code: link.code,
                target: link.target,
                clicks: link.clicks,
            })
            .collect())
    }

    /// Checks that the store answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Joins an origin and a code into the public short URL.
    pub fn short_url(origin: &str, code: &str) -> String {
        format!("{}/{}", origin.trim_end_matches('/'), code)
    }
}
