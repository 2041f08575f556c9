//! DTOs for the recent links listing.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::LinkSummary;

/// Query parameters for `GET /api/list`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

/// One entry of the listing.
///
/// `target` and `url` carry the same value; both names are part of the
/// response format.
#[derive(Debug, Serialize)]
pub struct LinkListItem {
    pub code: String,
    pub target: String,
    pub url: String,
    pub clicks: i64,
    pub short: String,
}

impl From<LinkSummary> for LinkListItem {
    fn from(summary: LinkSummary) -> Self {
        Self {
            code: summary.code,
            url: summary.target.clone(),
            target: summary.target,
            clicks: summary.clicks,
            short: summary.short_url,
        }
    }
}
