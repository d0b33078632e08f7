//! Data models exchanged between the extractor and the backend.
//!
//! - [`Record`]: one story from the front page
//! - [`ScrapePayload`]: the `{"items": [...]}` body posted to `/api/scrape`
//! - [`BackendAck`]: the acknowledgement the backend answers with

use serde::{Deserialize, Serialize};

/// Format of [`Record::scraped_at`], e.g. `2025-05-06 14:30:00`.
pub const SCRAPED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One story extracted from the front page.
///
/// Field names match what the backend expects in `POST /api/scrape`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Record {
    /// 1-based position, as displayed on the page or by row order.
    pub rank: u32,
    /// Trimmed, never empty.
    pub title: String,
    /// Absolute URL of the story.
    pub link: String,
    pub points: u32,
    pub comments: u32,
    /// Local time of extraction in [`SCRAPED_AT_FORMAT`].
    pub scraped_at: String,
}

/// Request body for the backend.
#[derive(Debug, Serialize)]
pub struct ScrapePayload<'a> {
    pub items: &'a [Record],
}

/// Response body from the backend. Only `message` is read, for logging.
#[derive(Debug, Default, Deserialize)]
pub struct BackendAck {
    #[serde(default)]
    pub message: Option<String>,
}
