//! JSON rendering of the scrape payload.
//!
//! Produces exactly the body the backend would receive, so a dry run shows
//! what would have been posted.

use crate::models::{Record, ScrapePayload};
use std::error::Error;
use std::io::Write;
use tracing::{info, instrument};

/// Render `records` as a pretty-printed `{"items": [...]}` document.
pub fn render_payload(records: &[Record]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ScrapePayload { items: records })
}

/// Write the rendered payload, followed by a newline, to `out`.
#[instrument(level = "info", skip_all, fields(count = records.len()))]
pub fn write_payload<W: Write>(records: &[Record], mut out: W) -> Result<(), Box<dyn Error>> {
    let json = render_payload(records)?;
    writeln!(out, "{}", json)?;
    out.flush()?;
    info!(bytes = json.len(), "Wrote JSON payload");
    Ok(())
}
