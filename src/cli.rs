//! Command-line interface definitions for the DataLens scraper.
//!
//! Every option can be supplied as a flag or through the environment, so the
//! backend can spawn the scraper with nothing but `BACKEND_API_URL` set.

use crate::config::{DEFAULT_BACKEND_URL, DEFAULT_SOURCE_URL};
use clap::Parser;

/// Command-line arguments for the DataLens scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape and forward to the local backend
/// datalens_scraper
///
/// # Forward somewhere else
/// datalens_scraper --backend-url https://api.example.com
///
/// # Print the payload instead of posting it
/// datalens_scraper --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base URL of the backend receiving `POST /api/scrape`
    #[arg(long, env = "BACKEND_API_URL", default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// Front page to scrape; `robots.txt` is read from the same host
    #[arg(long, env = "SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Pause before fetching the front page, in milliseconds
    #[arg(long, env = "REQUEST_DELAY_MS", default_value_t = 1000)]
    pub request_delay_ms: u64,

    /// Print the JSON payload to stdout instead of posting it
    #[arg(long)]
    pub dry_run: bool,
}
