//! # DataLens Scraper
//!
//! Scrapes the Hacker News front page and hands the stories to the DataLens
//! backend for storage.
//!
//! ## Usage
//!
//! ```sh
//! BACKEND_API_URL=http://localhost:5000 datalens_scraper
//! ```
//!
//! ## Architecture
//!
//! Each invocation performs exactly one run, strictly in order:
//! 1. **Policy check**: read `robots.txt` (advisory, never blocks)
//! 2. **Fetching**: download the front page after a short courtesy delay
//! 3. **Extraction**: parse up to 30 story rows into records
//! 4. **Forwarding**: `POST {backend}/api/scrape` with `{"items": [...]}`
//!
//! The process exits non-zero when the run fails at any stage.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use config::ScraperConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Loaded before tracing so RUST_LOG may come from .env; reported once logging is up.
    let dotenv = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    // A missing .env is fine; a malformed one is worth a warning.
    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "Failed to load .env");
        }
    }

    let start_time = std::time::Instant::now();
    info!("{}", "=".repeat(50));
    info!("DataLens Scraper - Starting");
    info!("{}", "=".repeat(50));

    let args = Cli::parse();
    let config = match ScraperConfig::from_cli(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    debug!(?config, "Resolved configuration");

    let success = pipeline::run(&config).await;

    let elapsed = start_time.elapsed();
    if success {
        info!(?elapsed, "Scraping completed successfully!");
        ExitCode::SUCCESS
    } else {
        error!(?elapsed, "Scraping failed!");
        ExitCode::FAILURE
    }
}
