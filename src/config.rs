//! Runtime configuration, resolved once at startup.
//!
//! [`ScraperConfig`] is built from the parsed [`Cli`] and handed to the
//! pipeline; nothing downstream reads the environment on its own.

use crate::cli::Cli;
use std::error::Error;
use std::time::Duration;
use url::Url;

/// Identifies the scraper to the sites it visits.
pub const USER_AGENT: &str = "DataLens-Scraper/1.0 (Educational Project)";
pub const ACCEPT: &str = "text/html,application/xhtml+xml";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

pub const DEFAULT_SOURCE_URL: &str = "https://news.ycombinator.com";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Upper bound on stories taken from the front page.
pub const MAX_STORIES: usize = 30;

/// Everything the fetch / extract / forward stages need to know.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// The page to scrape. `robots.txt` and relative story links resolve against it.
    pub source_url: Url,
    /// Backend base URL; `/api/scrape` is appended when forwarding.
    pub backend_url: String,
    pub user_agent: String,
    /// Sleep before the front page request.
    pub request_delay: Duration,
    pub policy_timeout: Duration,
    pub page_timeout: Duration,
    pub forward_timeout: Duration,
    /// Print the payload instead of posting it.
    pub dry_run: bool,
}

impl Default for ScraperConfig {
    /// Hacker News as the source, a backend on `localhost:5000`, a one second
    /// courtesy delay and 10 / 15 / 30 second timeouts for the policy check,
    /// the page fetch and the forward.
    fn default() -> Self {
        Self {
            source_url: Url::parse(DEFAULT_SOURCE_URL).expect("default source URL is valid"),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            request_delay: Duration::from_secs(1),
            policy_timeout: Duration::from_secs(10),
            page_timeout: Duration::from_secs(15),
            forward_timeout: Duration::from_secs(30),
            dry_run: false,
        }
    }
}

impl ScraperConfig {
    /// Build the configuration from parsed command-line arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if `--source-url` is not an absolute URL.
    pub fn from_cli(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let source_url = Url::parse(&cli.source_url)
            .map_err(|e| format!("invalid source URL {:?}: {}", cli.source_url, e))?;

        Ok(Self {
            source_url,
            backend_url: cli.backend_url.clone(),
            request_delay: Duration::from_millis(cli.request_delay_ms),
            dry_run: cli.dry_run,
            ..Self::default()
        })
    }

    /// Full endpoint the forwarder posts to.
    pub fn scrape_endpoint(&self) -> String {
        format!("{}/api/scrape", self.backend_url.trim_end_matches('/'))
    }
}
