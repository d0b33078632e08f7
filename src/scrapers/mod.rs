//! Fetching the front page and turning it into records.
//!
//! The work is split the same way for every run:
//!
//! 1. **Policy check**: read `robots.txt` from the source host (advisory only)
//! 2. **Fetching**: download the front page markup through a shared [`Session`]
//! 3. **Extraction**: parse story rows into [`Record`](crate::models::Record)s
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Hacker News | [`hackernews`] | HTML scraping | Front page only, top 30 stories |

pub mod hackernews;

use crate::config::{ACCEPT, ACCEPT_LANGUAGE, ScraperConfig};
use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Marker in `robots.txt` that disallows everything for some agent.
const DISALLOW_ALL: &str = "Disallow: /";

/// One HTTP client, configured once, reused for every GET against the source.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    source_url: Url,
    request_delay: Duration,
    policy_timeout: Duration,
    page_timeout: Duration,
}

impl Session {
    /// Build the session's client with the scraper's user agent and
    /// `Accept` / `Accept-Language` headers.
    pub fn new(config: &ScraperConfig) -> Result<Self, Box<dyn Error>> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            source_url: config.source_url.clone(),
            request_delay: config.request_delay,
            policy_timeout: config.policy_timeout,
            page_timeout: config.page_timeout,
        })
    }

    pub fn source_url(&self) -> &Url {
        &self.source_url
    }

    /// Read `robots.txt` and warn if it contains a disallow-all rule.
    ///
    /// Advisory only: the result is always `true`, including when the file
    /// cannot be fetched or when it disallows everything. Per-agent rules are
    /// not parsed.
    #[instrument(level = "info", skip_all, fields(source = %self.source_url))]
    pub async fn check_policy(&self) -> bool {
        match self.fetch_policy().await {
            Ok(body) => {
                if body.contains(DISALLOW_ALL) {
                    warn!("Scraping may be restricted by robots.txt");
                }
                info!("robots.txt checked; proceeding with scraping");
            }
            // Unreachable policy document is not a reason to stop.
            Err(e) => error!(error = %e, "Error checking robots.txt"),
        }
        true
    }

    async fn fetch_policy(&self) -> Result<String, Box<dyn Error>> {
        let robots_url = self.source_url.join("/robots.txt")?;
        debug!(url = %robots_url, "Fetching robots.txt");

        let body = self
            .client
            .get(robots_url)
            .timeout(self.policy_timeout)
            .send()
            .await?
            .text()
            .await?;
        Ok(body)
    }

    /// Sleep for the configured delay, then GET the source page.
    ///
    /// # Errors
    ///
    /// Network failures and non-success statuses are returned to the caller.
    #[instrument(level = "info", skip_all, fields(url = %self.source_url))]
    pub async fn fetch_page(&self) -> Result<String, Box<dyn Error>> {
        info!("Starting front page scrape");
        sleep(self.request_delay).await;

        let response = self
            .client
            .get(self.source_url.clone())
            .timeout(self.page_timeout)
            .send()
            .await?
            .error_for_status()?;

        let html = response.text().await?;
        info!(bytes = html.len(), "Fetched front page");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, headers, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ScraperConfig {
        ScraperConfig {
            source_url: Url::parse(&server.uri()).unwrap(),
            request_delay: Duration::ZERO,
            ..ScraperConfig::default()
        }
    }

    #[tokio::test]
    async fn test_check_policy_proceeds_when_allowed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-Agent: *\nCrawl-delay: 30\n"))
            .expect(1)
            .mount(&server)
            .await;

        let session = Session::new(&config_for(&server)).unwrap();
        assert!(session.check_policy().await);
    }

    #[tokio::test]
    async fn test_check_policy_does_not_enforce_disallow_all() {
        // A disallow-all rule only produces a warning; scraping still proceeds.
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-Agent: *\nDisallow: /\n"))
            .mount(&server)
            .await;

        let session = Session::new(&config_for(&server)).unwrap();
        assert!(session.check_policy().await);
    }

    #[tokio::test]
    async fn test_check_policy_proceeds_when_unreachable() {
        let server = MockServer::start().await;
        let config = config_for(&server);
        drop(server);

        let session = Session::new(&config).unwrap();
        assert!(session.check_policy().await);
    }

    #[tokio::test]
    async fn test_fetch_page_sends_session_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", crate::config::USER_AGENT))
            // wiremock splits comma-separated header values
            .and(headers("accept", vec!["text/html", "application/xhtml+xml"]))
            .and(headers("accept-language", vec!["en-US", "en;q=0.9"]))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let session = Session::new(&config_for(&server)).unwrap();
        let html = session.fetch_page().await.unwrap();
        assert_eq!(html, "<html></html>");
    }

    #[tokio::test]
    async fn test_fetch_page_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let session = Session::new(&config_for(&server)).unwrap();
        assert!(session.fetch_page().await.is_err());
    }
}
