//! One scrape run: policy check, fetch, extract, forward.
//!
//! Every failure ends up as a single `false`. Fetch and parse errors
//! propagate up to [`run`] and stop the run there; forwarding failures are
//! already absorbed by the [`Forwarder`].

use crate::config::ScraperConfig;
use crate::outputs::{backend::Forwarder, json};
use crate::scrapers::{Session, hackernews};
use std::error::Error;
use tracing::{error, info, instrument, warn};

/// Execute one complete run and report whether it succeeded.
#[instrument(level = "info", skip_all, fields(source = %config.source_url, dry_run = config.dry_run))]
pub async fn run(config: &ScraperConfig) -> bool {
    match try_run(config).await {
        Ok(success) => success,
        Err(e) => {
            error!(error = %e, "Scraper run failed");
            false
        }
    }
}

async fn try_run(config: &ScraperConfig) -> Result<bool, Box<dyn Error>> {
    let session = Session::new(config)?;

    if !session.check_policy().await {
        warn!("robots.txt check failed; aborting");
        return Ok(false);
    }

    let html = session.fetch_page().await?;
    let records = hackernews::extract(&html, session.source_url());

    if records.is_empty() {
        warn!("No items scraped");
        return Ok(false);
    }
    info!(count = records.len(), "Successfully scraped items");

    if config.dry_run {
        json::write_payload(&records, std::io::stdout().lock())?;
        return Ok(true);
    }

    let forwarder = Forwarder::new(config)?;
    info!(endpoint = forwarder.endpoint(), "Forwarding to backend");
    Ok(forwarder.forward(&records).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FRONT_PAGE: &str = r#"<html><body><table><tbody>
<tr class="athing"><td><span class="rank">1.</span></td><td><span class="titleline"><a href="https://x.test">Example</a></span></td></tr>
<tr><td class="subtext"><span class="score">42 points</span> <a href="item?id=1">7&nbsp;comments</a></td></tr>
<tr class="athing"><td><span class="rank">2.</span></td><td><span class="titleline"><a href="item?id=2">Ask HN: Local question</a></span></td></tr>
<tr><td class="subtext"><span class="score">3 points</span> <a href="item?id=2">discuss</a></td></tr>
</tbody></table></body></html>"#;

    async fn source_with(page: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-Agent: *\nCrawl-delay: 30\n"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(page)
            .mount(&server)
            .await;
        server
    }

    async fn backend_with(status: u16, expected_posts: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/scrape"))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(serde_json::json!({ "message": "Successfully saved 2 items" })),
            )
            .expect(expected_posts)
            .mount(&server)
            .await;
        server
    }

    fn config(source: &MockServer, backend: &MockServer) -> ScraperConfig {
        ScraperConfig {
            source_url: Url::parse(&source.uri()).unwrap(),
            backend_url: backend.uri(),
            request_delay: Duration::ZERO,
            ..ScraperConfig::default()
        }
    }

    #[tokio::test]
    async fn test_run_succeeds_end_to_end() {
        let source = source_with(ResponseTemplate::new(200).set_body_string(FRONT_PAGE)).await;
        let backend = backend_with(201, 1).await;

        assert!(run(&config(&source, &backend)).await);

        let posts = backend.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&posts[0].body).unwrap();
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["points"], 42);
        assert_eq!(items[0]["comments"], 7);
        assert_eq!(items[1]["link"], format!("{}/item?id=2", source.uri()));
        assert_eq!(items[1]["comments"], 0);
    }

    #[tokio::test]
    async fn test_run_fails_on_unavailable_page_without_forwarding() {
        let source = source_with(ResponseTemplate::new(503)).await;
        let backend = backend_with(201, 0).await;

        assert!(!run(&config(&source, &backend)).await);
    }

    #[tokio::test]
    async fn test_run_fails_when_backend_errors() {
        let source = source_with(ResponseTemplate::new(200).set_body_string(FRONT_PAGE)).await;
        let backend = backend_with(500, 1).await;

        assert!(!run(&config(&source, &backend)).await);
    }

    #[tokio::test]
    async fn test_run_fails_on_empty_page_without_forwarding() {
        let source = source_with(
            ResponseTemplate::new(200).set_body_string("<html><body>No stories</body></html>"),
        )
        .await;
        let backend = backend_with(201, 0).await;

        assert!(!run(&config(&source, &backend)).await);
    }

    #[tokio::test]
    async fn test_run_proceeds_when_robots_disallows_everything() {
        // The policy check is advisory; a disallow-all rule does not stop the run.
        let source = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-Agent: *\nDisallow: /\n"))
            .mount(&source)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FRONT_PAGE))
            .mount(&source)
            .await;
        let backend = backend_with(201, 1).await;

        assert!(run(&config(&source, &backend)).await);
    }

    #[tokio::test]
    async fn test_dry_run_skips_backend() {
        let source = source_with(ResponseTemplate::new(200).set_body_string(FRONT_PAGE)).await;
        let backend = backend_with(201, 0).await;
        let config = ScraperConfig {
            dry_run: true,
            ..config(&source, &backend)
        };

        assert!(run(&config).await);
    }
}
