//! Forwarding records to the DataLens backend.
//!
//! The backend receives the whole batch in a single `POST /api/scrape` with a
//! `{"items": [...]}` body and replies with a JSON acknowledgement. There is
//! no retry: a failed post is logged and reported as `false`.

use crate::config::ScraperConfig;
use crate::models::{BackendAck, Record, ScrapePayload};
use crate::utils::truncate_for_log;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument};

/// Posts record batches to `{backend}/api/scrape`.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(config: &ScraperConfig) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: config.scrape_endpoint(),
            timeout: config.forward_timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `records` to the backend.
    ///
    /// An empty slice is still posted as `{"items": []}`.
    ///
    /// # Returns
    ///
    /// `true` on a 2xx response. Network errors and any other status are
    /// logged and turned into `false`; nothing is propagated.
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint, count = records.len()))]
    pub async fn forward(&self, records: &[Record]) -> bool {
        let t0 = Instant::now();
        info!("Sending {} items to backend", records.len());

        match self.post(records).await {
            Ok(message) => {
                info!(
                    elapsed_ms = t0.elapsed().as_millis(),
                    "Backend response: {}", message
                );
                true
            }
            Err(e) => {
                error!(
                    elapsed_ms = t0.elapsed().as_millis(),
                    error = %e,
                    "Failed to send data to backend"
                );
                false
            }
        }
    }

    /// POST the payload and return the backend's acknowledgement message.
    async fn post(&self, records: &[Record]) -> Result<String, Box<dyn Error>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .timeout(self.timeout)
            .json(&ScrapePayload { items: records })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(format!(
                "backend returned {}: {}",
                status,
                truncate_for_log(&body, 200)
            )
            .into());
        }

        // A 2xx without a readable acknowledgement still counts as delivered.
        let ack: BackendAck = serde_json::from_str(&body).unwrap_or_default();
        Ok(ack.message.unwrap_or_else(|| "Success".to_string()))
    }
}
