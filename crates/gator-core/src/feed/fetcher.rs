use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;

use super::document::FeedDocument;
use super::parser::parse_rss;
use crate::config::SyncConfig;
use crate::{Error, Result};

/// Capability to retrieve and parse a remote feed document
#[async_trait]
pub trait FetchFeed: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FeedDocument>;
}

/// HTTP feed fetcher: one request per call, no retries
pub struct FeedFetcher {
    client: Client,
    user_agent: String,
    max_feed_bytes: usize,
}

impl FeedFetcher {
    /// Create a new feed fetcher with configuration
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            max_feed_bytes: config.max_feed_bytes,
        })
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/rss+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        if let Ok(ua) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, ua);
        }
        headers
    }

    fn ensure_content_size(&self, size: u64, url: &str) -> Result<()> {
        if size > self.max_feed_bytes as u64 {
            return Err(Error::Fetch(format!(
                "Feed too large ({} bytes) for URL: {}",
                size, url
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl FetchFeed for FeedFetcher {
    async fn fetch(&self, url: &str) -> Result<FeedDocument> {
        tracing::info!("Fetching feed from: {}", url);

        let response = self
            .client
            .get(url)
            .headers(self.build_headers())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("HTTP {} for URL: {}", status, url)));
        }

        if let Some(length) = response.content_length() {
            self.ensure_content_size(length, url)?;
        }

        let content = response.bytes().await?;
        self.ensure_content_size(content.len() as u64, url)?;

        tracing::debug!(bytes = content.len(), "Fetched feed body from {}", url);

        parse_rss(&content)
    }
}
