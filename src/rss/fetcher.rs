//! RSS feed fetcher.
//!
//! This module fetches RSS 2.0 documents over HTTP and turns them into
//! [`FeedSnapshot`]s with HTML entities in the text fields unescaped.

use std::time::Duration;

use reqwest::Client;
use rss::Channel;
use tracing::debug;

use crate::config::FetcherConfig;
use crate::error::FetchError;
use crate::rss::types::{FeedSnapshot, SnapshotItem};
use crate::{GatorError, Result};

/// RSS feed fetcher.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    max_feed_size: u64,
}

impl FeedFetcher {
    /// Create a fetcher from configuration.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| GatorError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
        })
    }

    /// Fetch and parse the feed at `url`.
    pub async fn fetch(&self, url: &str) -> std::result::Result<FeedSnapshot, FetchError> {
        debug!("Fetching feed {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.to_string()));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(FetchError::TooLarge {
                    size: content_length,
                    max: self.max_feed_size,
                });
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(format!("failed to read response: {e}")))?;

        if bytes.len() as u64 > self.max_feed_size {
            return Err(FetchError::TooLarge {
                size: bytes.len() as u64,
                max: self.max_feed_size,
            });
        }

        parse_feed(&bytes)
    }
}

/// Validate that a feed URL is an absolute http(s) URL with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| GatorError::Usage(format!("invalid URL {url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(GatorError::Usage(format!(
                "unsupported URL scheme: {scheme}"
            )));
        }
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(GatorError::Usage(format!("URL has no host: {url}")));
    }

    Ok(())
}

/// Decode an RSS 2.0 document into a snapshot.
///
/// Missing text elements decode as empty strings. Titles and descriptions are
/// HTML-unescaped once; links and dates are kept verbatim.
pub fn parse_feed(bytes: &[u8]) -> std::result::Result<FeedSnapshot, FetchError> {
    let channel = Channel::read_from(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;

    let items = channel
        .items()
        .iter()
        .map(|item| SnapshotItem {
            title: unescape(item.title().unwrap_or_default()),
            description: unescape(item.description().unwrap_or_default()),
            link: item.link().unwrap_or_default().to_string(),
            pub_date: item.pub_date().unwrap_or_default().to_string(),
        })
        .collect();

    Ok(FeedSnapshot {
        title: unescape(channel.title()),
        description: unescape(channel.description()),
        items,
    })
}

fn unescape(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
