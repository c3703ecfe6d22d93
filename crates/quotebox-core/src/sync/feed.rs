//! Remote quote feeds
//!
//! A feed returns a list of quote-shaped records. The transport does not
//! matter to the merge; [`HttpFeed`] fetches a JSON array over HTTP.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{QuoteError, QuoteResult};
use crate::models::Quote;

/// A source of remote quotes
pub trait RemoteFeed: Send + Sync {
    /// Fetch the current remote list
    fn fetch(&self) -> impl Future<Output = QuoteResult<Vec<Quote>>> + Send;
}

/// Feed served as a JSON array over HTTP(S)
pub struct HttpFeed {
    url: String,
    client: reqwest::Client,
}

impl HttpFeed {
    /// Create a feed for `url`; every request is bounded by `timeout`
    pub fn new(url: &str, timeout: Duration) -> QuoteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quotebox/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QuoteError::Fetch(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RemoteFeed for HttpFeed {
    async fn fetch(&self) -> QuoteResult<Vec<Quote>> {
        debug!("GET {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| QuoteError::Fetch(format!("request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Fetch(format!(
                "{} returned status {}",
                self.url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| QuoteError::Fetch(format!("failed to read response body: {}", e)))?;

        parse_feed(&body)
    }
}

/// Project a feed body into quotes
///
/// The body must be a JSON array. Objects without a usable `text` are
/// dropped; extra fields are ignored.
pub fn parse_feed(body: &str) -> QuoteResult<Vec<Quote>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| QuoteError::Fetch(format!("feed is not valid JSON: {}", e)))?;

    let Value::Array(entries) = value else {
        return Err(QuoteError::Fetch("feed is not a JSON array".to_string()));
    };

    let quotes: Vec<Quote> = entries.iter().filter_map(Quote::from_value).collect();
    if quotes.len() < entries.len() {
        debug!(
            "Dropped {} feed entries without text",
            entries.len() - quotes.len()
        );
    }
    Ok(quotes)
}
