use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use feedhook_core::Item;

use crate::error::IngestError;
use crate::parse::parse_feed;
use crate::traits::FeedSource;

/// Per-request timeout for feed fetches.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Feed source backed by a plain HTTP GET.
pub struct HttpFeedSource {
    client: Client,
    url: String,
}

impl HttpFeedSource {
    /// Build a source for `url` that identifies itself with `user_agent`.
    pub fn new(url: impl Into<String>, user_agent: &str) -> Result<Self, IngestError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<Vec<Item>, IngestError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let items = parse_feed(&bytes)?;
        debug!(url = %self.url, items = items.len(), "fetched feed");
        Ok(items)
    }
}
