use async_trait::async_trait;

use feedhook_core::Item;

use crate::error::IngestError;

/// Produces the current entries of a feed, in feed order.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Item>, IngestError>;
}
