//! Deduplication store for processed feed items.
//!
//! Every item the poller processes is recorded once, matched or not, so a
//! later fetch of the same feed skips it. [`SqliteSeenStore`] persists to a
//! SQLite file; [`MemorySeenStore`] keeps everything in process for tests.

pub mod error;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use feedhook_core::{Item, MatchOutcome};

pub use error::{Result, StoreError};
pub use memory::MemorySeenStore;
pub use sqlite::SqliteSeenStore;

/// Status written for every newly recorded entry.
pub const STATUS_UNREAD: &str = "unread";

/// Keyed existence check plus insert-once.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Whether an item with this id has already been recorded.
    async fn seen(&self, id: &str) -> Result<bool>;

    /// Record a processed item and its evaluation outcome. Recording an id
    /// that already exists is a no-op.
    async fn record(&self, item: &Item, outcome: &MatchOutcome) -> Result<()>;
}

/// One row of the `entries` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredEntry {
    pub id: String,
    pub author: String,
    pub title: String,
    pub status: String,
    /// JSON array of matched rule descriptors.
    pub rules_matched: String,
    /// JSON object of exported capture groups.
    pub regex_groups_json: String,
    /// RFC 3339 insertion time.
    pub created_at: String,
    pub updated: String,
    pub published: String,
    pub post_url: String,
}

impl StoredEntry {
    pub fn new(item: &Item, outcome: &MatchOutcome) -> Self {
        Self {
            id: item.id.clone(),
            author: item.author.clone(),
            title: item.title.clone(),
            status: STATUS_UNREAD.to_string(),
            rules_matched: outcome.matched_json(),
            regex_groups_json: outcome.groups_json(),
            created_at: Utc::now().to_rfc3339(),
            updated: item.updated_str(),
            published: item.published_str(),
            post_url: item.link.clone(),
        }
    }

    /// Decode `rules_matched` back into descriptors.
    pub fn matched(&self) -> Result<Vec<String>> {
        Ok(serde_json::from_str(&self.rules_matched)?)
    }
}
