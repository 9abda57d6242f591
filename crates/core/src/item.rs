use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single normalized feed entry.
///
/// Items are immutable once produced by the feed source. The timestamps are
/// never inspected by rule evaluation; they only flow through to storage and
/// notification rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Entry GUID, or the entry link when the feed omits one.
    pub id: String,
    pub author: String,
    pub title: String,
    pub link: String,
    /// Entry body (HTML as delivered by the feed).
    pub raw: String,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl Item {
    /// RFC 3339 rendering of `published`, empty when absent.
    pub fn published_str(&self) -> String {
        self.published.map(|t| t.to_rfc3339()).unwrap_or_default()
    }

    /// RFC 3339 rendering of `updated`, empty when absent.
    pub fn updated_str(&self) -> String {
        self.updated.map(|t| t.to_rfc3339()).unwrap_or_default()
    }
}
