//! Notifier trait definition and shared error types.

use feedhook_core::{FeedhookError, Item, MatchOutcome};

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{channel} returned {status}: {body}")]
    Status {
        channel: String,
        status: u16,
        body: String,
    },
}

impl From<FeedhookError> for NotifyError {
    fn from(e: FeedhookError) -> Self {
        NotifyError::Config(e.to_string())
    }
}

/// One matched item, as handed to every configured sink.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MatchEvent {
    pub item: Item,
    pub outcome: MatchOutcome,
}

impl MatchEvent {
    pub fn new(item: Item, outcome: MatchOutcome) -> Self {
        Self { item, outcome }
    }

    /// Matched descriptors in `[a b c]` form.
    pub fn matched_list(&self) -> String {
        format!("[{}]", self.outcome.matched.join(" "))
    }
}

/// Trait for notification channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one match event through this channel.
    async fn send(&self, event: &MatchEvent) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "stdout", "gotify").
    fn channel_name(&self) -> &str;
}

/// Result of delivering a match event to a single channel.
#[derive(Debug)]
pub struct DispatchResult {
    pub channel: String,
    pub item_id: String,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}
