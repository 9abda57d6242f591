//! Gotify push notifier.
//!
//! Delivers a fixed-shape JSON message to a Gotify server's `message`
//! endpoint, authenticated with an application token in the query string.

use feedhook_core::config::resolve_env_vars;

use crate::traits::{MatchEvent, Notifier, NotifyError};

/// Message title used for every push.
pub const GOTIFY_TITLE: &str = "RSS Match";
/// Gotify priority; 5 is the lowest level that triggers a phone notification.
pub const GOTIFY_PRIORITY: u8 = 5;

/// Build the Gotify message body for a match event.
pub fn gotify_payload(event: &MatchEvent) -> serde_json::Value {
    serde_json::json!({
        "title": GOTIFY_TITLE,
        "message": format!(
            "Matched: {}\nTitle: {}\nURL: {}",
            event.matched_list(),
            event.item.title,
            event.item.link
        ),
        "priority": GOTIFY_PRIORITY,
    })
}

/// Sends match events to a Gotify server.
#[derive(Debug)]
pub struct GotifyNotifier {
    url: String,
    /// Application token, sent as the `token` query parameter.
    token: String,
    client: reqwest::Client,
}

impl GotifyNotifier {
    /// Creates a notifier from configuration values.
    ///
    /// `${VAR}` references in `url` and `token` are resolved from the
    /// environment. Returns [`NotifyError::Config`] if the token is empty
    /// or a referenced variable is missing.
    pub fn from_config(url: &str, token: &str) -> Result<Self, NotifyError> {
        let url = resolve_env_vars(url)?;
        let token = resolve_env_vars(token)?;

        if token.is_empty() {
            return Err(NotifyError::Config(
                "Gotify token must not be empty".to_string(),
            ));
        }

        Ok(Self {
            url,
            token,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build the push request for an event without sending it.
    pub fn request(&self, event: &MatchEvent) -> Result<reqwest::Request, NotifyError> {
        Ok(self
            .client
            .post(&self.url)
            .query(&[("token", &self.token)])
            .json(&gotify_payload(event))
            .build()?)
    }
}

#[async_trait::async_trait]
impl Notifier for GotifyNotifier {
    async fn send(&self, event: &MatchEvent) -> Result<(), NotifyError> {
        let request = self.request(event)?;
        let response = self.client.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(NotifyError::Status {
                channel: "gotify".to_string(),
                status: status.as_u16(),
                body: body_text,
            });
        }

        tracing::debug!(item_id = %event.item.id, "Gotify notification sent");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "gotify"
    }
}
