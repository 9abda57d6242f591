//! Generic HTTP webhook notifier.
//!
//! Delivers a user-templated body to a configured URL. The template is
//! rendered with the matched entry, the exported capture groups and the
//! matched rule descriptors (see [`PayloadContext`]).

use std::sync::Arc;

use feedhook_core::config::resolve_env_vars;

use crate::templating::{PayloadContext, TemplateRenderer};
use crate::traits::{MatchEvent, Notifier, NotifyError};

/// Delivers rendered payloads over HTTP to a configured endpoint.
///
/// Environment variable references (`${VAR_NAME}`) in the URL are resolved
/// at construction time.
#[derive(Debug)]
pub struct WebhookNotifier {
    /// Target URL (env vars already resolved).
    url: String,
    method: reqwest::Method,
    /// Minijinja body template.
    body_template: String,
    /// Shared template renderer for body templates.
    renderer: Arc<TemplateRenderer>,
    /// Shared HTTP client (connection pooling).
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a new webhook notifier.
    ///
    /// Missing env vars and template syntax errors produce a
    /// [`NotifyError::Config`] error.
    pub fn new(
        url: &str,
        method: reqwest::Method,
        body_template: String,
        renderer: Arc<TemplateRenderer>,
    ) -> Result<Self, NotifyError> {
        let resolved_url = resolve_env_vars(url)?;

        renderer
            .validate(&body_template)
            .map_err(|e| NotifyError::Config(format!("invalid body template: {e}")))?;

        Ok(Self {
            url: resolved_url,
            method,
            body_template,
            renderer,
            client: reqwest::Client::new(),
        })
    }

    /// Construct a [`WebhookNotifier`] from config-level primitives.
    ///
    /// `method` is parsed case-insensitively (e.g. `"post"`, `"PUT"`).
    pub fn from_config(
        url: &str,
        method: &str,
        body_template: &str,
        renderer: Arc<TemplateRenderer>,
    ) -> Result<Self, NotifyError> {
        let parsed_method = method
            .to_uppercase()
            .parse::<reqwest::Method>()
            .map_err(|_| NotifyError::Config(format!("invalid HTTP method: {method}")))?;

        Self::new(url, parsed_method, body_template.to_string(), renderer)
    }

    /// Render the request body for an event.
    pub fn render_body(&self, event: &MatchEvent) -> Result<String, NotifyError> {
        self.renderer
            .render(&self.body_template, &PayloadContext::from(event))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &reqwest::Method {
        &self.method
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, event: &MatchEvent) -> Result<(), NotifyError> {
        let body = self.render_body(event)?;

        let response = self
            .client
            .request(self.method.clone(), &self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(NotifyError::Status {
                channel: "http".to_string(),
                status: status.as_u16(),
                body: body_text,
            });
        }

        tracing::debug!(
            url = %self.url,
            method = %self.method,
            status = %status,
            "webhook notification delivered"
        );

        Ok(())
    }

    fn channel_name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use feedhook_core::{Item, MatchOutcome};

    use super::*;

    fn renderer() -> Arc<TemplateRenderer> {
        Arc::new(TemplateRenderer::new())
    }

    fn event() -> MatchEvent {
        MatchEvent::new(
            Item {
                id: "2".to_string(),
                title: "Release note: Go123 is here".to_string(),
                link: "https://go.dev/blog/go123".to_string(),
                ..Default::default()
            },
            MatchOutcome {
                matched: vec![r"regex_named_capture:(?P<tag>Go\d+)".to_string()],
                groups: BTreeMap::from([("tag".to_string(), "Go123".to_string())]),
            },
        )
    }

    #[test]
    fn from_config_post_method() {
        let notifier =
            WebhookNotifier::from_config("https://example.com", "POST", "{}", renderer()).unwrap();
        assert_eq!(notifier.method(), &reqwest::Method::POST);
        assert_eq!(notifier.channel_name(), "http");
    }

    #[test]
    fn from_config_case_insensitive_method() {
        let notifier =
            WebhookNotifier::from_config("https://example.com", "put", "{}", renderer()).unwrap();
        assert_eq!(notifier.method(), &reqwest::Method::PUT);
    }

    #[test]
    fn from_config_invalid_method() {
        let result =
            WebhookNotifier::from_config("https://example.com", "NOT A METHOD", "{}", renderer());
        assert!(matches!(result, Err(NotifyError::Config(_))));
    }

    #[test]
    fn from_config_resolves_url_env() {
        std::env::set_var("FEEDHOOK_WEBHOOK_TEST_HOST", "hooks.example.com");
        let notifier = WebhookNotifier::from_config(
            "https://${FEEDHOOK_WEBHOOK_TEST_HOST}/x",
            "POST",
            "{}",
            renderer(),
        )
        .unwrap();
        assert_eq!(notifier.url(), "https://hooks.example.com/x");
        std::env::remove_var("FEEDHOOK_WEBHOOK_TEST_HOST");
    }

    #[test]
    fn from_config_invalid_body_template() {
        let result =
            WebhookNotifier::from_config("https://example.com", "POST", "{{ unclosed", renderer());
        match result {
            Err(NotifyError::Config(msg)) => assert!(msg.contains("invalid body template")),
            other => panic!("expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn render_body_substitutes_entry_groups_and_matched() {
        let notifier = WebhookNotifier::from_config(
            "https://example.com",
            "POST",
            r#"{"text": "{{ entry.title }}", "tag": "{{ groups.tag }}", "n": {{ matched | length }}}"#,
            renderer(),
        )
        .unwrap();
        let body = notifier.render_body(&event()).unwrap();
        assert_eq!(
            body,
            r#"{"text": "Release note: Go123 is here", "tag": "Go123", "n": 1}"#
        );
    }

    #[test]
    fn empty_template_renders_empty_body() {
        let notifier =
            WebhookNotifier::from_config("https://example.com", "POST", "", renderer()).unwrap();
        assert_eq!(notifier.render_body(&event()).unwrap(), "");
    }
}
