//! Builds a [`Dispatcher`] from the `match_outputs` section of a config.

use std::sync::Arc;

use feedhook_notify::{
    ConsoleNotifier, Dispatcher, GotifyNotifier, Notifier, NotifyError, TemplateRenderer,
    WebhookNotifier,
};
use feedhook_rules::schema::SinkConfig;

/// One notifier per sink, in declaration order. Env references in URLs and
/// tokens are resolved here, so a missing variable fails the whole build.
pub fn build_dispatcher(sinks: &[SinkConfig]) -> Result<Dispatcher, NotifyError> {
    let renderer = Arc::new(TemplateRenderer::new());
    let channels = sinks
        .iter()
        .map(|sink| build_notifier(sink, &renderer))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Dispatcher::new(channels))
}

fn build_notifier(
    sink: &SinkConfig,
    renderer: &Arc<TemplateRenderer>,
) -> Result<Arc<dyn Notifier>, NotifyError> {
    let notifier: Arc<dyn Notifier> = match sink {
        SinkConfig::Console => Arc::new(ConsoleNotifier::new()),
        SinkConfig::Gotify(g) => Arc::new(GotifyNotifier::from_config(&g.url, &g.token)?),
        SinkConfig::Http(h) => Arc::new(WebhookNotifier::from_config(
            &h.url,
            &h.method,
            &h.payload_tmpl,
            Arc::clone(renderer),
        )?),
    };
    Ok(notifier)
}
