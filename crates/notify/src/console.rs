//! Stdout notifier: one line per match.

use crate::traits::{MatchEvent, Notifier, NotifyError};

/// Render the console line for a match event.
///
/// `MATCH: Entry <id> matched rules: [<d1> <d2>], groups: {<k>: <v>}`
pub fn render_console_line(event: &MatchEvent) -> String {
    let groups = event
        .outcome
        .groups
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "MATCH: Entry {} matched rules: {}, groups: {{{}}}",
        event.item.id,
        event.matched_list(),
        groups
    )
}

/// Prints match events to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, event: &MatchEvent) -> Result<(), NotifyError> {
        println!("{}", render_console_line(event));
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "stdout"
    }
}
