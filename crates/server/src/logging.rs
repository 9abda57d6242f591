//! Tracing setup with a log filter that follows config reloads.

use tracing::warn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Controls the active log filter after the subscriber is installed.
///
/// When `RUST_LOG` is set it wins and config log levels are ignored.
#[derive(Clone, Default)]
pub struct LogControl {
    handle: Option<FilterHandle>,
    pinned: bool,
}

impl LogControl {
    /// Install the global subscriber. Starts at `info` until a config is loaded.
    pub fn init() -> Self {
        let (filter, pinned) = match EnvFilter::try_from_default_env() {
            Ok(filter) => (filter, true),
            Err(_) => (EnvFilter::new("info"), false),
        };
        let (filter, handle) = reload::Layer::new(filter);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_level(true))
            .init();

        Self {
            handle: Some(handle),
            pinned,
        }
    }

    /// A control that changes nothing. Used where no subscriber is installed.
    #[cfg(test)]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Apply a config `loglevel` directive.
    pub fn apply(&self, directive: &str) {
        if self.pinned {
            return;
        }
        let Some(handle) = &self.handle else {
            return;
        };
        match parse_filter(directive) {
            Ok(filter) => {
                if let Err(e) = handle.reload(filter) {
                    warn!(error = %e, "failed to apply log level");
                }
            }
            Err(e) => warn!(loglevel = directive, error = %e, "invalid loglevel, keeping current filter"),
        }
    }
}

fn parse_filter(directive: &str) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    EnvFilter::try_new(directive)
}
