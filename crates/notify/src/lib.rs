//! Notification fan-out for matched feed items.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable notification channels
//! - Console, Gotify and generic HTTP webhook notifier implementations
//! - Minijinja template rendering for webhook payloads
//! - Dispatcher that delivers each match to every configured channel

pub mod console;
pub mod dispatcher;
pub mod gotify;
pub mod templating;
pub mod traits;
pub mod webhook;

pub use console::ConsoleNotifier;
pub use dispatcher::Dispatcher;
pub use gotify::GotifyNotifier;
pub use templating::TemplateRenderer;
pub use traits::{DispatchResult, MatchEvent, Notifier, NotifyError};
pub use webhook::WebhookNotifier;
