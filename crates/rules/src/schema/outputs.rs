//! Notification sink declarations (`match_outputs`).

use serde::{Deserialize, Serialize};

/// One entry of `match_outputs`.
///
/// Exactly one of the fields is expected to be set. When several are, the
/// first in `stdout`, `gotify`, `http` order wins (validation warns about it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<ConsoleOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gotify: Option<GotifyOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpOutput>,
}

/// Console sink. Takes no parameters (`stdout: {}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleOutput {}

/// Gotify push-service sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotifyOutput {
    pub url: String,
    pub token: String,
}

/// Generic HTTP sink with a templated body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpOutput {
    #[serde(default = "default_method")]
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub payload_tmpl: String,
}

fn default_method() -> String {
    "POST".to_string()
}

/// The typed sink an output declaration resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkConfig {
    Console,
    Gotify(GotifyOutput),
    Http(HttpOutput),
}

impl SinkConfig {
    pub fn name(&self) -> &'static str {
        match self {
            SinkConfig::Console => "stdout",
            SinkConfig::Gotify(_) => "gotify",
            SinkConfig::Http(_) => "http",
        }
    }
}

impl MatchOutput {
    /// Resolve to a typed sink, `None` when nothing is declared.
    pub fn sink(&self) -> Option<SinkConfig> {
        if self.stdout.is_some() {
            return Some(SinkConfig::Console);
        }
        if let Some(gotify) = &self.gotify {
            return Some(SinkConfig::Gotify(gotify.clone()));
        }
        self.http.clone().map(SinkConfig::Http)
    }

    /// Number of sink kinds declared in this entry.
    pub fn declared_count(&self) -> usize {
        [self.stdout.is_some(), self.gotify.is_some(), self.http.is_some()]
            .iter()
            .filter(|set| **set)
            .count()
    }
}
