//! Top-level config document.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{MatchOutput, RuleSpec, SinkConfig};

/// Polling interval used when the config leaves it unset or zero.
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 60_000;
/// Dedup database used when the config leaves it unset.
pub const DEFAULT_DATABASE_PATH: &str = "entries.db";
/// Log filter used when the config leaves it unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The whole watcher configuration as read from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(rename = "apiVersion", default = "default_api_version")]
    pub api_version: String,
    #[serde(rename = "loglevel", default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub match_outputs: Vec<MatchOutput>,
    #[serde(default)]
    pub database: DatabaseSettings,
}

/// Feed polling settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(rename = "userAgent", default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(rename = "pollingIntervalMs", default, skip_serializing_if = "Option::is_none")]
    pub polling_interval_ms: Option<u64>,
    #[serde(default)]
    pub rss_url: String,
}

/// Dedup store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

fn default_api_version() -> String {
    "v1".to_string()
}

impl WatchConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Tracing filter directive for this config.
    pub fn log_filter(&self) -> &str {
        self.log_level
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Typed sinks for every output entry that declares one.
    pub fn sinks(&self) -> Vec<SinkConfig> {
        self.match_outputs.iter().filter_map(MatchOutput::sink).collect()
    }
}

impl HttpSettings {
    pub fn polling_interval(&self) -> Duration {
        let ms = match self.polling_interval_ms {
            Some(ms) if ms > 0 => ms,
            _ => DEFAULT_POLLING_INTERVAL_MS,
        };
        Duration::from_millis(ms)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|ua| !ua.is_empty())
            .unwrap_or_else(|| format!("feedhook/{}", env!("CARGO_PKG_VERSION")))
    }
}

impl DatabaseSettings {
    pub fn path(&self) -> &str {
        self.path
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_DATABASE_PATH)
    }
}
