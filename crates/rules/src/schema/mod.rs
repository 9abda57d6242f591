//! YAML config schema types with serde deserialization.
//!
//! Defines the on-disk shape of the watcher configuration:
//! - `WatchConfig`: top-level document (log level, rules, http, outputs, database)
//! - `RuleSpec`: one flat rule declaration as written in YAML
//! - `TargetSelector`: the typed selector a `RuleSpec` resolves to
//! - `MatchOutput`: one notification sink declaration

mod document;
mod outputs;
mod rule;

pub use document::*;
pub use outputs::*;
pub use rule::*;
