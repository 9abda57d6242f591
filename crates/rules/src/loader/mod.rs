//! Config file loader with hot-reload via `notify` watcher.
//!
//! Reads the YAML watch config, validates it, compiles its rules and keeps
//! the result as an immutable [`ActiveConfig`] snapshot. When watching, a
//! changed file is re-validated and swapped in atomically; a bad edit is
//! logged and the previous snapshot stays active.

mod core;
mod error;
mod watcher;

#[cfg(test)]
mod tests;

pub use self::core::{ActiveConfig, ConfigLoader};
pub use self::error::{Result, RuleError};
