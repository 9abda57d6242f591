//! Rule engine for feed items.
//!
//! This crate provides:
//! - YAML watch-config schema with serde deserialization
//! - Load-time validation with "did you mean" suggestions
//! - The chained rule evaluator (refs and named capture groups)
//! - A file loader with hot-reload via `notify` watcher

pub mod evaluator;
pub mod fields;
pub mod loader;
pub mod schema;
pub mod validation;

pub use evaluator::{evaluate, CompiledRule, EvalState, RuleSet};
pub use fields::{FieldMap, FieldName};
pub use loader::{ActiveConfig, ConfigLoader, RuleError};
