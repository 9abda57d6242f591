//! Error types for config loading and rule compilation.

/// Errors that can occur while loading a watch config or compiling its rules.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// One or more validation errors, already formatted for display.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("rules[{index}]: targetRef '{name}' is not bound by an earlier rule")]
    UndefinedRef { index: usize, name: String },

    #[error("rules[{index}]: invalid pattern: {source}")]
    InvalidPattern {
        index: usize,
        #[source]
        source: regex::Error,
    },

    #[error("rules[{index}]: unknown field '{field}'")]
    UnknownField { index: usize, field: String },

    #[error("rules[{index}]: no target selector")]
    MissingTarget { index: usize },

    /// Filesystem watcher error.
    #[error("Notify watcher error: {0}")]
    Notify(#[from] notify::Error),
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, RuleError>;
