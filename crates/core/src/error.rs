use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FeedhookError {
    #[error("env var not found: {0}")]
    MissingEnv(String),

    #[error("unclosed env var reference in: {0}")]
    UnclosedEnvRef(String),
}
