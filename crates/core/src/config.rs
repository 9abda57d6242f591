use std::env;

use crate::error::FeedhookError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Resolve `${VAR_NAME}` references in a config value using the process
/// environment. Text outside references is copied through unchanged.
pub fn resolve_env_vars(input: &str) -> Result<String, FeedhookError> {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                var_name.push(c);
            }
            if !closed {
                return Err(FeedhookError::UnclosedEnvRef(input.to_string()));
            }
            let value =
                env::var(&var_name).map_err(|_| FeedhookError::MissingEnv(var_name.clone()))?;
            result.push_str(&value);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}
