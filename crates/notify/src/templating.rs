//! Minijinja template rendering for HTTP sink payloads.
//!
//! Templates are arbitrary strings from the config file (not pre-registered),
//! so a fresh [`minijinja::Environment`] is created per render call.

use std::collections::BTreeMap;

use crate::traits::{MatchEvent, NotifyError};

/// Context data available to payload templates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PayloadContext {
    pub entry: EntryContext,
    /// Named capture groups exported by the evaluation.
    pub groups: BTreeMap<String, String>,
    /// Matched rule descriptors in declaration order.
    pub matched: Vec<String>,
}

/// Item fields exposed to templates. Timestamps are RFC 3339 or empty.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EntryContext {
    pub id: String,
    pub author: String,
    pub title: String,
    pub link: String,
    pub raw: String,
    pub published: String,
    pub updated: String,
}

impl From<&MatchEvent> for PayloadContext {
    fn from(event: &MatchEvent) -> Self {
        let item = &event.item;
        Self {
            entry: EntryContext {
                id: item.id.clone(),
                author: item.author.clone(),
                title: item.title.clone(),
                link: item.link.clone(),
                raw: item.raw.clone(),
                published: item.published_str(),
                updated: item.updated_str(),
            },
            groups: event.outcome.groups.clone(),
            matched: event.outcome.matched.clone(),
        }
    }
}

/// Renders payload templates using minijinja.
#[derive(Debug)]
pub struct TemplateRenderer {
    _private: (),
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Build a configured minijinja environment with custom filters and globals.
    fn build_env() -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();

        // `lower` and `upper` are built-in with the "builtins" feature,
        // but we register explicit versions to guarantee availability.
        env.add_filter("lower", lower_filter);
        env.add_filter("upper", upper_filter);

        env.add_function("env", env_function);

        env
    }

    /// Render a template string with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template is invalid or
    /// rendering fails.
    pub fn render(&self, template_str: &str, ctx: &PayloadContext) -> Result<String, NotifyError> {
        let env = Self::build_env();
        env.render_str(template_str, ctx)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }

    /// Check that a template string parses, without evaluating it.
    pub fn validate(&self, template_str: &str) -> Result<(), NotifyError> {
        let env = Self::build_env();
        env.template_from_str(template_str)
            .map_err(|e| NotifyError::Template(e.to_string()))?;
        Ok(())
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn lower_filter(value: String) -> String {
    value.to_lowercase()
}

fn upper_filter(value: String) -> String {
    value.to_uppercase()
}

/// Global function: read an environment variable by name.
///
/// Returns an empty string (and logs a warning) when the variable is unset.
fn env_function(name: String) -> String {
    match std::env::var(&name) {
        Ok(val) => val,
        Err(_) => {
            tracing::warn!(var = %name, "Environment variable not found, returning empty string");
            String::new()
        }
    }
}
