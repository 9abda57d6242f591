//! Polling settings and notification sink validation.

use crate::schema::*;

use super::ValidationResult;

pub(super) fn validate_http(http: &HttpSettings, result: &mut ValidationResult) {
    if http.rss_url.trim().is_empty() {
        result.error("http.rss_url", "feed URL must not be empty");
    } else if !is_http_url(&http.rss_url) {
        result.error(
            "http.rss_url",
            format!("URL must start with http:// or https://, got '{}'", http.rss_url),
        );
    }
    if http.polling_interval_ms == Some(0) {
        result.warn(
            "http.pollingIntervalMs",
            "pollingIntervalMs of 0 falls back to the default interval",
        );
    }
}

pub(super) fn validate_outputs(outputs: &[MatchOutput], result: &mut ValidationResult) {
    for (i, output) in outputs.iter().enumerate() {
        let path = format!("match_outputs[{i}]");

        match output.declared_count() {
            0 => {
                result.error(&path, "output must declare one of stdout, gotify or http");
                continue;
            }
            1 => {}
            _ => result.warn(
                &path,
                "output declares several sinks; only the first of stdout, gotify, http is used",
            ),
        }

        match output.sink() {
            Some(SinkConfig::Gotify(gotify)) => {
                check_url(&gotify.url, &format!("{path}.gotify.url"), result);
                if gotify.token.is_empty() {
                    result.error(format!("{path}.gotify.token"), "Gotify sink requires 'token'");
                }
                check_secret_value(&gotify.token, &format!("{path}.gotify.token"), result);
            }
            Some(SinkConfig::Http(http)) => {
                check_url(&http.url, &format!("{path}.http.url"), result);
                if http.method.is_empty() || !http.method.chars().all(|c| c.is_ascii_alphabetic()) {
                    result.error(
                        format!("{path}.http.method"),
                        format!("invalid HTTP method: '{}'", http.method),
                    );
                }
                if http.payload_tmpl.is_empty() {
                    result.warn(
                        format!("{path}.http.payload_tmpl"),
                        "empty payload_tmpl sends an empty body",
                    );
                } else if let Err(e) = check_template(&http.payload_tmpl) {
                    result.error(
                        format!("{path}.http.payload_tmpl"),
                        format!("invalid template: {e}"),
                    );
                }
            }
            Some(SinkConfig::Console) | None => {}
        }
    }
}

/// Parse a payload template without rendering it.
fn check_template(source: &str) -> Result<(), minijinja::Error> {
    let env = minijinja::Environment::new();
    env.template_from_str(source).map(|_| ())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn check_url(url: &str, path: &str, result: &mut ValidationResult) {
    // `${VAR}` references are resolved when the sink is built.
    if url.starts_with("${") {
        return;
    }
    if !is_http_url(url) {
        result.error(
            path,
            format!("URL must start with http:// or https://, got '{url}'"),
        );
    }
}

/// Warn if a value looks like a raw secret instead of `${ENV_VAR}` reference.
fn check_secret_value(value: &str, path: &str, result: &mut ValidationResult) {
    if !value.is_empty() && !value.starts_with("${") && looks_like_secret(value) {
        result.warn(
            path,
            "Value looks like a raw secret. Consider using '${ENV_VAR}' syntax instead",
        );
    }
}

/// Heuristic: a value "looks like" a secret if it's long enough with mixed chars
/// and doesn't look like a normal URL or text.
fn looks_like_secret(v: &str) -> bool {
    if is_http_url(v) {
        return false;
    }
    // Gotify app tokens are short mixed-case strings with a leading 'A'.
    if v.len() >= 12 {
        let has_upper = v.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = v.chars().any(|c| c.is_ascii_lowercase());
        let only_token_chars = v.chars().all(|c| c.is_ascii_alphanumeric() || ".-_".contains(c));
        return has_upper && has_lower && only_token_chars;
    }
    false
}
