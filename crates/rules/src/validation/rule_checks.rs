//! Rule list validation: selectors, ref ordering, pattern compilation.

use std::collections::HashSet;

use regex::Regex;

use crate::fields::FIELD_NAMES;
use crate::schema::*;

use super::fuzzy::fuzzy_match;
use super::ValidationResult;

pub(super) fn validate_rules(rules: &[RuleSpec], result: &mut ValidationResult) {
    // Refs and capture groups made available by rules seen so far.
    let mut bound_refs: HashSet<&str> = HashSet::new();
    let mut capture_groups: HashSet<String> = HashSet::new();

    for (i, rule) in rules.iter().enumerate() {
        let path = format!("rules[{i}]");

        validate_selector(rule, &path, &bound_refs, &capture_groups, result);
        validate_pattern(rule, &path, &mut capture_groups, result);

        if rule.distance_threshold.is_some() && rule.rule_type != RuleType::StringDistance {
            result.warn(
                format!("{path}.distanceThreshold"),
                format!("distanceThreshold is ignored for ruleType '{}'", rule.rule_type),
            );
        }

        // A rule's own ref only becomes visible to the rules after it.
        if let Some(name) = rule.bound_ref() {
            bound_refs.insert(name);
        }
    }
}

fn validate_selector(
    rule: &RuleSpec,
    path: &str,
    bound_refs: &HashSet<&str>,
    capture_groups: &HashSet<String>,
    result: &mut ValidationResult,
) {
    match rule.selector() {
        Ok(Some(TargetSelector::Ref(name))) => {
            if !bound_refs.contains(name.as_str()) {
                result.error(
                    format!("{path}.targetRef"),
                    format!("targetRef '{name}' not defined before use"),
                );
            }
        }
        Ok(Some(TargetSelector::CaptureGroup(name))) => {
            if !capture_groups.contains(&name) {
                result.warn(
                    format!("{path}.targetCaptureGroup"),
                    format!(
                        "no earlier regex_named_capture rule declares group '{name}'; this rule will never match"
                    ),
                );
            }
        }
        Ok(Some(_)) => {}
        Ok(None) => {
            result.error(
                path,
                "rule must declare one of targetRef, targetCaptureGroup, matchRaw, targetField or targetFields",
            );
        }
        Err(unknown) => {
            let field_path = if rule.target_field.as_deref() == Some(unknown.as_str()) {
                format!("{path}.targetField")
            } else {
                format!("{path}.targetFields")
            };
            let message = format!(
                "unknown field '{unknown}', expected one of: {}",
                FIELD_NAMES.join(", ")
            );
            match fuzzy_match(&unknown, FIELD_NAMES) {
                Some(suggestion) => result.error_with_suggestion(field_path, message, suggestion),
                None => result.error(field_path, message),
            }
        }
    }
}

fn validate_pattern(
    rule: &RuleSpec,
    path: &str,
    capture_groups: &mut HashSet<String>,
    result: &mut ValidationResult,
) {
    if !rule.rule_type.is_regex() {
        if rule.pattern.is_empty() && rule.rule_type == RuleType::StringContains {
            result.warn(
                format!("{path}.pattern"),
                "empty stringContains pattern matches every item",
            );
        }
        return;
    }

    match Regex::new(&rule.pattern) {
        Ok(re) => {
            if rule.rule_type == RuleType::RegexNamedCapture {
                let names: Vec<&str> = re.capture_names().flatten().collect();
                if names.is_empty() {
                    result.warn(
                        format!("{path}.pattern"),
                        "regex_named_capture pattern has no named groups; nothing will be exported",
                    );
                }
                capture_groups.extend(names.into_iter().map(str::to_string));
            }
        }
        Err(e) => {
            result.error(format!("{path}.pattern"), format!("invalid regex: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::WatchConfig;
    use crate::validation::validate_config;

    fn config_with_rules(rules_yaml: &str) -> WatchConfig {
        let yaml = format!("rules:\n{rules_yaml}\nhttp:\n  rss_url: https://example.com/feed\n");
        WatchConfig::from_yaml(&yaml).unwrap()
    }

    #[test]
    fn target_ref_defined_earlier_is_valid() {
        let config = config_with_rules(
            r#"
  - ruleType: regex
    targetFields: [author]
    pattern: "(?i)Fancy"
    ref: fancy_author
  - ruleType: regex
    targetRef: fancy_author
    pattern: "^/u/FancyNewMe$"
"#,
        );
        let result = validate_config(&config);
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn target_ref_never_defined() {
        let config = config_with_rules(
            r#"
  - ruleType: regex
    targetRef: ghost
    pattern: x
"#,
        );
        let result = validate_config(&config);
        assert!(!result.valid);
        assert_eq!(result.errors[0].path, "rules[0].targetRef");
        assert!(result.errors[0].message.contains("'ghost'"));
    }

    #[test]
    fn target_ref_defined_later_is_rejected() {
        let config = config_with_rules(
            r#"
  - ruleType: regex
    targetRef: later
    pattern: x
  - ruleType: stringContains
    targetField: title
    pattern: y
    ref: later
"#,
        );
        let result = validate_config(&config);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "rules[0].targetRef");
    }

    #[test]
    fn own_ref_does_not_satisfy_own_target_ref() {
        let config = config_with_rules(
            r#"
  - ruleType: regex
    targetRef: self_ref
    ref: self_ref
    pattern: x
"#,
        );
        assert!(!validate_config(&config).valid);
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let config = config_with_rules(
            r#"
  - ruleType: regex_named_capture
    targetField: title
    pattern: "(?P<bill>S-\\d+"
"#,
        );
        let result = validate_config(&config);
        assert!(!result.valid);
        assert_eq!(result.errors[0].path, "rules[0].pattern");
        assert!(result.errors[0].message.starts_with("invalid regex"));
    }

    #[test]
    fn stringcontains_pattern_is_not_compiled() {
        let config = config_with_rules(
            r#"
  - ruleType: stringContains
    targetField: title
    pattern: "(unbalanced"
"#,
        );
        assert!(validate_config(&config).valid);
    }

    #[test]
    fn missing_selector_is_an_error() {
        let config = config_with_rules("  - ruleType: regex\n    pattern: x\n");
        let result = validate_config(&config);
        assert!(!result.valid);
        assert_eq!(result.errors[0].path, "rules[0]");
    }

    #[test]
    fn unknown_field_suggests_closest() {
        let config = config_with_rules(
            "  - ruleType: regex\n    pattern: x\n    targetFields: [titel]\n",
        );
        let result = validate_config(&config);
        assert!(!result.valid);
        assert_eq!(result.errors[0].path, "rules[0].targetFields");
        assert_eq!(result.errors[0].suggestion.as_deref(), Some("title"));
    }

    #[test]
    fn unknown_single_field_reports_target_field_path() {
        let config = config_with_rules("  - ruleType: regex\n    pattern: x\n    targetField: body\n");
        let result = validate_config(&config);
        assert_eq!(result.errors[0].path, "rules[0].targetField");
    }

    #[test]
    fn threshold_on_non_distance_rule_warns() {
        let config = config_with_rules(
            "  - ruleType: regex\n    pattern: x\n    targetField: title\n    distanceThreshold: 3\n",
        );
        let result = validate_config(&config);
        assert!(result.valid);
        assert_eq!(result.warnings[0].path, "rules[0].distanceThreshold");
    }

    #[test]
    fn capture_group_without_producer_warns() {
        let config = config_with_rules(
            r#"
  - ruleType: regex_named_capture
    targetField: title
    pattern: "(?P<bill>S-\\d+)"
  - ruleType: regex
    targetCaptureGroup: bill
    pattern: "^S-218$"
  - ruleType: regex
    targetCaptureGroup: act
    pattern: "x"
"#,
        );
        let result = validate_config(&config);
        assert!(result.valid, "{:?}", result.errors);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].path, "rules[2].targetCaptureGroup");
    }

    #[test]
    fn named_capture_without_groups_warns() {
        let config = config_with_rules(
            "  - ruleType: regex_named_capture\n    pattern: \"S-\\\\d+\"\n    targetField: title\n",
        );
        let result = validate_config(&config);
        assert!(result.valid);
        assert_eq!(result.warnings[0].path, "rules[0].pattern");
    }
}
