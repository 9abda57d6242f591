//! Rules compiled once at load time.

use regex::Regex;

use crate::loader::RuleError;
use crate::schema::{RuleSpec, RuleType, TargetSelector};
use crate::validation::fuzzy::levenshtein;

/// The per-kind match test of a compiled rule.
#[derive(Debug, Clone)]
enum Matcher {
    Contains(String),
    Regex(Regex),
    NamedCapture(Regex),
    Distance { pattern: String, threshold: usize },
}

/// A rule ready for evaluation: selector resolved, pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule_type: RuleType,
    selector: TargetSelector,
    bind_ref: Option<String>,
    descriptor: String,
    matcher: Matcher,
}

/// Named groups exported by a successful test, empty for non-capturing kinds.
pub(crate) type Captures = Vec<(String, String)>;

impl CompiledRule {
    /// Compile the rule at position `index` of the rule list.
    pub fn compile(index: usize, spec: &RuleSpec) -> Result<Self, RuleError> {
        let selector = spec
            .selector()
            .map_err(|field| RuleError::UnknownField { index, field })?
            .ok_or(RuleError::MissingTarget { index })?;

        let matcher = match spec.rule_type {
            RuleType::StringContains => Matcher::Contains(spec.pattern.clone()),
            RuleType::Regex => Matcher::Regex(compile_regex(index, &spec.pattern)?),
            RuleType::RegexNamedCapture => {
                Matcher::NamedCapture(compile_regex(index, &spec.pattern)?)
            }
            RuleType::StringDistance => Matcher::Distance {
                pattern: spec.pattern.clone(),
                threshold: spec.threshold(),
            },
        };

        Ok(Self {
            rule_type: spec.rule_type,
            selector,
            bind_ref: spec.bound_ref().map(str::to_string),
            descriptor: spec.descriptor(),
            matcher,
        })
    }

    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    pub fn selector(&self) -> &TargetSelector {
        &self.selector
    }

    /// Ref name bound to the satisfying text when this rule matches.
    pub fn bind_ref(&self) -> Option<&str> {
        self.bind_ref.as_deref()
    }

    /// `"<kind>:<pattern>"`.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Run the match test against one target string.
    ///
    /// `None` means no match. A named-capture match exports every named group
    /// that participated with a non-empty value.
    pub(crate) fn test(&self, text: &str) -> Option<Captures> {
        match &self.matcher {
            Matcher::Contains(pattern) => text.contains(pattern.as_str()).then(Vec::new),
            Matcher::Regex(re) => re.is_match(text).then(Vec::new),
            Matcher::NamedCapture(re) => {
                let caps = re.captures(text)?;
                let exported = re
                    .capture_names()
                    .flatten()
                    .filter_map(|name| {
                        caps.name(name)
                            .map(|m| m.as_str())
                            .filter(|value| !value.is_empty())
                            .map(|value| (name.to_string(), value.to_string()))
                    })
                    .collect();
                Some(exported)
            }
            Matcher::Distance { pattern, threshold } => {
                (levenshtein(text, pattern) <= *threshold).then(Vec::new)
            }
        }
    }
}

fn compile_regex(index: usize, pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidPattern { index, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(rule_type: RuleType, pattern: &str) -> RuleSpec {
        RuleSpec {
            rule_type,
            pattern: pattern.to_string(),
            target_fields: vec!["title".to_string()],
            target_field: None,
            match_raw: false,
            distance_threshold: None,
            bind_ref: None,
            target_ref: None,
            target_capture_group: None,
        }
    }

    #[test]
    fn contains_is_case_sensitive() {
        let rule = CompiledRule::compile(0, &spec(RuleType::StringContains, "GoLang")).unwrap();
        assert!(rule.test("Learning GoLang with fun").is_some());
        assert!(rule.test("learning golang with fun").is_none());
    }

    #[test]
    fn regex_is_unanchored() {
        let rule = CompiledRule::compile(0, &spec(RuleType::Regex, "S-\\d+")).unwrap();
        assert!(rule.test("Parliament passed bill S-218 today").is_some());
        assert!(rule.test("no bill here").is_none());
    }

    #[test]
    fn named_capture_exports_groups() {
        let rule =
            CompiledRule::compile(0, &spec(RuleType::RegexNamedCapture, r"(?P<tag>Go\d+)")).unwrap();
        let caps = rule.test("Release note: Go123 is here").unwrap();
        assert_eq!(caps, vec![("tag".to_string(), "Go123".to_string())]);
    }

    #[test]
    fn named_capture_skips_groups_that_did_not_participate() {
        let rule = CompiledRule::compile(
            0,
            &spec(RuleType::RegexNamedCapture, r"(?P<bill>S-\d+)|(?P<act>C-\d+)"),
        )
        .unwrap();
        let caps = rule.test("bill C-11").unwrap();
        assert_eq!(caps, vec![("act".to_string(), "C-11".to_string())]);
    }

    #[test]
    fn named_capture_skips_empty_values() {
        let rule =
            CompiledRule::compile(0, &spec(RuleType::RegexNamedCapture, r"S-(?P<n>\d*)")).unwrap();
        assert_eq!(rule.test("S-"), Some(vec![]));
    }

    #[test]
    fn distance_threshold_is_inclusive() {
        let mut s = spec(RuleType::StringDistance, "Crown corporations");
        s.distance_threshold = Some(1);
        let rule = CompiledRule::compile(0, &s).unwrap();
        assert!(rule.test("Crown corporatons").is_some());
        assert!(rule.test("Crown corp").is_none());
    }

    #[test]
    fn distance_defaults_to_exact_match() {
        let rule = CompiledRule::compile(0, &spec(RuleType::StringDistance, "exact")).unwrap();
        assert!(rule.test("exact").is_some());
        assert!(rule.test("exakt").is_none());
    }

    #[test]
    fn invalid_regex_fails_compilation() {
        let err = CompiledRule::compile(3, &spec(RuleType::Regex, "(unclosed")).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { index: 3, .. }));
    }

    #[test]
    fn missing_selector_fails_compilation() {
        let mut s = spec(RuleType::Regex, "x");
        s.target_fields.clear();
        let err = CompiledRule::compile(1, &s).unwrap_err();
        assert!(matches!(err, RuleError::MissingTarget { index: 1 }));
    }

    #[test]
    fn descriptor_and_ref_carried_over() {
        let mut s = spec(RuleType::Regex, "(?i)Fancy");
        s.bind_ref = Some("fancy_author".to_string());
        let rule = CompiledRule::compile(0, &s).unwrap();
        assert_eq!(rule.descriptor(), "regex:(?i)Fancy");
        assert_eq!(rule.bind_ref(), Some("fancy_author"));
        assert_eq!(rule.rule_type(), RuleType::Regex);
    }
}
