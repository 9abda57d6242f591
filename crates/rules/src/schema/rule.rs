//! Rule declarations and their target selectors.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fields::FieldName;

/// The kind of match test a rule performs.
///
/// The serialized name is also the `<kind>` part of a matched descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleType {
    /// Case-sensitive substring test.
    #[serde(rename = "stringContains")]
    StringContains,
    /// Unanchored regular expression test.
    #[serde(rename = "regex")]
    Regex,
    /// Regular expression whose named groups are exported for later rules.
    #[serde(rename = "regex_named_capture")]
    RegexNamedCapture,
    /// Levenshtein distance against the pattern, bounded by `distanceThreshold`.
    #[serde(rename = "string_distance")]
    StringDistance,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::StringContains => "stringContains",
            RuleType::Regex => "regex",
            RuleType::RegexNamedCapture => "regex_named_capture",
            RuleType::StringDistance => "string_distance",
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, RuleType::Regex | RuleType::RegexNamedCapture)
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule as declared in the config file.
///
/// Selector fields are flat here to keep the YAML readable; use
/// [`RuleSpec::selector`] to get the one that actually applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    pub rule_type: RuleType,
    #[serde(default)]
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_field: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub match_raw: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_threshold: Option<usize>,
    /// Name under which the satisfying input text is bound for later rules.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub bind_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_capture_group: Option<String>,
}

/// Where a rule takes its input text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    /// Text bound by an earlier rule's `ref`.
    Ref(String),
    /// A named group exported by an earlier `regex_named_capture` rule.
    CaptureGroup(String),
    /// The raw item body.
    Raw,
    /// One named field.
    Field(FieldName),
    /// Several named fields, each tested independently.
    Fields(Vec<FieldName>),
}

impl RuleSpec {
    /// Resolve the declared selector using the fixed priority
    /// `targetRef` > `targetCaptureGroup` > `matchRaw` > `targetField` > `targetFields`.
    ///
    /// Returns `Ok(None)` when no selector is declared at all and `Err` with the
    /// offending name when a field selector names an unknown field.
    pub fn selector(&self) -> Result<Option<TargetSelector>, String> {
        if let Some(name) = non_empty(&self.target_ref) {
            return Ok(Some(TargetSelector::Ref(name.to_string())));
        }
        if let Some(name) = non_empty(&self.target_capture_group) {
            return Ok(Some(TargetSelector::CaptureGroup(name.to_string())));
        }
        if self.match_raw {
            return Ok(Some(TargetSelector::Raw));
        }
        if let Some(field) = non_empty(&self.target_field) {
            let name = field.parse().map_err(|_| field.to_string())?;
            return Ok(Some(TargetSelector::Field(name)));
        }
        if self.target_fields.is_empty() {
            return Ok(None);
        }
        let fields = self
            .target_fields
            .iter()
            .map(|f| f.parse().map_err(|_| f.clone()))
            .collect::<Result<Vec<FieldName>, String>>()?;
        Ok(Some(TargetSelector::Fields(fields)))
    }

    /// The ref this rule binds on match, ignoring empty names.
    pub fn bound_ref(&self) -> Option<&str> {
        non_empty(&self.bind_ref)
    }

    /// Distance threshold, `0` when not declared.
    pub fn threshold(&self) -> usize {
        self.distance_threshold.unwrap_or(0)
    }

    /// The `"<kind>:<pattern>"` descriptor recorded when this rule matches.
    pub fn descriptor(&self) -> String {
        format!("{}:{}", self.rule_type, self.pattern)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
