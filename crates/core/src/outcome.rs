use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Result of evaluating one item against the active rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// `"<kind>:<pattern>"` descriptors in rule declaration order.
    pub matched: Vec<String>,
    /// Named capture groups exported by `regex_named_capture` rules.
    pub groups: BTreeMap<String, String>,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        !self.matched.is_empty()
    }

    /// JSON array of the matched descriptors, as persisted by the dedup store.
    pub fn matched_json(&self) -> String {
        serde_json::to_string(&self.matched).unwrap_or_else(|_| "[]".to_string())
    }

    /// JSON object of the capture groups, as persisted by the dedup store.
    pub fn groups_json(&self) -> String {
        serde_json::to_string(&self.groups).unwrap_or_else(|_| "{}".to_string())
    }
}
