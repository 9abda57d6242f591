//! Target resolution: which strings a rule is tested against.

use std::collections::{BTreeMap, HashMap};

use crate::fields::{FieldMap, FieldName};
use crate::schema::TargetSelector;

/// Resolve a selector to the list of target strings for the current item.
///
/// Ref and capture-group selectors with no entry yet yield an empty list,
/// which means the rule simply does not match this item.
pub(crate) fn resolve_targets(
    selector: &TargetSelector,
    fields: &FieldMap<'_>,
    refs: &HashMap<String, String>,
    groups: &BTreeMap<String, String>,
) -> Vec<String> {
    match selector {
        TargetSelector::Ref(name) => refs.get(name).cloned().into_iter().collect(),
        TargetSelector::CaptureGroup(name) => groups.get(name).cloned().into_iter().collect(),
        TargetSelector::Raw => vec![fields.get(FieldName::Raw).to_string()],
        TargetSelector::Field(field) => vec![fields.get(*field).to_string()],
        TargetSelector::Fields(list) => list.iter().map(|f| fields.get(*f).to_string()).collect(),
    }
}
