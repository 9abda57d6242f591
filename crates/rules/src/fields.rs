//! Field extraction: the fixed set of named item fields rules can target.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use feedhook_core::Item;

/// All field names accepted by `targetField` / `targetFields`.
pub const FIELD_NAMES: &[&str] = &["id", "author", "title", "raw"];

/// A named item field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    Id,
    Author,
    Title,
    Raw,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Id => "id",
            FieldName::Author => "author",
            FieldName::Title => "title",
            FieldName::Raw => "raw",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(FieldName::Id),
            "author" => Ok(FieldName::Author),
            "title" => Ok(FieldName::Title),
            "raw" => Ok(FieldName::Raw),
            other => Err(format!("unknown field: '{}'", other)),
        }
    }
}

/// The string view of an item that rules are matched against.
///
/// Every field is always present; data missing from the feed is the empty
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap<'a> {
    id: &'a str,
    author: &'a str,
    title: &'a str,
    raw: &'a str,
}

impl<'a> FieldMap<'a> {
    pub fn extract(item: &'a Item) -> Self {
        Self {
            id: &item.id,
            author: &item.author,
            title: &item.title,
            raw: &item.raw,
        }
    }

    pub fn get(&self, name: FieldName) -> &'a str {
        match name {
            FieldName::Id => self.id,
            FieldName::Author => self.author,
            FieldName::Title => self.title,
            FieldName::Raw => self.raw,
        }
    }

    /// Iterate `(name, value)` pairs in the fixed field order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &'a str)> + '_ {
        [FieldName::Id, FieldName::Author, FieldName::Title, FieldName::Raw]
            .into_iter()
            .map(move |name| (name, self.get(name)))
    }
}
