//! Maps parsed feed entries onto [`Item`].

use feed_rs::model::Entry;

use feedhook_core::Item;

use crate::error::IngestError;

/// Parse a feed document and normalize its entries, keeping feed order.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<Item>, IngestError> {
    let feed = feed_rs::parser::parse(bytes)?;
    Ok(feed.entries.into_iter().map(item_from_entry).collect())
}

/// Missing values become empty strings. The id falls back to the first link
/// and the body falls back to the summary.
fn item_from_entry(entry: Entry) -> Item {
    let link = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_default();

    let id = if entry.id.is_empty() {
        link.clone()
    } else {
        entry.id
    };

    let raw = entry
        .content
        .and_then(|c| c.body)
        .or_else(|| entry.summary.map(|s| s.content))
        .unwrap_or_default();

    Item {
        id,
        author: entry
            .authors
            .first()
            .map(|p| p.name.clone())
            .unwrap_or_default(),
        title: entry.title.map(|t| t.content).unwrap_or_default(),
        link,
        raw,
        published: entry.published,
        updated: entry.updated,
    }
}
