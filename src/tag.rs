//! The tag indexer. Groups [`Record`]s by tag slug.

use std::collections::BTreeMap;
use tracing::warn;

use crate::record::Record;

/// Maps each tag slug to the records carrying it. Only tags seen on at least
/// one record are keys. Keys iterate in lexical order; the records in each
/// bucket are in input order and must be sorted before rendering.
pub type TagIndex<'a> = BTreeMap<String, Vec<&'a Record>>;

/// Indexes `records` by tag. A record with N tags lands in N buckets.
///
/// Slugs are used verbatim as directory names, so slugs that could escape or
/// alias the tag output directory (see [`is_safe_slug`]) are logged and left
/// out of the index.
pub fn index_records(records: &[Record]) -> TagIndex<'_> {
    let mut index = TagIndex::new();
    for record in records {
        for tag in record.tags.iter() {
            if !is_safe_slug(tag) {
                warn!("ignoring unsafe tag `{}` in `{}`", tag, record.url);
                continue;
            }
            index.entry(tag.clone()).or_default().push(record);
        }
    }
    index
}

/// Returns whether `slug` can be used as a single path segment.
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(|c: char| c == '/' || c == '\\' || c == '\0')
}
