// Tag lookup — exact-name search with a wildcard fallback.
//
// An exact hit wins so users aren't flooded with loose matches when the
// tag they typed exists; the substring pattern only runs for queries long
// enough to keep the match set meaningful.

use tracing::info;

use crate::booru::client::BooruClient;
use crate::booru::criteria::TagQuery;
use crate::booru::models::Tag;

/// Queries shorter than this never fall back to a pattern search.
pub const MIN_PATTERN_QUERY_LEN: usize = 3;

/// Search tags by exact name first; when that yields nothing and the
/// query has at least [`MIN_PATTERN_QUERY_LEN`] characters, retry as a
/// `%query%` substring pattern. Either step may come back empty.
pub async fn search_with_fallback(client: &BooruClient, query: &str, limit: u32) -> Vec<Tag> {
    let exact = client.search_tags(&TagQuery::exact(query, limit)).await;
    if !exact.is_empty() {
        return exact;
    }

    if query.chars().count() < MIN_PATTERN_QUERY_LEN {
        return exact;
    }

    info!(query, "no exact tag match, trying pattern search");
    client
        .search_tags(&TagQuery::pattern(format!("%{query}%"), limit))
        .await
}
