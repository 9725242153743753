// Tag-query composition — merge a raw query with stored preferences.
//
// Pure string assembly, no validation of tag syntax: the API treats the
// query as an opaque tag list, and so do we.

use crate::prefs::models::UserSettings;

/// Build the final tag query: the base query, then the user's auto-tags
/// in stored order, then the enabled toggle rules in map order, joined
/// with single spaces and trimmed.
pub fn compose(base_query: &str, settings: &UserSettings) -> String {
    let mut parts: Vec<&str> = Vec::new();

    if !base_query.is_empty() {
        parts.push(base_query);
    }
    for tag in &settings.auto_tags {
        parts.push(tag);
    }
    for rule in settings.enabled_rules() {
        parts.push(rule);
    }

    parts.join(" ").trim().to_string()
}
