// User settings — the record the preference store persists per user.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-user search preferences.
///
/// `auto_tags` keeps insertion order and holds no duplicates — the order
/// is visible in every composed query. `toggle_rules` maps a rule string
/// (e.g. `rating:safe`) to its enabled state; rules compose in the map's
/// lexical key order, which is stable across processes and serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub auto_tags: Vec<String>,
    #[serde(default)]
    pub toggle_rules: BTreeMap<String, bool>,
}

impl UserSettings {
    /// The rule strings currently switched on, in map order.
    pub fn enabled_rules(&self) -> impl Iterator<Item = &str> {
        self.toggle_rules
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(rule, _)| rule.as_str())
    }
}
