// User settings operations — read-modify-write over the preference store.
//
// Every mutation loads the current record, applies one change, and writes
// the whole record back. There is no cross-update reconciliation: two
// racing mutations from the same user resolve last-write-wins.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::prefs::models::UserSettings;
use crate::prefs::traits::{PersistenceError, PreferenceStore};

pub struct UserService {
    store: Arc<dyn PreferenceStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub async fn settings(&self, user_id: i64) -> UserSettings {
        self.store.get(user_id).await
    }

    /// Append an auto-tag. Returns false (and writes nothing) when the
    /// tag is already present.
    pub async fn add_auto_tag(&self, user_id: i64, tag: &str) -> Result<bool, PersistenceError> {
        let mut settings = self.store.get(user_id).await;
        if settings.auto_tags.iter().any(|t| t == tag) {
            debug!(user_id, tag, "auto-tag already present");
            return Ok(false);
        }
        settings.auto_tags.push(tag.to_string());
        self.store.set(user_id, &settings).await?;
        info!(user_id, tag, "auto-tag added");
        Ok(true)
    }

    /// Remove an auto-tag by value. Returns false when it wasn't there.
    pub async fn remove_auto_tag(&self, user_id: i64, tag: &str) -> Result<bool, PersistenceError> {
        let mut settings = self.store.get(user_id).await;
        let Some(pos) = settings.auto_tags.iter().position(|t| t == tag) else {
            debug!(user_id, tag, "auto-tag not found");
            return Ok(false);
        };
        settings.auto_tags.remove(pos);
        self.store.set(user_id, &settings).await?;
        info!(user_id, tag, "auto-tag removed");
        Ok(true)
    }

    /// Remove an auto-tag by position in the stored order. Returns false
    /// for an out-of-range index.
    pub async fn remove_auto_tag_at(
        &self,
        user_id: i64,
        index: usize,
    ) -> Result<bool, PersistenceError> {
        let mut settings = self.store.get(user_id).await;
        if index >= settings.auto_tags.len() {
            debug!(user_id, index, "auto-tag index out of range");
            return Ok(false);
        }
        let removed = settings.auto_tags.remove(index);
        self.store.set(user_id, &settings).await?;
        info!(user_id, tag = %removed, index, "auto-tag removed");
        Ok(true)
    }

    /// Drop all auto-tags, returning how many were removed.
    pub async fn clear_auto_tags(&self, user_id: i64) -> Result<usize, PersistenceError> {
        let mut settings = self.store.get(user_id).await;
        let count = settings.auto_tags.len();
        settings.auto_tags.clear();
        self.store.set(user_id, &settings).await?;
        info!(user_id, count, "auto-tags cleared");
        Ok(count)
    }

    /// Flip a toggle rule, creating it (enabled) when it didn't exist.
    /// Returns the new state.
    pub async fn toggle_rule(&self, user_id: i64, rule: &str) -> Result<bool, PersistenceError> {
        let mut settings = self.store.get(user_id).await;
        let new_state = !settings.toggle_rules.get(rule).copied().unwrap_or(false);
        settings.toggle_rules.insert(rule.to_string(), new_state);
        self.store.set(user_id, &settings).await?;
        info!(user_id, rule, enabled = new_state, "toggle rule flipped");
        Ok(new_state)
    }

    /// Force a rule to a specific state.
    pub async fn set_rule(
        &self,
        user_id: i64,
        rule: &str,
        enabled: bool,
    ) -> Result<(), PersistenceError> {
        let mut settings = self.store.get(user_id).await;
        settings.toggle_rules.insert(rule.to_string(), enabled);
        self.store.set(user_id, &settings).await?;
        info!(user_id, rule, enabled, "toggle rule set");
        Ok(())
    }

    /// The rules currently switched on, in composition order.
    pub async fn enabled_rules(&self, user_id: i64) -> Vec<String> {
        let settings = self.store.get(user_id).await;
        settings.enabled_rules().map(str::to_string).collect()
    }

    /// Every rule with its state.
    pub async fn all_rules(&self, user_id: i64) -> BTreeMap<String, bool> {
        self.store.get(user_id).await.toggle_rules
    }

    /// Drop all toggle rules, returning how many were removed.
    pub async fn clear_rules(&self, user_id: i64) -> Result<usize, PersistenceError> {
        let mut settings = self.store.get(user_id).await;
        let count = settings.toggle_rules.len();
        settings.toggle_rules.clear();
        self.store.set(user_id, &settings).await?;
        info!(user_id, count, "toggle rules cleared");
        Ok(count)
    }

    /// Overwrite the user's record with defaults.
    pub async fn reset(&self, user_id: i64) -> Result<(), PersistenceError> {
        self.store.set(user_id, &UserSettings::default()).await?;
        info!(user_id, "settings reset to defaults");
        Ok(())
    }

    /// Remove the user's record entirely.
    pub async fn delete(&self, user_id: i64) -> Result<bool, PersistenceError> {
        let deleted = self.store.delete(user_id).await?;
        if deleted {
            info!(user_id, "settings deleted");
        }
        Ok(deleted)
    }

    pub async fn exists(&self, user_id: i64) -> bool {
        self.store.exists(user_id).await
    }
}
