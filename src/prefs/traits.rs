// Preference store trait — backend-agnostic async interface.
//
// Reads never fail: a missing or corrupt record degrades to default
// settings with a logged warning. Writes DO fail visibly — silently
// dropping a user's preferences is worse than showing them an error.

use async_trait::async_trait;
use thiserror::Error;

use super::models::UserSettings;

/// A settings write (or delete) could not be completed.
#[derive(Debug, Error)]
#[error("failed to persist settings for user {user_id}: {source}")]
pub struct PersistenceError {
    pub user_id: i64,
    #[source]
    pub source: anyhow::Error,
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Load a user's settings. Returns defaults when the user has no
    /// record or the stored record can't be read.
    async fn get(&self, user_id: i64) -> UserSettings;

    /// Write a user's settings (upsert, last write wins).
    async fn set(&self, user_id: i64, settings: &UserSettings) -> Result<(), PersistenceError>;

    /// Remove a user's record entirely. `Ok(false)` when none existed.
    async fn delete(&self, user_id: i64) -> Result<bool, PersistenceError>;

    /// Whether the user has a stored record.
    async fn exists(&self, user_id: i64) -> bool;
}
