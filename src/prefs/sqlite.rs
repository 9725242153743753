// SqlitePreferenceStore — rusqlite backend implementing PreferenceStore.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is
// !Send. Trait methods lock the mutex, do synchronous rusqlite work, and
// return; the lock is never held across .await points. Settings are
// stored as one JSON blob per user id.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;
use tracing::warn;

use super::models::UserSettings;
use super::traits::{PersistenceError, PreferenceStore};

pub struct SqlitePreferenceStore {
    conn: Mutex<Connection>,
}

impl SqlitePreferenceStore {
    /// Wrap an already-opened rusqlite Connection, ensuring the schema.
    pub fn new(conn: Connection) -> anyhow::Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_settings (
                user_id  INTEGER PRIMARY KEY,
                settings TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// An in-memory store for tests.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn get(&self, user_id: i64) -> UserSettings {
        let conn = self.conn.lock().await;
        let row: Result<Option<String>, _> = conn
            .query_row(
                "SELECT settings FROM user_settings WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional();

        match row {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!(user_id, error = %err, "corrupt settings record, using defaults");
                    UserSettings::default()
                }
            },
            Ok(None) => UserSettings::default(),
            Err(err) => {
                warn!(user_id, error = %err, "settings read failed, using defaults");
                UserSettings::default()
            }
        }
    }

    async fn set(&self, user_id: i64, settings: &UserSettings) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(settings).map_err(|err| PersistenceError {
            user_id,
            source: err.into(),
        })?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO user_settings (user_id, settings) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET settings = excluded.settings",
            params![user_id, json],
        )
        .map_err(|err| PersistenceError {
            user_id,
            source: err.into(),
        })?;
        Ok(())
    }

    async fn delete(&self, user_id: i64) -> Result<bool, PersistenceError> {
        let conn = self.conn.lock().await;
        let removed = conn
            .execute(
                "DELETE FROM user_settings WHERE user_id = ?1",
                params![user_id],
            )
            .map_err(|err| PersistenceError {
                user_id,
                source: err.into(),
            })?;
        Ok(removed > 0)
    }

    async fn exists(&self, user_id: i64) -> bool {
        let conn = self.conn.lock().await;
        let row: Result<Option<i64>, _> = conn
            .query_row(
                "SELECT 1 FROM user_settings WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional();

        match row {
            Ok(found) => found.is_some(),
            Err(err) => {
                warn!(user_id, error = %err, "settings existence check failed");
                false
            }
        }
    }
}
