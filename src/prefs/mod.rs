// Preference storage — per-user settings behind a backend-agnostic trait.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. The database file lives wherever SEPIA_DB_PATH points
// (defaults to ./sepia.db).

pub mod models;
pub mod sqlite;
pub mod traits;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

use self::sqlite::SqlitePreferenceStore;
use self::traits::PreferenceStore;

/// Open (or create) the settings database and ensure the schema exists.
pub fn open_sqlite(db_path: &str) -> Result<Arc<dyn PreferenceStore>> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for database: {}", db_path))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open settings database at {}", db_path))?;

    // WAL keeps reads cheap while a write is in flight
    conn.pragma_update(None, "journal_mode", "WAL")?;

    Ok(Arc::new(SqlitePreferenceStore::new(conn)?))
}
