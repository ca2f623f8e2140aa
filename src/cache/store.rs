//! SQLite-backed blob store for cached records.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Namespace holding every cached chapter record.
pub const BUCKET_CHAPTERS: &str = "chapters";

/// Key of the blob holding the entire chapter summary collection.
pub const KEY_CHAPTERS_SUMMARY: &str = "chapters_summary";

/// Schema for the cache table. `IF NOT EXISTS` keeps initialization
/// idempotent across runs.
const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS chapter_cache (
    bucket TEXT NOT NULL,
    key TEXT NOT NULL,
    data BLOB NOT NULL,
    PRIMARY KEY (bucket, key)
);
"#;

/// Durable key-value store for codec-produced blobs.
///
/// Every operation is a single SQLite statement running in its own implicit
/// transaction; readers never observe a partially written record.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open or create the store at the default location.
  pub fn open() -> Result<Self> {
    Self::open_at(&Self::default_path()?)
  }

  /// Open or create the store at the given path.
  pub fn open_at(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;

    Ok(store)
  }

  /// Ephemeral in-memory store.
  #[cfg(test)]
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory cache database: {}", e))?;

    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;

    Ok(store)
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("mushaf").join("cache.db"))
  }

  /// Run database migrations for the cache table.
  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(())
  }

  /// Read the blob stored under a key, if any.
  pub fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let mut stmt = conn
      .prepare("SELECT data FROM chapter_cache WHERE bucket = ? AND key = ?")
      .map_err(|e| eyre!("Failed to prepare cache lookup: {}", e))?;

    stmt
      .query_row(params![bucket, key], |row| row.get(0))
      .optional()
      .map_err(|e| eyre!("Failed to read cache entry {}/{}: {}", bucket, key, e))
  }

  /// Durably write a blob, replacing any previous value under the key.
  pub fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO chapter_cache (bucket, key, data) VALUES (?, ?, ?)",
        params![bucket, key, data],
      )
      .map_err(|e| eyre!("Failed to write cache entry {}/{}: {}", bucket, key, e))?;

    Ok(())
  }

  /// Remove a key. Removing an absent key is not an error.
  pub fn delete(&self, bucket: &str, key: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "DELETE FROM chapter_cache WHERE bucket = ? AND key = ?",
        params![bucket, key],
      )
      .map_err(|e| eyre!("Failed to delete cache entry {}/{}: {}", bucket, key, e))?;

    Ok(())
  }
}
