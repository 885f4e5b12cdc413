/*!
 * SQLite-backed key-value store.
 *
 * One connection per store, shared behind a mutex; every statement runs on
 * tokio's blocking pool.
 */

use async_trait::async_trait;
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::schema;
use super::KeyValueStore;
use crate::errors::StoreError;

/// Directory under the user's data directory holding the glossary database
const DATA_DIRNAME: &str = "translai";

/// Glossary database filename
const DB_FILENAME: &str = "translai.db";

/// Key-value store persisted in a SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    /// Location of the database, `:memory:` for in-memory stores
    path: PathBuf,
    /// Shared connection with the `kv` table initialized
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store at the default location
    pub fn new_default() -> Result<Self, StoreError> {
        Self::open(Self::default_path()?)
    }

    /// Open (or create) a store at the given path, creating parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Backend(format!("Failed to create directory {:?}: {}", parent, e))
            })?;
        }

        info!("Opening glossary database at {:?}", path);
        let conn = Connection::open(&path)?;
        Self::with_schema(path, conn)
    }

    /// Create a store with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, StoreError> {
        debug!("Creating in-memory glossary database");
        Self::with_schema(PathBuf::from(":memory:"), Connection::open_in_memory()?)
    }

    /// Database location used when the config names none
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| StoreError::Backend("Could not determine data directory".to_string()))?;

        Ok(base_dir.join(DATA_DIRNAME).join(DB_FILENAME))
    }

    /// Database location
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_schema(path: PathBuf, conn: Connection) -> Result<Self, StoreError> {
        schema::initialize_schema(&conn).map_err(backend)?;
        Ok(Self {
            path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool
    async fn run<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = self.connection.clone();
        tokio::task::spawn_blocking(move || f(&connection.lock()))
            .await
            .map_err(|e| StoreError::Backend(format!("Database task failed: {}", e)))?
            .map_err(StoreError::from)
    }

    /// List stored keys starting with `prefix`
    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let pattern = format!("{}%", prefix.replace('%', "\\%").replace('_', "\\_"));

        self.run(move |conn| {
            let mut stmt =
                conn.prepare("SELECT key FROM kv WHERE key LIKE ?1 ESCAPE '\\' ORDER BY key")?;
            let keys = stmt
                .query_map([pattern], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(keys)
        })
        .await
    }
}

fn backend(error: anyhow::Error) -> StoreError {
    StoreError::Backend(format!("{:#}", error))
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let key = key.to_string();

        self.run(move |conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
                .optional()
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        debug!("Persisting {} bytes under '{}'", value.len(), key);
        let key = key.to_string();
        let value = value.to_string();

        self.run(move |conn| {
            conn.execute(
                r#"
                INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
                params![key, value],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let key = key.to_string();

        self.run(move |conn| {
            conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
            Ok(())
        })
        .await
    }
}
