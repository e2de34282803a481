//! Storage layer for convoylog.
//!
//! This module persists obstacle records in `SQLite`, laid out the way the
//! in-cab devices expect: a key-value table where the whole collection lives
//! as one JSON array under a fixed key. Records travel as a unit; every
//! mutation is a read-modify-write of the full collection.

pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::obstacle::{NewObstacle, Obstacle};

/// Fixed key of the persisted obstacle collection.
pub const OBSTACLES_KEY: &str = "obstacles";

/// Persistent store for obstacle records.
///
/// Mutations are read-modify-write cycles over the whole collection with no
/// internal locking. Callers must not overlap `add`/`remove`/`clear` across
/// connections; one mutation per process invocation satisfies that.
#[derive(Debug)]
pub struct ObstacleStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl ObstacleStore {
    /// Open or create a store database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL keeps concurrent readers cheap
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        schema::initialize_schema(&conn)?;

        info!("Database ready at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All obstacles in insertion order.
    ///
    /// A failed or unreadable collection logs a warning and comes back as an
    /// empty list; use [`ObstacleStore::try_list`] to observe the failure.
    #[must_use]
    pub fn list(&self) -> Vec<Obstacle> {
        match self.try_list() {
            Ok(items) => items,
            Err(error) => {
                warn!("Treating unreadable obstacle collection as empty: {error}");
                Vec::new()
            }
        }
    }

    /// All obstacles in insertion order, surfacing read failures.
    ///
    /// A missing collection is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or holds invalid
    /// JSON.
    pub fn try_list(&self) -> Result<Vec<Obstacle>> {
        match self.read_value(OBSTACLES_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|error| Error::store_read(OBSTACLES_KEY, format!("invalid JSON: {error}"))),
            None => Ok(Vec::new()),
        }
    }

    /// Append a new record to the collection.
    ///
    /// The store assigns the identifier and creation timestamp and returns
    /// the full record as persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing collection cannot be read (the
    /// collection is left untouched in that case) or the updated one cannot
    /// be written.
    pub fn add(&self, new: NewObstacle) -> Result<Obstacle> {
        let mut items = self.try_list()?;
        let obstacle = Obstacle {
            id: next_id(&items),
            title: new.title,
            description: new.description,
            coordinates: new.coordinates,
            created_at: Utc::now(),
        };
        items.push(obstacle.clone());
        self.persist(&items)?;
        debug!("Recorded obstacle {}", obstacle.id);
        Ok(obstacle)
    }

    /// Remove the record with the given id.
    ///
    /// Removing an id that is not present succeeds and leaves the other
    /// records unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn remove(&self, id: &str) -> Result<()> {
        let mut items = self.try_list()?;
        let before = items.len();
        items.retain(|obstacle| obstacle.id != id);
        if items.len() < before {
            debug!("Removing obstacle {id}");
        } else {
            debug!("No obstacle with id {id}, nothing to remove");
        }
        self.persist(&items)
    }

    /// Delete the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear(&self) -> Result<()> {
        self.delete_value(OBSTACLES_KEY)?;
        info!("Cleared obstacle collection");
        Ok(())
    }

    /// Number of records in the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn count(&self) -> Result<usize> {
        Ok(self.try_list()?.len())
    }

    /// Get store statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn stats(&self) -> Result<StoreStats> {
        let items = self.try_list()?;
        let oldest_record = items.iter().map(|o| o.created_at).min();
        let newest_record = items.iter().map(|o| o.created_at).max();

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StoreStats {
            total_obstacles: items.len(),
            oldest_record,
            newest_record,
            db_size_bytes,
        })
    }

    fn persist(&self, items: &[Obstacle]) -> Result<()> {
        let json = serde_json::to_string(items)
            .map_err(|error| Error::store_write(OBSTACLES_KEY, error.to_string()))?;
        self.write_value(OBSTACLES_KEY, &json)
    }

    fn read_value(&self, key: &'static str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM entries WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|error| Error::store_read(key, error.to_string()))
    }

    fn write_value(&self, key: &'static str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r"
                INSERT INTO entries (key, value, updated_at) VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                ",
                (key, value, Utc::now().to_rfc3339()),
            )
            .map_err(|error| Error::store_write(key, error.to_string()))?;
        Ok(())
    }

    fn delete_value(&self, key: &'static str) -> Result<()> {
        self.conn
            .execute("DELETE FROM entries WHERE key = ?1", [key])
            .map_err(|error| Error::store_write(key, error.to_string()))?;
        Ok(())
    }
}

/// Allocate a record id from the clock.
///
/// Epoch milliseconds as text, bumped past the largest numeric id already
/// present so same-millisecond adds and clock steps backwards stay unique.
fn next_id(existing: &[Obstacle]) -> String {
    let now_ms = Utc::now().timestamp_millis();
    let max_existing = existing
        .iter()
        .filter_map(|obstacle| obstacle.id.parse::<i64>().ok())
        .max()
        .unwrap_or(0);
    now_ms.max(max_existing.saturating_add(1)).to_string()
}

/// Statistics about the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of obstacle records.
    pub total_obstacles: usize,
    /// Creation time of the oldest record.
    pub oldest_record: Option<DateTime<Utc>>,
    /// Creation time of the newest record.
    pub newest_record: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
