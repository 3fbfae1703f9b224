//! SQLite-backed date store.
//!
//! Provides persistent storage for:
//! - Logged event dates (ISO `yyyy-mm-dd` text)
//! - A revision counter used to detect concurrent writers

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::Cell;
use std::path::Path;
use tracing::{debug, info};

use super::migrations::{self, REVISION_KEY};
use super::{data_dir, DateStore};
use crate::error::StoreError;

const ISO_FORMAT: &str = "%Y-%m-%d";

/// SQLite database holding the date history.
pub struct SqliteStore {
    conn: Connection,
    loaded_revision: Cell<Option<i64>>,
}

impl SqliteStore {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/cycletrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("cycletrack.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        debug!(path = %path.display(), "opening date store");
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::migrate(&conn)?;
        Ok(Self {
            conn,
            loaded_revision: Cell::new(None),
        })
    }

    /// Number of completed saves.
    ///
    /// # Errors
    /// Returns an error if the counter cannot be read.
    pub fn revision(&self) -> Result<i64, StoreError> {
        read_revision(&self.conn)
    }
}

fn kv_get(conn: &Connection, key: &str) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
        row.get::<_, String>(0)
    })
    .optional()
}

fn kv_set(conn: &Connection, key: &str, value: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

fn read_revision(conn: &Connection) -> Result<i64, StoreError> {
    match kv_get(conn, REVISION_KEY)? {
        None => Ok(0),
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| StoreError::Corrupt { value }),
    }
}

impl DateStore for SqliteStore {
    fn load_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let revision = read_revision(&tx)?;

        let mut stmt = tx.prepare("SELECT date FROM events ORDER BY date ASC, id ASC")?;
        let raw = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;
        drop(stmt);
        tx.commit()?;

        let dates = raw
            .into_iter()
            .map(|value| {
                NaiveDate::parse_from_str(&value, ISO_FORMAT)
                    .map_err(|_| StoreError::Corrupt { value })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.loaded_revision.set(Some(revision));
        debug!(count = dates.len(), revision, "loaded dates");
        Ok(dates)
    }

    fn save_dates(&self, dates: &[NaiveDate]) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let current = read_revision(&tx)?;
        if let Some(expected) = self.loaded_revision.get() {
            if expected != current {
                return Err(StoreError::Conflict {
                    expected,
                    found: current,
                });
            }
        }

        tx.execute("DELETE FROM events", [])?;
        {
            let mut insert = tx.prepare("INSERT INTO events (date) VALUES (?1)")?;
            for date in dates {
                insert.execute(params![date.format(ISO_FORMAT).to_string()])?;
            }
        }
        let next = current + 1;
        kv_set(&tx, REVISION_KEY, &next.to_string())?;
        tx.commit()?;

        self.loaded_revision.set(Some(next));
        info!(count = dates.len(), revision = next, "saved dates");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn save_and_load() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.load_dates().unwrap().is_empty());

        store
            .save_dates(&[date(2024, 2, 1), date(2024, 1, 1)])
            .unwrap();
        assert_eq!(
            store.load_dates().unwrap(),
            vec![date(2024, 1, 1), date(2024, 2, 1)]
        );
        assert_eq!(store.revision().unwrap(), 1);
    }

    #[test]
    fn duplicates_are_kept() {
        let store = SqliteStore::open_memory().unwrap();
        let d = date(2024, 1, 1);
        store.save_dates(&[d, d]).unwrap();
        assert_eq!(store.load_dates().unwrap(), vec![d, d]);
    }

    #[test]
    fn concurrent_writer_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cycletrack.db");
        let first = SqliteStore::open_at(&path).unwrap();
        let second = SqliteStore::open_at(&path).unwrap();

        first.load_dates().unwrap();
        second.load_dates().unwrap();
        second.save_dates(&[date(2024, 1, 1)]).unwrap();

        let err = first.save_dates(&[date(2024, 2, 1)]).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { expected: 0, found: 1 }));

        // Reloading picks up the other write and allows saving again.
        assert_eq!(first.load_dates().unwrap(), vec![date(2024, 1, 1)]);
        first
            .save_dates(&[date(2024, 1, 1), date(2024, 2, 1)])
            .unwrap();
        assert_eq!(first.revision().unwrap(), 2);
    }

    #[test]
    fn corrupt_row_is_reported() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .conn()
            .execute("INSERT INTO events (date) VALUES ('yesterday')", [])
            .unwrap();
        let err = store.load_dates().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn corrupt_revision_is_reported() {
        let store = SqliteStore::open_memory().unwrap();
        kv_set(store.conn(), REVISION_KEY, "many").unwrap();
        let err = store.load_dates().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref value } if value == "many"));
    }

    #[test]
    fn revision_counts_saves() {
        let store = SqliteStore::open_memory().unwrap();
        assert_eq!(kv_get(store.conn(), REVISION_KEY).unwrap().as_deref(), Some("0"));
        store.save_dates(&[date(2024, 1, 1)]).unwrap();
        store.save_dates(&[]).unwrap();
        assert_eq!(kv_get(store.conn(), REVISION_KEY).unwrap().as_deref(), Some("2"));
        assert_eq!(store.revision().unwrap(), 2);
    }
}
