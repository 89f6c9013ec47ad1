//! SQLite-backed registry storage slot.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};

use super::{PersistResult, StoragePort};

/// SQLite implementation of [`crate::persist::StoragePort`].
///
/// The entire registry lives in a single row that `write` replaces in place.
pub struct SqliteSlot {
    conn: Connection,
}

impl SqliteSlot {
    /// Opens or creates the slot database at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory slot.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }
}

impl StoragePort for SqliteSlot {
    fn read(&mut self) -> PersistResult<Option<Vec<u8>>> {
        let payload: Option<Vec<u8>> = self
            .conn
            .query_row("SELECT payload FROM registry_slot WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(payload)
    }

    fn write(&mut self, payload: &[u8]) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO registry_slot(id, ts_ms, payload) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET ts_ms = excluded.ts_ms, payload = excluded.payload",
            params![now_ms() as i64, payload],
        )?;
        Ok(())
    }

    fn clear(&mut self) -> PersistResult<()> {
        self.conn
            .execute("DELETE FROM registry_slot WHERE id = 1", [])?;
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
