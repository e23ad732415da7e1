//! Connection handling and the destructive schema reset.
//!
//! A [`Session`] owns exactly one SQLite connection and is threaded
//! explicitly into every loader, write and query call; there is no
//! process-wide connection. Foreign-key enforcement is switched on at open
//! and stays on except inside [`Session::reset_schema`] and the bulk loader,
//! both of which restore it on every exit path.

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, instrument};

use crate::error::DbError;
use crate::schema::{EntityDef, ENTITIES};

/// A single-client session against the lab-usage database.
pub struct Session {
    pub(crate) conn: Connection,
}

impl Session {
    /// Opens (or creates) the database file at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        debug!("session opened");
        Ok(Self { conn })
    }

    /// Opens an in-memory database (used by tests).
    pub fn open_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Toggles foreign-key enforcement for this connection.
    ///
    /// SQLite silently ignores this pragma while a transaction is open, so
    /// callers must toggle it between transactions, never inside one.
    pub(crate) fn set_foreign_keys(&self, on: bool) -> Result<(), DbError> {
        self.conn.pragma_update(None, "foreign_keys", on)?;
        Ok(())
    }

    /// Drops and recreates every table. Destructive and idempotent.
    ///
    /// Drops run in reverse dependency order with foreign-key enforcement
    /// suspended; enforcement is restored before any error is surfaced, so
    /// a failed reset never leaves the connection with checks off. Creates
    /// run in forward dependency order with `IF NOT EXISTS` semantics.
    #[instrument(skip_all)]
    pub fn reset_schema(&mut self) -> Result<(), DbError> {
        self.set_foreign_keys(false)?;
        let dropped = self.drop_all_tables();
        let restored = self.set_foreign_keys(true);
        dropped?;
        restored?;
        self.create_all_tables()
    }

    fn drop_all_tables(&mut self) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        for entity in ENTITIES.iter().rev() {
            tx.execute_batch(&entity.drop_sql())?;
        }
        tx.commit()?;
        debug!("dropped {} tables", ENTITIES.len());
        Ok(())
    }

    fn create_all_tables(&mut self) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        for entity in &ENTITIES {
            tx.execute_batch(&entity.create_sql())?;
        }
        tx.commit()?;
        debug!("created {} tables", ENTITIES.len());
        Ok(())
    }

    /// Number of rows currently in `entity`'s table.
    pub fn table_count(&self, entity: &EntityDef) -> Result<u64, DbError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", entity.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
