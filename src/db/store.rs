// src/db/store.rs

//! Owned handle over the `weather` table.
//!
//! One `ReadingStore` wraps one connection for the whole process. Every call is
//! its own unit of work; there is no batching.

use rusqlite::{params, Connection};
use thiserror::Error;

use crate::db::connection::apply_schema;
use crate::pipeline::Reading;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

pub struct ReadingStore {
    conn: Connection,
}

impl ReadingStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Private in-memory store, schema applied.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn insert(&self, reading: &Reading) -> Result<(), StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("INSERT INTO weather (date, city, temperature) VALUES (?1, ?2, ?3)")?;
        stmt.execute(params![reading.date, reading.city, reading.temperature])?;
        Ok(())
    }

    /// Every row, in storage order.
    pub fn all(&self) -> Result<Vec<Reading>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT date, city, temperature FROM weather ORDER BY rowid")?;
        let rows = stmt
            .query_map([], |r| {
                Ok(Reading {
                    date:        r.get(0)?,
                    city:        r.get(1)?,
                    temperature: r.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Deletes every row. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, StoreError> {
        Ok(self.conn.execute("DELETE FROM weather", [])?)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self.conn.query_row("SELECT COUNT(*) FROM weather", [], |r| r.get(0))?;
        Ok(n as usize)
    }
}
