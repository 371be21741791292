// src/db/connection.rs
//! Opening and initialising SQLite with runtime parameters.

use std::path::{Path, PathBuf};
use rusqlite::Connection;
use crate::config::DatabaseConfig;

pub fn db_path(base_dir: &Path, cfg: &DatabaseConfig) -> PathBuf {
    base_dir.join(&cfg.path)
}

pub fn open_db_connection(path: &Path, cfg: &DatabaseConfig) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(cfg.busy_timeout)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", cfg.synchronous.as_str())?;
    Ok(conn)
}

/// Open the reading store and make sure the `weather` table exists.
pub fn init_database(base_dir: &Path, cfg: &DatabaseConfig) -> rusqlite::Result<Connection> {
    let path = db_path(base_dir, cfg);
    let conn = open_db_connection(&path, cfg)?;
    apply_schema(&conn)?;
    log::info!("Database ready at {}", path.display());
    Ok(conn)
}

/// Idempotent; the schema only uses `CREATE TABLE IF NOT EXISTS`.
pub fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(include_str!("../../resources/schema.sql"))
}
