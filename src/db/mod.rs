// src/db/mod.rs
//! Public façade for DB helpers.

pub mod connection;
pub mod store;

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use crate::config::DatabaseConfig;
pub use store::{ReadingStore, StoreError};

/// Store handle shared by the consumer thread and the clear control.
pub type SharedStore = Arc<Mutex<ReadingStore>>;

/// Open the on-disk store under `base_dir` and wrap it for sharing.
pub fn open_shared_store(base_dir: &Path, cfg: &DatabaseConfig) -> Result<SharedStore, StoreError> {
    let conn = connection::init_database(base_dir, cfg)?;
    Ok(Arc::new(Mutex::new(ReadingStore::new(conn))))
}
