// src/context.rs

//! Everything the pipeline components share, built once in `main`.

use std::sync::{Arc, Mutex};

use crate::db::{ReadingStore, SharedStore, StoreError};
use crate::view::TableView;

#[derive(Clone)]
pub struct RelayContext {
    pub store: SharedStore,
    pub view:  Arc<dyn TableView>,
}

impl RelayContext {
    pub fn new(store: ReadingStore, view: Arc<dyn TableView>) -> Self {
        Self::from_shared(Arc::new(Mutex::new(store)), view)
    }

    pub fn from_shared(store: SharedStore, view: Arc<dyn TableView>) -> Self {
        Self { store, view }
    }

    /// Run `f` with the store locked. The lock is released before returning.
    pub fn with_store<R>(
        &self,
        f: impl FnOnce(&ReadingStore) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let guard = self.store.lock().map_err(|_| StoreError::Poisoned)?;
        f(&guard)
    }
}
