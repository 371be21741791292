// src/view/memory.rs

use std::sync::Mutex;

use crate::pipeline::Reading;
use crate::view::TableView;

/// Keeps the last row set it was given. Handy for headless runs and tests.
#[derive(Default)]
pub struct MemoryView {
    rows:    Mutex<Vec<Reading>>,
    updates: Mutex<usize>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<Reading> {
        self.rows.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// How many times `update_table` has been called.
    pub fn updates(&self) -> usize {
        self.updates.lock().map(|n| *n).unwrap_or_default()
    }
}

impl TableView for MemoryView {
    fn update_table(&self, rows: &[Reading]) {
        if let Ok(mut current) = self.rows.lock() {
            *current = rows.to_vec();
        }
        if let Ok(mut n) = self.updates.lock() {
            *n += 1;
        }
    }
}
