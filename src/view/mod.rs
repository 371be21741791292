//! View boundary.
//!
//! The relay pushes the complete row set into a `TableView` whenever the
//! table changes, and exposes `clear_database` as the view's only control.
//! Every refresh is a full re-read; there is no diffing.

pub mod console;
pub mod memory;

use log::Level;
use metrics::counter;

use crate::context::RelayContext;
use crate::error::RelayError;
use crate::pipeline::Reading;
use crate::relay_log;

pub use console::{render_table, run_console, ConsoleTable};
pub use memory::MemoryView;

/// Anything that can display the reading history.
pub trait TableView: Send + Sync {
    /// Replace the displayed rows with `rows`, in the given order.
    fn update_table(&self, rows: &[Reading]);
}

/// Re-read every row and push it to the view. Returns the row count.
pub fn refresh(ctx: &RelayContext) -> Result<usize, RelayError> {
    let rows = ctx.with_store(|store| store.all())?;
    ctx.view.update_table(&rows);
    Ok(rows.len())
}

/// Delete every stored reading, then refresh the view.
pub fn clear_database(ctx: &RelayContext) -> Result<usize, RelayError> {
    let removed = ctx.with_store(|store| store.clear())?;
    counter!("relay_store_clears_total").increment(1);
    relay_log!(Level::Info, "view", "Cleared {} reading(s)", removed);
    refresh(ctx)?;
    Ok(removed)
}
