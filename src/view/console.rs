// src/view/console.rs

//! Terminal front-end.
//!
//! `ConsoleTable` redraws the whole reading table on every update.
//! `run_console` is the view's event loop: it reads commands from stdin on the
//! main thread until the user quits or input ends.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use log::Level;
use prettytable::{format, Cell, Row, Table};

use crate::context::RelayContext;
use crate::error::RelayError;
use crate::pipeline::Reading;
use crate::relay_log;
use crate::view::{clear_database, refresh, TableView};

const HEADERS: [&str; 3] = ["Date", "City", "Temperature"];

/// Writes the table to any sink; stdout by default.
pub struct ConsoleTable {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleTable {
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out: Mutex::new(out) }
    }
}

impl TableView for ConsoleTable {
    fn update_table(&self, rows: &[Reading]) {
        let table = render_table(rows);
        match self.out.lock() {
            Ok(mut out) => {
                if let Err(e) = out.write_all(table.as_bytes()).and_then(|_| out.flush()) {
                    relay_log!(Level::Warn, "view", "Table redraw failed: {}", e);
                }
            }
            Err(_) => relay_log!(Level::Error, "view", "Console lock poisoned"),
        }
    }
}

/// Bordered text table, header first, rows in storage order.
pub fn render_table(rows: &[Reading]) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(HEADERS.iter().map(|h| Cell::new(h)).collect()));
    for r in rows {
        table.add_row(Row::new(vec![
            Cell::new(&r.date),
            Cell::new(&r.city),
            Cell::new(&r.temperature),
        ]));
    }
    table.to_string()
}

/// Drive the view from `input` until `quit`/`exit` or end of input.
///
/// Commands: `clear` wipes the store, `refresh` redraws, `help` lists them.
pub fn run_console<R: BufRead>(ctx: &RelayContext, input: R) -> Result<(), RelayError> {
    relay_log!(Level::Info, "view", "Console ready (commands: clear, refresh, quit)");
    for line in input.lines() {
        match line?.trim().to_lowercase().as_str() {
            "" => {}
            "clear" => {
                if let Err(e) = clear_database(ctx) {
                    relay_log!(Level::Error, "view", "Clear failed: {}", e);
                }
            }
            "refresh" => {
                if let Err(e) = refresh(ctx) {
                    relay_log!(Level::Error, "view", "Refresh failed: {}", e);
                }
            }
            "quit" | "exit" => break,
            "help" => println!("commands: clear, refresh, quit"),
            other => relay_log!(Level::Warn, "view", "Unknown command {:?}", other),
        }
    }
    relay_log!(Level::Info, "view", "View closed");
    Ok(())
}
