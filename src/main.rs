// src/main.rs

//! Weather relay entry-point.
//!
//! 1. Load configuration & set up structured logging
//! 2. Open the reading store and draw the initial table
//! 3. Start the persistence consumer and the MQTT subscriber threads
//! 4. Run the console view on the main thread; closing it ends the process
//!

// ───── std / 3rd-party imports ──────────────────────────────────────────────
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::Level;

// ───── local imports ────────────────────────────────────────────────────────
use relay::{
    comms::{Intake, Subscriber},
    config::{self, Config},
    db,
    fatal,
    logging::setup_logging,
    pipeline::{handoff, Consumer},
    relay_log,
    view::{self, ConsoleTable},
    RelayContext,
};

// ───── helpers ──────────────────────────────────────────────────────────────

fn load_cfg(path: &Path) -> Config {
    config::load(path).unwrap_or_else(|e| fatal!("config", "{}", e))
}

// ───── relay ────────────────────────────────────────────────────────────────

fn main() {
    // 1 ─ Context
    let cfg = load_cfg(&config::config_path());
    let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // 2 ─ Logging
    if let Err(e) = setup_logging(&work_dir, &cfg.logging, "relay.log") {
        fatal!("logging", "{}", e);
    }
    relay_log!(Level::Info, "main", "Relay bootstrap initiated");

    // 3 ─ Store + initial draw
    let store = db::open_shared_store(&work_dir, &cfg.database)
        .unwrap_or_else(|e| fatal!("database", "{}", e));
    let ctx = RelayContext::from_shared(store, Arc::new(ConsoleTable::stdout()));
    match view::refresh(&ctx) {
        Ok(n) => relay_log!(Level::Info, "main", "Loaded {} stored reading(s)", n),
        Err(e) => fatal!("database", "{}", e),
    }

    // 4 ─ Pipeline threads
    let (producer, queue) = handoff(&cfg.queue);
    Consumer::new(queue, ctx.clone())
        .spawn()
        .unwrap_or_else(|e| fatal!("consumer", "{}", e));
    // Runtime creation failures surface here, before the thread starts.
    Subscriber::new(&cfg.broker)
        .spawn(Intake::new(producer))
        .unwrap_or_else(|e| fatal!("mqtt", "{}", e));
    relay_log!(
        Level::Info,
        "main",
        "Relaying {}:{} topic {}",
        cfg.broker.host,
        cfg.broker.port,
        cfg.broker.topic
    );

    // 5 ─ View loop; returning from main ends both background threads
    if let Err(e) = view::run_console(&ctx, io::stdin().lock()) {
        relay_log!(Level::Error, "main", "Console failed: {}", e);
    }
    relay_log!(Level::Info, "main", "Relay stopped");
}
