// src/bin/cred_relay.rs

//! Wi-Fi credential relay: terminal form → Bluetooth serial → board.
//!
//! Shares nothing with the weather relay except the config file format.

use std::{io, path::PathBuf};

use anyhow::Context;
use log::Level;

use relay::{config, fatal, logging::setup_logging, relay_log, serial_link::CredentialLink};

fn run() -> anyhow::Result<()> {
    let cfg_path = config::config_path();
    let cfg = config::load(&cfg_path)
        .with_context(|| format!("loading {}", cfg_path.display()))?;

    let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    setup_logging(&work_dir, &cfg.logging, "cred_relay.log").context("logging setup")?;

    let mut link = CredentialLink::open(&cfg.serial)
        .context("Failed to establish Bluetooth connection")?;

    let sent = link
        .run_form(io::stdin().lock(), io::stdout())
        .context("credential form")?;
    relay_log!(Level::Info, "serial", "Form closed after {} submission(s)", sent);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        fatal!("cred-relay", "{:#}", e);
    }
}
