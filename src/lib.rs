// src/lib.rs
// ────────────────────────────────────────────────────────────────────────────
// Public library entry point.  Re-export everything for both binaries and
// integration tests.

mod macros;

pub mod comms;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod serial_link;
pub mod view;

pub use context::RelayContext;
pub use error::RelayError;
