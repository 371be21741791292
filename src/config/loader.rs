// src/config/loader.rs

//! # Configuration Loader
//!
//! Reads `default.toml`, deserializes it into `RawConfig`, and converts the
//! raw sections into the runtime `Config`. A missing file is not an error:
//! the relay falls back to its built-in endpoints.

use crate::relay_log;
use crate::config::model::{
    BrokerConfig, Config, ConfigError, DatabaseConfig, OverflowPolicy, QueueConfig, RawBroker,
    RawConfig, RawDatabase, RawQueue, RawSerial, SerialConfig,
};
use log::Level;
use std::{
    ffi::OsString,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

/// File looked up next to the executable when no path is given.
pub const DEFAULT_FILE: &str = "default.toml";

/// Directory that contains the running executable.
fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Config path for both binaries: the first CLI argument, or
/// `default.toml` next to the executable.
pub fn config_path() -> PathBuf {
    resolve_path(std::env::args_os().nth(1))
}

fn resolve_path(arg: Option<OsString>) -> PathBuf {
    arg.map(PathBuf::from).unwrap_or_else(|| exe_dir().join(DEFAULT_FILE))
}

/// Load and parse the configuration from `path`.
/// Logs at DEBUG before reading and INFO on success.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    relay_log!(Level::Debug, "config", "Reading config from {:?}", path);
    let txt = match fs::read_to_string(path) {
        Ok(txt) => txt,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            relay_log!(Level::Info, "config", "{:?} not found, using defaults", path);
            return Ok(Config::default());
        }
        Err(e) => return Err(e.into()),
    };
    let cfg = parse(&txt)?;
    relay_log!(Level::Info, "config", "Loaded config from {:?}", path);
    Ok(cfg)
}

/// Parse a TOML document into a runtime `Config`.
pub fn parse(txt: &str) -> Result<Config, ConfigError> {
    let raw: RawConfig = toml::from_str(txt)?;
    Ok(Config {
        logging:  raw.logging,
        broker:   convert_broker(raw.broker)?,
        database: convert_database(raw.database)?,
        queue:    convert_queue(raw.queue)?,
        serial:   convert_serial(raw.serial)?,
    })
}

fn duration(raw: Option<String>, fallback: Duration) -> Result<Duration, ConfigError> {
    match raw {
        Some(s) => humantime::parse_duration(&s).map_err(|e| ConfigError::InvalidDuration(s, e)),
        None => Ok(fallback),
    }
}

fn convert_broker(raw: RawBroker) -> Result<BrokerConfig, ConfigError> {
    let d = BrokerConfig::default();
    Ok(BrokerConfig {
        host:            raw.host.unwrap_or(d.host),
        port:            raw.port.unwrap_or(d.port),
        topic:           raw.topic.unwrap_or(d.topic),
        client_id:       raw.client_id.unwrap_or(d.client_id),
        keep_alive:      duration(raw.keep_alive, d.keep_alive)?,
        reconnect_delay: duration(raw.reconnect_delay, d.reconnect_delay)?,
    })
}

fn convert_database(raw: RawDatabase) -> Result<DatabaseConfig, ConfigError> {
    let d = DatabaseConfig::default();
    Ok(DatabaseConfig {
        path:         raw.path.unwrap_or(d.path),
        synchronous:  raw.synchronous.unwrap_or(d.synchronous),
        busy_timeout: duration(raw.busy_timeout, d.busy_timeout)?,
    })
}

fn convert_queue(raw: RawQueue) -> Result<QueueConfig, ConfigError> {
    let d = QueueConfig::default();
    let capacity = raw.capacity.unwrap_or(d.capacity);
    if capacity == 0 {
        return Err(ConfigError::ZeroCapacity);
    }
    let overflow = match raw.overflow {
        Some(s) => s.parse::<OverflowPolicy>()?,
        None => d.overflow,
    };
    relay_log!(Level::Debug, "config", "Queue capacity={} overflow={:?}", capacity, overflow);
    Ok(QueueConfig { capacity, overflow })
}

fn convert_serial(raw: RawSerial) -> Result<SerialConfig, ConfigError> {
    let d = SerialConfig::default();
    Ok(SerialConfig {
        port:      raw.port.unwrap_or(d.port),
        baud_rate: raw.baud_rate.unwrap_or(d.baud_rate),
        warmup:    duration(raw.warmup, d.warmup)?,
    })
}
