// src/config/model.rs

use serde::Deserialize;
use std::{str::FromStr, time::Duration};
use thiserror::Error;

/// Top-level runtime config
#[derive(Debug, Clone)]
pub struct Config {
    pub logging:  LoggingConfig,
    pub broker:   BrokerConfig,
    pub database: DatabaseConfig,
    pub queue:    QueueConfig,
    pub serial:   SerialConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            logging:  LoggingConfig::default(),
            broker:   BrokerConfig::default(),
            database: DatabaseConfig::default(),
            queue:    QueueConfig::default(),
            serial:   SerialConfig::default(),
        }
    }
}

/// Mirror of the `[logging]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enable: bool,
    pub file:   Option<String>,
    pub level:  String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enable: false, file: None, level: "INFO".into() }
    }
}

/// Fully-typed `[broker]` section
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub host:            String,
    pub port:            u16,
    pub topic:           String,
    pub client_id:       String,
    pub keep_alive:      Duration,
    pub reconnect_delay: Duration,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host:            "test.mosquitto.org".into(),
            port:            1883,
            topic:           "ee/ce360/weatherapp".into(),
            client_id:       "weather-relay".into(),
            keep_alive:      Duration::from_secs(60),
            reconnect_delay: Duration::from_secs(5),
        }
    }
}

/// Fully-typed `[database]` section
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path:         String,
    pub synchronous:  String,
    pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path:         "weather_data.db".into(),
            synchronous:  "NORMAL".into(),
            busy_timeout: Duration::from_secs(1),
        }
    }
}

/// What the intake does when the hand-off queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Producer waits for room; stalls the MQTT event loop.
    Block,
    /// Discard the oldest queued record to make room.
    DropOldest,
}

/// Fully-typed `[queue]` section
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub capacity: usize,
    pub overflow: OverflowPolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { capacity: 1024, overflow: OverflowPolicy::DropOldest }
    }
}

/// Fully-typed `[serial]` section (credential relay only)
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port:      String,
    pub baud_rate: usize,
    pub warmup:    Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port:      "/dev/tty.ESP32-BT-EE".into(),
            baud_rate: 115_200,
            warmup:    Duration::from_secs(2),
        }
    }
}

/// Raw TOML document. Durations and enums stay strings until the loader
/// converts them.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub logging:  LoggingConfig,
    pub broker:   RawBroker,
    pub database: RawDatabase,
    pub queue:    RawQueue,
    pub serial:   RawSerial,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawBroker {
    pub host:            Option<String>,
    pub port:            Option<u16>,
    pub topic:           Option<String>,
    pub client_id:       Option<String>,
    pub keep_alive:      Option<String>,
    pub reconnect_delay: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawDatabase {
    pub path:         Option<String>,
    pub synchronous:  Option<String>,
    pub busy_timeout: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawQueue {
    pub capacity: Option<usize>,
    pub overflow: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawSerial {
    pub port:      Option<String>,
    pub baud_rate: Option<usize>,
    pub warmup:    Option<String>,
}

/// All the ways config loading can go wrong
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid overflow policy '{0}'")]
    InvalidOverflow(String),

    #[error("invalid duration '{0}': {1}")]
    InvalidDuration(String, #[source] humantime::DurationError),

    #[error("queue capacity must be at least 1")]
    ZeroCapacity,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Allow `"drop_oldest"` → `OverflowPolicy::DropOldest`
impl FromStr for OverflowPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "block"       => Ok(OverflowPolicy::Block),
            "drop_oldest" => Ok(OverflowPolicy::DropOldest),
            other         => Err(ConfigError::InvalidOverflow(other.into())),
        }
    }
}
