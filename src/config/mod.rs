//! Public API for configuration

pub mod loader;
pub mod model;

// Re-export the main entrypoints:
pub use loader::{config_path, load, parse, DEFAULT_FILE};
pub use model::{
    BrokerConfig, Config, ConfigError, DatabaseConfig, LoggingConfig, OverflowPolicy, QueueConfig,
    SerialConfig,
};
