//! Configuration: schema, loading, and env overrides.

mod load;
mod schema;

pub use load::{ConfigError, apply_env_overrides, config_path, load, load_or_init, write_config};
pub use schema::{Config, FileLoggingConfig, LogFormat, LogRotation, LoggingConfig, StoreConfig};
