use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::fsio;
use crate::paths;

use super::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to render config: {source}")]
    Serialize {
        #[source]
        source: toml::ser::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn config_path() -> PathBuf {
    paths::config_dir().join("config.toml")
}

pub fn load() -> Result<Config, ConfigError> {
    let mut config = load_file(&config_path())?.unwrap_or_default();
    apply_env_overrides(&mut config);
    Ok(config)
}

fn load_file(path: &Path) -> Result<Option<Config>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Load the config, degrading to defaults on failure; writes the default
/// config on first run so users have a file to edit.
pub fn load_or_init() -> Config {
    let path = config_path();
    let had_config = path.exists();

    let config = match load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("config load failed, using defaults: {err}");
            let mut config = Config::default();
            apply_env_overrides(&mut config);
            config
        }
    };

    if !had_config
        && let Err(err) = write_config(&path, &Config::default())
    {
        tracing::warn!("failed to write default config: {err}");
    }

    config
}

pub fn apply_env_overrides(config: &mut Config) {
    apply_env_overrides_inner(
        config,
        env_path("TP_DATA_DIR"),
        env_path("TP_LEGACY_FILE"),
        std::env::var("TP_LOG").ok(),
    );
}

fn apply_env_overrides_inner(
    config: &mut Config,
    data_dir: Option<PathBuf>,
    legacy_file: Option<PathBuf>,
    filter: Option<String>,
) {
    if let Some(dir) = data_dir {
        config.store.data_dir = Some(dir);
    }
    if let Some(file) = legacy_file {
        config.store.legacy_file = Some(file);
    }
    if let Some(filter) = filter.filter(|f| !f.trim().is_empty()) {
        config.logging.filter = Some(filter);
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn write_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|source| ConfigError::Serialize { source })?;
    fsio::atomic_write(path, contents.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
