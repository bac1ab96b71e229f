use thiserror::Error;

use crate::config::ConfigError;
use crate::core::TaskLoadError;
use crate::migrate::MigrateError;
use crate::store::StoreError;

/// Crate-level convenience error.
///
/// A thin wrapper over the module errors; callers that care match on the
/// source kind.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Migrate(#[from] MigrateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    TaskLoad(#[from] TaskLoadError),

    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}
