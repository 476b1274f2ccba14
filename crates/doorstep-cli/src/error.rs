use std::io;

use thiserror::Error;

use doorstep_core::config::ConfigError;
use doorstep_core::ApiError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Could not determine a config directory for session storage")]
    NoStorageDir,
}
