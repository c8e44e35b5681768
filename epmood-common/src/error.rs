//! Common error types for epmood

use thiserror::Error;

/// Common result type for epmood operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while preparing a pipeline run
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("{0}")]
    Config(String),
}
