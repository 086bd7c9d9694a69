use thiserror::Error;

use crate::config::ConfigError;
use crate::requests::RequestError;

/// Fatal errors that abort a planning run before any output is produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid request: {0}")]
    Request(#[from] RequestError),

    #[error("cannot start worker pool: {0}")]
    ThreadPool(String),
}
