use thiserror::Error;

use crate::config::ConfigError;
use crate::ident::DeskId;

/// Problems reading one of the input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed desk table: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed requests: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parameters: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("desk {desk} has office {office:?}, expected a numeric room number")]
    NonNumericOffice { desk: DeskId, office: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
