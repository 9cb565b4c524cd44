use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecommenderError>;

#[derive(Debug, Error)]
pub enum RecommenderError {
    /// The catalog or a required model artifact could not be loaded at startup.
    #[error("required data unavailable at {path:?}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    #[error("invalid food catalog: {0}")]
    InvalidCatalog(String),

    #[error("duplicate food_id '{0}' in catalog")]
    DuplicateFoodId(String),

    #[error("invalid model artifact '{name}': {reason}")]
    InvalidArtifact { name: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("similarity cache error: {0}")]
    SimilarityCache(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RecommenderError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
