use std::path::PathBuf;
use thiserror::Error;

use crate::category::Category;

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown category '{0}' in dataset")]
    UnknownCategory(String),

    #[error("Dataset is missing category '{0}'")]
    MissingCategory(Category),

    /// The same action name appears in both action tables
    #[error("Action '{0}' is defined in both core_actions and image_effect_actions")]
    DuplicateAction(String),
}
