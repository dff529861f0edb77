use std::path::PathBuf;

use element_match::error::DocumentError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid invocation: {0}")]
    Invocation(String),

    #[error("input HTML {} provided without '{id}' element", .file.display())]
    CriteriaNotFound { id: String, file: PathBuf },

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
