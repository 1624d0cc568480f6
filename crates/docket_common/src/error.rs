//! Error types for Docket.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocketError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Summary error: {0}")]
    Summary(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocketError {
    /// HTTP status the serving layer should map this error to.
    pub fn http_status(&self) -> u16 {
        match self {
            DocketError::Validation(_) => 400,
            DocketError::NotFound(_) => 404,
            DocketError::Classification(_) => 502,
            DocketError::Summary(_) => 502,
            DocketError::Storage(_) => 500,
            DocketError::Io(_) => 500,
            DocketError::Json(_) => 500,
            DocketError::Internal(_) => 500,
        }
    }
}

impl From<anyhow::Error> for DocketError {
    fn from(e: anyhow::Error) -> Self {
        DocketError::Internal(e.to_string())
    }
}
