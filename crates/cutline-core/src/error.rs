//! Error types for Cutline.

use thiserror::Error;

/// Main error type for Cutline operations.
#[derive(Error, Debug)]
pub enum CutlineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for Cutline operations.
pub type Result<T> = std::result::Result<T, CutlineError>;
