//! Error taxonomy for storage, catalog, and export operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type HyugaResult<T> = Result<T, HyugaError>;

#[derive(Debug, Error)]
pub enum HyugaError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// models.json exists but is not a valid catalog.
    #[error("corrupt model catalog at {path}: {message}")]
    CorruptCatalog { path: PathBuf, message: String },

    /// project.json exists but is not a valid project document.
    #[error("corrupt project document at {path}: {message}")]
    CorruptDocument { path: PathBuf, message: String },

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid image payload: {0}")]
    Payload(#[from] base64::DecodeError),

    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("document write error: {0}")]
    Document(#[from] lopdf::Error),
}
