use thiserror::Error;

use crate::zone::ZoneError;

/// Unified error type for the bifrost converter
#[derive(Debug, Error)]
pub enum BifrostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Zone(#[from] ZoneError),

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("failed to render document: {0}")]
    Render(#[from] serde_yaml::Error),
}

// Result type alias
pub type Result<T> = std::result::Result<T, BifrostError>;
