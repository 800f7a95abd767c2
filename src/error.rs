// src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The source cannot describe its samples well enough to size the render.
    #[error("invalid sample format: {0}")]
    InvalidFormat(String),

    /// Pulling samples failed part way through a render.
    #[error("failed to read samples: {0}")]
    SourceRead(#[from] symphonia::core::errors::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid render settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
