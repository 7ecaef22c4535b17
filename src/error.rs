use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TriageError>;

#[derive(Debug, Error)]
pub enum TriageError {
    /// The vision service could not produce a detection result for an image
    #[error("vision service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Crop geometry with no area
    #[error("degenerate pixel rectangle for {key}: {width}x{height}")]
    PixelRectangleInvalid { key: String, width: i64, height: i64 },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TriageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TriageError::Io { path: path.into(), source }
    }
}
