//! Error types for slide reconstruction.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconstructing or writing a slide.
///
/// Element-level defects (bad colors, missing optional fields, degenerate
/// regions) are recovered in place and never show up here.
#[derive(Error, Debug)]
pub enum Error {
    /// Source image width or height is zero, negative or not finite.
    #[error("Invalid source dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    /// The detection service failed to return text elements.
    #[error("Detection failed: {0}")]
    Detection(String),

    /// The background-cleaning call failed.
    #[error("Background cleaning failed: {0}")]
    Background(String),

    /// Caller-supplied input could not be used.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failed to read or decode an image.
    #[error("Image error: {0}")]
    Image(String),

    /// Failed to open or read a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Detection payload or configuration is not valid JSON.
    #[error("JSON error: {0}")]
    Json(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing or parsing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),

    /// The batch worker pool could not be started.
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}
