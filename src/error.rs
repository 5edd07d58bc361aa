//! Error types for the frame viewer

use thiserror::Error;

/// Result type alias for viewer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or running a viewer
///
/// None of these escape `FrameViewer` construction or its periodic cycle;
/// they are logged and the viewer degrades (see `viewer`).
#[derive(Error, Debug)]
pub enum Error {
    /// The display surface, its 2D context, or a required output field is missing
    #[error("Acquisition failed: {0}")]
    AcquisitionFailure(String),

    /// A frame payload could not be decoded into an image
    #[error("Failed to decode frame image: {0}")]
    DecodeFailure(String),

    /// The synthesized raster could not be encoded
    #[error("Failed to encode frame image: {0}")]
    EncodeError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::DecodeFailure(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::DecodeFailure(err.to_string())
    }
}
