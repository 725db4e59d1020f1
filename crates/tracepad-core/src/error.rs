//! Error handling for Tracepad
//!
//! Provides error types for the drawing core:
//! - Surface errors (pixel buffer allocation, snapshot encode/restore)
//! - Asset errors (decoding external images and snapshot blobs)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Raster surface error type
///
/// Represents failures while allocating, encoding or restoring a pixel buffer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// Requested surface dimensions cannot be allocated
    #[error("Invalid surface dimensions {width}x{height} at scale {scale}")]
    InvalidDimensions {
        /// Logical width.
        width: f64,
        /// Logical height.
        height: f64,
        /// Device pixel ratio.
        scale: f64,
    },

    /// Encoding the surface into a snapshot blob failed
    #[error("Failed to encode surface: {reason}")]
    Encode {
        /// The encoder message.
        reason: String,
    },

    /// A restored pixel buffer does not match the surface size
    #[error("Snapshot is {actual_width}x{actual_height} px, surface is {expected_width}x{expected_height} px")]
    SizeMismatch {
        /// Surface pixel width.
        expected_width: u32,
        /// Surface pixel height.
        expected_height: u32,
        /// Snapshot pixel width.
        actual_width: u32,
        /// Snapshot pixel height.
        actual_height: u32,
    },
}

/// Asset error type
///
/// Represents failures while decoding image blobs, either external images
/// loaded by the host or history snapshots being restored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    /// The blob could not be decoded as an image
    #[error("Failed to decode image: {reason}")]
    Decode {
        /// The decoder message.
        reason: String,
    },

    /// The image decoded to zero pixels
    #[error("Image has no pixels ({width}x{height})")]
    Empty {
        /// Decoded width.
        width: u32,
        /// Decoded height.
        height: u32,
    },
}

/// Main error type for Tracepad
#[derive(Error, Debug)]
pub enum Error {
    /// Surface error
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Asset error
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an asset decode error
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Error::Asset(AssetError::Decode { .. }))
    }

    /// Check if this is a surface error
    pub fn is_surface_error(&self) -> bool {
        matches!(self, Error::Surface(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
