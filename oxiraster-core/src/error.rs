//! Error types shared by the OxiRaster codecs.

use std::io;
use thiserror::Error;

/// The core error type.
#[derive(Debug, Error)]
pub enum OxiRasterError {
    /// I/O error from the underlying sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Code width outside the supported range.
    #[error("Invalid bit width: {0} (must be 1-32)")]
    InvalidBitWidth(u8),

    /// TIFF FillOrder tag value other than 1 or 2.
    #[error("Invalid fill order: {0} (must be 1 or 2)")]
    InvalidFillOrder(u16),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, OxiRasterError>;
