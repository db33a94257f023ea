//! LZW-specific error types.

use oxiraster_core::OxiRasterError;
use thiserror::Error;

/// LZW compression/decompression errors.
#[derive(Debug, Error)]
pub enum LzwError {
    /// Code that is neither in the table nor the next code to be assigned.
    #[error("Invalid LZW code: {0}")]
    InvalidCode(u16),

    /// Stream uses the pre-TIFF 6.0 (LSB-first) LZW variant.
    #[error("TIFF 5.0-style LZW codes are not supported")]
    OldStyleCodes,

    /// Symbol size the encoder cannot work with.
    #[error("Invalid code size: {0} (must be 2-8)")]
    InvalidCodeSize(u8),

    /// Input byte that does not fit the encoder's symbol size.
    #[error("Symbol {0} out of range for the LZW code size")]
    InvalidSymbol(u8),

    /// Predictor tag value that is not supported.
    #[error("Unsupported predictor: {0}")]
    InvalidPredictor(u16),

    /// Strip geometry that does not fit the data or buffer.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(&'static str),

    /// Error from the bit packer or its sink.
    #[error(transparent)]
    Core(#[from] OxiRasterError),
}

/// Result type for LZW operations.
pub type Result<T> = std::result::Result<T, LzwError>;
