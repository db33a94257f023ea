//! Fax decoding error types.

use oxiraster_core::OxiRasterError;
use thiserror::Error;

/// CCITT decoding errors.
///
/// Positions are bit offsets into the compressed input.
#[derive(Debug, Error)]
pub enum FaxError {
    /// Bits that start no run code.
    #[error("Invalid run code at bit {position}")]
    InvalidCode {
        /// Bit position of the code.
        position: usize,
    },

    /// End-of-line code where a run code was expected.
    #[error("EOL code in {color} run at bit {position}")]
    UnexpectedEol {
        /// Color of the run being decoded.
        color: &'static str,
        /// Bit position of the code.
        position: usize,
    },

    /// Group 3 two-dimensional line without a leading end-of-line code.
    #[error("Scanline must begin with EOL code at bit {position}")]
    MissingEol {
        /// Bit position where the EOL was expected.
        position: usize,
    },

    /// The first line of a Group 3 two-dimensional strip is tagged 2D.
    #[error("First scanline must be 1D encoded")]
    FirstLineNotOneDimensional,

    /// Non-zero fill bits before an end-of-line code.
    #[error("Fill bits before EOL must be 0 (bit {position})")]
    InvalidFillBits {
        /// Bit position of the offending bits.
        position: usize,
    },

    /// Invalid two-dimensional mode code in a Group 3 strip.
    #[error("Invalid 2D mode code at bit {position}")]
    InvalidMode {
        /// Bit position of the code.
        position: usize,
    },

    /// Malformed uncompressed-mode sequence.
    #[error("Invalid uncompressed mode code at bit {position}")]
    InvalidUncompressed {
        /// Bit position of the code.
        position: usize,
    },

    /// Vertical mode placed a1 before the current position.
    #[error("Changing element {a1} before current position {a0}")]
    InvalidReference {
        /// Current position on the coding line.
        a0: usize,
        /// Position computed from the reference line.
        a1: isize,
    },

    /// Input ended before all requested rows were decoded.
    #[error("Compressed data truncated at byte {byte_pos}")]
    Truncated {
        /// Byte offset past the end of the input.
        byte_pos: usize,
    },

    /// Output buffer too small for the requested rows.
    #[error("Output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        available: usize,
    },

    /// Unusable image geometry.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(&'static str),

    /// Error from shared configuration parsing.
    #[error(transparent)]
    Core(#[from] OxiRasterError),
}

/// Result type for fax operations.
pub type Result<T> = std::result::Result<T, FaxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FaxError::UnexpectedEol {
            color: "white",
            position: 40,
        };
        assert_eq!(err.to_string(), "EOL code in white run at bit 40");

        let err = FaxError::BufferTooSmall {
            needed: 8,
            available: 2,
        };
        assert!(err.to_string().contains("need 8 bytes"));
    }
}
