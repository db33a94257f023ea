//! # OxiRaster-Fax: Pure Rust CCITT Fax Decoder
//!
//! Decoding of bi-level image strips compressed with the CCITT T.4 (Group 3)
//! and T.6 (Group 4) schemes used by TIFF and PDF.
//!
//! ## Features
//!
//! - **Modified Huffman** (TIFF compression 2): one-dimensional rows, each
//!   starting on a byte boundary
//! - **Group 3** (TIFF compression 3): EOL-delimited rows, one- or
//!   two-dimensional, with optional EOL fill bits (detected when the
//!   encoder forgot to declare them)
//! - **Group 4** (TIFF compression 4): two-dimensional rows against an
//!   all-white first reference row, uncompressed mode, end-of-block handling
//! - **Fill order**: MSB-first or LSB-first input
//! - **Recovery**: truncated or slightly damaged strips decode as far as
//!   they go
//!
//! ## Output
//!
//! Rows are packed 1 bit per pixel, most significant bit first, padded to a
//! whole byte. Black pixels are 1 and white pixels 0 (TIFF
//! PhotometricInterpretation WhiteIsZero).
//!
//! ## Example
//!
//! ```rust
//! use oxiraster_fax::{FaxConfig, FaxDecoder, T6Options};
//!
//! // Group 4: horizontal mode (white 2, black 3), then vertical V0
//! let data = [0b0010_1111, 0b0100_0000];
//! let config = FaxConfig::new(8, 1);
//!
//! let mut out = vec![0u8; config.image_bytes()];
//! let mut decoder = FaxDecoder::new(config).unwrap();
//! let rows = decoder.decode_t6(&mut out, &data, 0, 1, T6Options::empty()).unwrap();
//!
//! assert_eq!(rows, 1);
//! assert_eq!(out, vec![0b0011_1000]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod bits;
mod config;
mod decoder;
mod error;
mod options;
mod tables;

pub use config::FaxConfig;
pub use decoder::FaxDecoder;
pub use error::{FaxError, Result};
pub use options::{T4Options, T6Options};
pub use oxiraster_core::FillOrder;

/// Decode a Modified Huffman image (TIFF compression 2).
///
/// Returns `config.height` packed rows.
pub fn decode_g3_1d(data: &[u8], config: FaxConfig) -> Result<Vec<u8>> {
    let mut out = vec![0u8; config.image_bytes()];
    FaxDecoder::new(config)?.decode_1d(&mut out, data, 0, config.height)?;
    Ok(out)
}

/// Decode a Group 3 image (TIFF compression 3).
///
/// Returns `config.height` packed rows.
pub fn decode_g3_2d(data: &[u8], config: FaxConfig, options: T4Options) -> Result<Vec<u8>> {
    let mut out = vec![0u8; config.image_bytes()];
    FaxDecoder::new(config)?.decode_2d(&mut out, data, 0, config.height, options)?;
    Ok(out)
}

/// Decode a Group 4 image (TIFF compression 4).
///
/// Returns `config.height` packed rows.
///
/// # Example
///
/// ```rust
/// use oxiraster_fax::{decode_g4, FaxConfig, T6Options};
///
/// // Two all-white rows, each a single pass code
/// let image = decode_g4(&[0b0001_0001], FaxConfig::new(8, 2), T6Options::empty()).unwrap();
/// assert_eq!(image, vec![0, 0]);
/// ```
pub fn decode_g4(data: &[u8], config: FaxConfig, options: T6Options) -> Result<Vec<u8>> {
    let mut out = vec![0u8; config.image_bytes()];
    FaxDecoder::new(config)?.decode_t6(&mut out, data, 0, config.height, options)?;
    Ok(out)
}
