//! # OxiRaster-LZW: Pure Rust LZW Strip Codec
//!
//! This crate provides LZW (Lempel-Ziv-Welch) compression and decompression
//! for TIFF strips and tiles, plus a GIF-flavoured encoder.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **TIFF LZW decoding**: MSB-first 9-12 bit codes, early code change,
//!   clear codes anywhere in the stream, truncated strips tolerated
//! - **Horizontal differencing**: TIFF predictor 2, undone after decoding
//! - **Streaming encoder**: TIFF (MSB-first) or GIF (LSB-first, 255-byte
//!   sub-blocks) output to any `Write` sink
//! - **Parallel strips**: with the `parallel` feature, independent strips
//!   decode on the rayon thread pool
//!
//! ## TIFF LZW Specification
//!
//! - **MSB-first bit order**: Bits are packed from most significant to least
//! - **9-12 bit codes**: Variable-length codes starting at 9 bits
//! - **Early code change**: The width grows when the table reaches 511, 1023
//!   and 2047 entries, one entry earlier than GIF
//! - **Clear code (256)**: Resets the table; the encoder starts every stream
//!   with one and emits another whenever the 12-bit table fills up
//! - **EOI (257)**: Ends the stream
//!
//! The pre-6.0 "old-style" variant (streams starting with `0x00 0x01`) is
//! rejected.
//!
//! ## Example
//!
//! ```rust
//! use oxiraster_lzw::{compress_tiff, decompress_tiff};
//!
//! let original = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! // Compress
//! let compressed = compress_tiff(original).unwrap();
//!
//! // Decompress
//! let decompressed = decompress_tiff(&compressed, original.len()).unwrap();
//!
//! assert_eq!(decompressed, original);
//! ```
//!
//! ## Strips with a predictor
//!
//! ```rust
//! use oxiraster_lzw::{compress_strip, LzwDecoder, Predictor};
//!
//! // Two rows of three RGB pixels
//! let pixels: Vec<u8> = (0..18).map(|i| i * 10).collect();
//! let compressed = compress_strip(&pixels, 3, 3, Predictor::Horizontal).unwrap();
//!
//! let mut out = vec![0u8; pixels.len()];
//! let mut decoder = LzwDecoder::new(3, Predictor::Horizontal, 3);
//! let written = decoder.decode(&compressed, &mut out, 2).unwrap();
//! assert_eq!(written, pixels.len());
//! assert_eq!(out, pixels);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod bitstream_msb;
mod config;
mod decoder;
mod dictionary;
mod encoder;
mod error;
pub mod predictor;

pub use config::{LzwConfig, MAX_BITS, MAX_CODES};
pub use decoder::LzwDecoder;
pub use encoder::LzwEncoder;
pub use error::{LzwError, Result};
pub use predictor::Predictor;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Compress data with LZW using the given configuration.
///
/// # Example
///
/// ```rust
/// use oxiraster_lzw::{compress, LzwConfig};
///
/// let data = b"TOBEORNOTTOBEORTOBEORNOT";
/// let gif = compress(data, LzwConfig::GIF).unwrap();
/// // GIF output is framed: the first byte is the sub-block length
/// assert_eq!(gif[0] as usize, gif.len() - 1);
/// ```
pub fn compress(data: &[u8], config: LzwConfig) -> Result<Vec<u8>> {
    let mut encoder = LzwEncoder::new(Vec::with_capacity(data.len() / 2 + 16), config)?;
    encoder.compress(data)?;
    encoder.finish()
}

/// Compress data with TIFF LZW.
pub fn compress_tiff(data: &[u8]) -> Result<Vec<u8>> {
    compress(data, LzwConfig::TIFF)
}

/// Apply `predictor` to a copy of `data` and compress it with TIFF LZW.
///
/// `data` holds whole rows of `width * samples_per_pixel` bytes.
pub fn compress_strip(
    data: &[u8],
    width: usize,
    samples_per_pixel: usize,
    predictor: Predictor,
) -> Result<Vec<u8>> {
    match predictor {
        Predictor::None => compress_tiff(data),
        Predictor::Horizontal => {
            let mut buf = data.to_vec();
            predictor::apply_horizontal_differencing(&mut buf, width, samples_per_pixel)?;
            compress_tiff(&buf)
        }
    }
}

/// Decompress a TIFF LZW strip of at most `expected_size` bytes.
///
/// The result is shorter than `expected_size` when the stream ends early.
pub fn decompress_tiff(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; expected_size];
    let mut decoder = LzwDecoder::new(expected_size, Predictor::None, 1);
    let written = decoder.decode(data, &mut out, 1)?;
    out.truncate(written);
    Ok(out)
}

/// Decompress independent TIFF LZW strips in parallel (requires `parallel`
/// feature).
///
/// Every strip decodes into a buffer of `strip_size` bytes holding whole rows
/// of `width * samples_per_pixel` bytes; each returned buffer is truncated to
/// the bytes its strip produced. Results keep the order of `strips`.
#[cfg(feature = "parallel")]
pub fn decompress_strips_parallel(
    strips: &[&[u8]],
    strip_size: usize,
    width: usize,
    predictor: Predictor,
    samples_per_pixel: usize,
) -> Result<Vec<Vec<u8>>> {
    let row_len = width.saturating_mul(samples_per_pixel).max(1);
    let rows = strip_size / row_len;

    strips
        .par_iter()
        .map(|strip| {
            let mut out = vec![0u8; strip_size];
            let mut decoder = LzwDecoder::new(width, predictor, samples_per_pixel);
            let written = decoder.decode(strip, &mut out, rows)?;
            out.truncate(written);
            Ok(out)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_simple() {
        let original = b"AAAABBBAAAA";
        let compressed = compress_tiff(original).unwrap();
        let decompressed = decompress_tiff(&compressed, original.len()).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_roundtrip_310_bytes() {
        let original = b"This is a test of compression! ".repeat(10);
        assert_eq!(original.len(), 310);

        let compressed = compress_tiff(&original).unwrap();
        let decompressed = decompress_tiff(&compressed, original.len()).unwrap();

        assert_eq!(decompressed.len(), 310);
        assert_eq!(decompressed, &original[..]);
    }

    #[test]
    fn test_empty() {
        let compressed = compress_tiff(b"").unwrap();
        let decompressed = decompress_tiff(&compressed, 0).unwrap();
        assert!(decompressed.is_empty());
    }

    #[test]
    fn test_short_stream_returns_what_it_has() {
        let compressed = compress_tiff(b"short").unwrap();
        let decompressed = decompress_tiff(&compressed, 100).unwrap();
        assert_eq!(decompressed, b"short");
    }

    #[test]
    fn test_compress_strip_with_predictor() {
        // A smooth gradient compresses better after differencing
        let width = 256;
        let rows = 16;
        let pixels: Vec<u8> = (0..width * rows).map(|i| (i % width) as u8).collect();

        let plain = compress_strip(&pixels, width, 1, Predictor::None).unwrap();
        let diffed = compress_strip(&pixels, width, 1, Predictor::Horizontal).unwrap();
        assert!(diffed.len() < plain.len());

        let mut out = vec![0u8; pixels.len()];
        let mut decoder = LzwDecoder::new(width, Predictor::Horizontal, 1);
        decoder.decode(&diffed, &mut out, rows).unwrap();
        assert_eq!(out, pixels);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_strips() {
        let strips: Vec<Vec<u8>> = (0..8u8)
            .map(|s| (0..512u32).map(|i| (i as u8).wrapping_mul(s)).collect())
            .collect();
        let compressed: Vec<Vec<u8>> = strips
            .iter()
            .map(|s| compress_strip(s, 64, 1, Predictor::Horizontal).unwrap())
            .collect();
        let refs: Vec<&[u8]> = compressed.iter().map(Vec::as_slice).collect();

        let decoded =
            decompress_strips_parallel(&refs, 512, 64, Predictor::Horizontal, 1).unwrap();
        assert_eq!(decoded, strips);
    }
}
