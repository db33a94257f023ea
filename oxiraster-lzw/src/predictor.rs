//! TIFF predictor (tag 317).
//!
//! Horizontal differencing stores each sample as the difference from the
//! same sample of the previous pixel in the row, modulo 256. It is applied
//! before LZW encoding and undone after decoding.

use crate::error::{LzwError, Result};

/// Predictor applied to the decoded samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Predictor {
    /// No prediction (value 1).
    #[default]
    None,
    /// Horizontal differencing of 8-bit samples (value 2).
    Horizontal,
}

impl TryFrom<u16> for Predictor {
    type Error = LzwError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            1 => Ok(Predictor::None),
            2 => Ok(Predictor::Horizontal),
            other => Err(LzwError::InvalidPredictor(other)),
        }
    }
}

fn row_len(width: usize, samples_per_pixel: usize) -> Result<usize> {
    if width == 0 || samples_per_pixel == 0 {
        return Err(LzwError::InvalidGeometry(
            "width and samples per pixel must be non-zero",
        ));
    }
    width
        .checked_mul(samples_per_pixel)
        .ok_or(LzwError::InvalidGeometry("row size overflows"))
}

/// Replace each sample with its difference from the previous pixel's sample.
///
/// `buf` holds whole rows of `width * samples_per_pixel` bytes; a trailing
/// partial row is left untouched.
pub fn apply_horizontal_differencing(
    buf: &mut [u8],
    width: usize,
    samples_per_pixel: usize,
) -> Result<()> {
    let row_len = row_len(width, samples_per_pixel)?;
    for row in buf.chunks_exact_mut(row_len) {
        for i in (samples_per_pixel..row_len).rev() {
            row[i] = row[i].wrapping_sub(row[i - samples_per_pixel]);
        }
    }
    Ok(())
}

/// Undo horizontal differencing over the first `rows` rows of `buf`.
pub fn reverse_horizontal_differencing(
    buf: &mut [u8],
    width: usize,
    samples_per_pixel: usize,
    rows: usize,
) -> Result<()> {
    let row_len = row_len(width, samples_per_pixel)?;
    let needed = row_len
        .checked_mul(rows)
        .ok_or(LzwError::InvalidGeometry("strip size overflows"))?;
    if needed > buf.len() {
        return Err(LzwError::InvalidGeometry(
            "output buffer smaller than the strip",
        ));
    }

    for row in buf[..needed].chunks_exact_mut(row_len) {
        for i in samples_per_pixel..row_len {
            row[i] = row[i].wrapping_add(row[i - samples_per_pixel]);
        }
    }
    Ok(())
}
