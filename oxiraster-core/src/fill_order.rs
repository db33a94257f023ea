//! TIFF fill order.
//!
//! Fax data may be stored with the first pixel in either the most or the
//! least significant bit of each byte. Decoders normalize LSB-first input by
//! passing every byte through [`FLIP_TABLE`].

use crate::error::{OxiRasterError, Result};

/// Bit order of pixels within a byte (TIFF tag 266).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillOrder {
    /// Lower column values are stored in the high-order bits (value 1).
    #[default]
    MsbFirst,
    /// Lower column values are stored in the low-order bits (value 2).
    LsbFirst,
}

impl FillOrder {
    /// Normalize a raw input byte to MSB-first order.
    #[inline]
    pub fn normalize(self, byte: u8) -> u8 {
        match self {
            FillOrder::MsbFirst => byte,
            FillOrder::LsbFirst => FLIP_TABLE[byte as usize],
        }
    }
}

impl TryFrom<u16> for FillOrder {
    type Error = OxiRasterError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            1 => Ok(FillOrder::MsbFirst),
            2 => Ok(FillOrder::LsbFirst),
            other => Err(OxiRasterError::InvalidFillOrder(other)),
        }
    }
}

/// Bit-reversal table: `FLIP_TABLE[b]` is `b` with its bit order reversed.
pub static FLIP_TABLE: [u8; 256] = build_flip_table();

const fn build_flip_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8).reverse_bits();
        i += 1;
    }
    table
}
