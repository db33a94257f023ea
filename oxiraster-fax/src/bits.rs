//! Bit cursor over compressed fax data.
//!
//! Reads are MSB-first after fill-order normalization. Code tables are
//! indexed with a fixed-width lookahead, so the decoder reads a full window
//! and then [`rewind`](BitCursor::rewind)s the bits the code did not use.

use crate::error::{FaxError, Result};
use oxiraster_core::FillOrder;

/// Read position in a compressed strip.
#[derive(Debug)]
pub(crate) struct BitCursor<'a> {
    data: &'a [u8],
    fill_order: FillOrder,
    /// Byte holding the next unread bit.
    byte_pos: usize,
    /// Bit within that byte, 0 = most significant; always below 8.
    bit_pos: u8,
}

impl<'a> BitCursor<'a> {
    pub fn new(data: &'a [u8], fill_order: FillOrder) -> Self {
        Self {
            data,
            fill_order,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> u8 {
        self.data
            .get(pos)
            .map_or(0, |&b| self.fill_order.normalize(b))
    }

    /// Read `count` bits (1..=16).
    ///
    /// The first bit must lie inside the data; bits past the end read as
    /// zero.
    #[inline]
    pub fn next_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!((1..=16).contains(&count));
        if self.byte_pos >= self.data.len() {
            return Err(FaxError::Truncated {
                byte_pos: self.byte_pos,
            });
        }

        let word = (u32::from(self.byte_at(self.byte_pos)) << 16)
            | (u32::from(self.byte_at(self.byte_pos + 1)) << 8)
            | u32::from(self.byte_at(self.byte_pos + 2));
        let shift = 24 - u32::from(self.bit_pos) - u32::from(count);
        let value = (word >> shift) & ((1 << count) - 1);

        let advanced = usize::from(self.bit_pos) + usize::from(count);
        self.byte_pos += advanced / 8;
        self.bit_pos = (advanced % 8) as u8;
        Ok(value)
    }

    /// Step back `count` bits.
    #[inline]
    pub fn rewind(&mut self, count: u8) {
        let pos = self.position().saturating_sub(usize::from(count));
        self.byte_pos = pos / 8;
        self.bit_pos = (pos % 8) as u8;
    }

    /// Skip to the next byte boundary, if not already on one.
    pub fn align_to_byte(&mut self) {
        if self.bit_pos != 0 {
            self.byte_pos += 1;
            self.bit_pos = 0;
        }
    }

    /// Bits left before the next byte boundary (8 when on one).
    pub fn bits_to_boundary(&self) -> u8 {
        8 - self.bit_pos
    }

    /// Absolute bit position.
    pub fn position(&self) -> usize {
        self.byte_pos * 8 + usize::from(self.bit_pos)
    }

    pub fn byte_pos(&self) -> usize {
        self.byte_pos
    }
}
