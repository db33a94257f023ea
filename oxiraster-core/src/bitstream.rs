//! Variable-width code packing.
//!
//! [`BitPacker`] appends integer codes of 1 to 32 bits to a byte sink. It is
//! the output stage of the LZW encoder; decoders read their input directly
//! and do not go through this type.
//!
//! # Bit Ordering
//!
//! - [`PackOrder::Msb`]: codes are packed starting at the most significant
//!   bit of each byte (TIFF).
//! - [`PackOrder::LsbBlocks`]: codes are packed starting at the least
//!   significant bit, and the byte stream is cut into data sub-blocks of at
//!   most 255 bytes, each preceded by its length (GIF).
//!
//! Complete bytes are buffered and reach the sink only when a block of 255
//! bytes is full or on [`BitPacker::flush`].
//!
//! # Example
//!
//! ```
//! use oxiraster_core::bitstream::{BitPacker, PackOrder};
//!
//! let mut packer = BitPacker::new(Vec::new(), PackOrder::LsbBlocks);
//! packer.write_bits(0b101, 3).unwrap();
//! packer.write_bits(0b11001, 5).unwrap();
//! let bytes = packer.into_inner().unwrap();
//! // One sub-block of length 1: 11001_101
//! assert_eq!(bytes, vec![1, 0xCD]);
//! ```

use crate::error::{OxiRasterError, Result};
use std::io::Write;

/// Largest data sub-block, and the size of the internal byte buffer.
pub const BLOCK_SIZE: usize = 255;

/// Bit order and framing used by a [`BitPacker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackOrder {
    /// MSB-first, unframed.
    Msb,
    /// LSB-first, length-prefixed sub-blocks.
    LsbBlocks,
}

/// A bit-level writer that packs codes into any `Write` sink.
#[derive(Debug)]
pub struct BitPacker<W: Write> {
    /// Underlying sink.
    writer: W,
    /// Packing order.
    order: PackOrder,
    /// Complete bytes not yet handed to the sink.
    block: [u8; BLOCK_SIZE],
    /// Number of bytes used in `block`.
    block_len: usize,
    /// Pending bits that do not yet form a complete byte.
    acc: u64,
    /// Number of valid bits in `acc`.
    acc_bits: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl<W: Write> BitPacker<W> {
    /// Create a new packer over the given sink.
    pub fn new(writer: W, order: PackOrder) -> Self {
        Self {
            writer,
            order,
            block: [0; BLOCK_SIZE],
            block_len: 0,
            acc: 0,
            acc_bits: 0,
            total_bits_written: 0,
        }
    }

    /// Get a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// The packing order of this packer.
    pub fn order(&self) -> PackOrder {
        self.order
    }

    /// Get the total number of bits written so far (padding excluded).
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Append the low `count` bits of `value`.
    ///
    /// `count` may be 0 (no-op) up to 32.
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        if count > 32 {
            return Err(OxiRasterError::InvalidBitWidth(count));
        }
        if count == 0 {
            return Ok(());
        }

        let value = u64::from(value) & ((1u64 << count) - 1);
        match self.order {
            PackOrder::Msb => {
                self.acc = (self.acc << count) | value;
                self.acc_bits += count;
                while self.acc_bits >= 8 {
                    self.acc_bits -= 8;
                    let byte = (self.acc >> self.acc_bits) as u8;
                    self.push_byte(byte)?;
                }
                self.acc &= (1u64 << self.acc_bits) - 1;
            }
            PackOrder::LsbBlocks => {
                self.acc |= value << self.acc_bits;
                self.acc_bits += count;
                while self.acc_bits >= 8 {
                    let byte = self.acc as u8;
                    self.acc >>= 8;
                    self.acc_bits -= 8;
                    self.push_byte(byte)?;
                }
            }
        }

        self.total_bits_written += u64::from(count);
        Ok(())
    }

    /// Write out any buffered bits.
    ///
    /// A partial trailing byte is padded with zero bits. In block mode the
    /// buffered bytes go out as one length-prefixed sub-block. Calling this
    /// with nothing buffered writes nothing.
    pub fn flush(&mut self) -> Result<()> {
        if self.acc_bits > 0 {
            let byte = match self.order {
                PackOrder::Msb => (self.acc << (8 - self.acc_bits)) as u8,
                PackOrder::LsbBlocks => self.acc as u8,
            };
            self.acc = 0;
            self.acc_bits = 0;
            self.push_byte(byte)?;
        }
        self.write_block()?;
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.writer)
    }

    #[inline]
    fn push_byte(&mut self, byte: u8) -> Result<()> {
        self.block[self.block_len] = byte;
        self.block_len += 1;
        if self.block_len == BLOCK_SIZE {
            self.write_block()?;
        }
        Ok(())
    }

    fn write_block(&mut self) -> Result<()> {
        if self.block_len == 0 {
            return Ok(());
        }
        if self.order == PackOrder::LsbBlocks {
            self.writer.write_all(&[self.block_len as u8])?;
        }
        self.writer.write_all(&self.block[..self.block_len])?;
        self.block_len = 0;
        Ok(())
    }
}
