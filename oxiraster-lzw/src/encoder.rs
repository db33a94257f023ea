//! LZW encoder (compression).

use crate::config::{LzwConfig, MAX_BITS};
use crate::dictionary::LzwDictionary;
use crate::error::{LzwError, Result};
use log::trace;
use oxiraster_core::BitPacker;
use std::io::Write;

/// Streaming LZW encoder writing codes to any `Write` sink.
///
/// The clear code is written on construction. Input may be fed through any
/// number of [`compress`](Self::compress) calls; the pending string carries
/// over between calls. [`flush`](Self::flush) terminates the stream.
#[derive(Debug)]
pub struct LzwEncoder<W: Write> {
    /// Code packer over the sink.
    packer: BitPacker<W>,
    /// String table.
    dict: LzwDictionary,
    /// Configuration.
    config: LzwConfig,
    /// Current code width.
    bits: u8,
    /// Highest code assignable at the current width.
    limit: u16,
    /// Code of the longest string matched so far, if any.
    prefix: Option<u16>,
    /// Number of mid-stream table resets.
    resets: u64,
}

impl<W: Write> LzwEncoder<W> {
    /// Create an encoder and write the initial clear code.
    pub fn new(writer: W, config: LzwConfig) -> Result<Self> {
        config.validate()?;

        let bits = config.min_bits();
        let mut packer = BitPacker::new(writer, config.pack_order());
        packer.write_bits(u32::from(config.clear_code()), bits)?;

        Ok(Self {
            packer,
            dict: LzwDictionary::new(config.code_size),
            config,
            bits,
            limit: config.code_limit(bits),
            prefix: None,
            resets: 0,
        })
    }

    /// Feed more input.
    ///
    /// With a symbol size below 8, every byte must be below the clear code;
    /// a larger byte is rejected with [`LzwError::InvalidSymbol`] and nothing
    /// from it is written.
    pub fn compress(&mut self, data: &[u8]) -> Result<()> {
        let clear = self.config.clear_code();
        for &byte in data {
            if u16::from(byte) >= clear {
                return Err(LzwError::InvalidSymbol(byte));
            }

            let Some(prefix) = self.prefix else {
                self.prefix = Some(u16::from(byte));
                continue;
            };

            if let Some(code) = self.dict.find(prefix, byte) {
                self.prefix = Some(code);
                continue;
            }

            self.packer.write_bits(u32::from(prefix), self.bits)?;

            let overflow = match self.dict.add(prefix, byte) {
                Some(code) => code > self.limit,
                None => true,
            };
            if overflow {
                self.widen_or_reset()?;
            }

            self.prefix = Some(u16::from(byte));
        }
        Ok(())
    }

    /// Move to the next code width, or emit a clear code and start over when
    /// already at 12 bits.
    fn widen_or_reset(&mut self) -> Result<()> {
        if self.bits == MAX_BITS {
            self.packer
                .write_bits(u32::from(self.config.clear_code()), self.bits)?;
            self.dict.clear();
            self.bits = self.config.min_bits();
            self.resets += 1;
            trace!("lzw: table full, reset #{}", self.resets);
        } else {
            self.bits += 1;
        }
        self.limit = self.config.code_limit(self.bits);
        Ok(())
    }

    /// Write the pending string and the end-of-information code, then pad and
    /// flush the sink.
    ///
    /// The encoder is left with no pending string; calling `flush` again
    /// writes another end-of-information code.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(prefix) = self.prefix.take() {
            self.packer.write_bits(u32::from(prefix), self.bits)?;
            // A decoder reading that code assigns the next table entry, which
            // may move it to a wider code before it reads the EOI.
            if self.dict.len() > usize::from(self.limit) {
                self.widen_or_reset()?;
            }
        }
        self.packer
            .write_bits(u32::from(self.config.eoi_code()), self.bits)?;
        self.packer.flush()?;
        Ok(())
    }

    /// Flush and return the sink.
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.packer.into_inner()?)
    }

    /// Number of times the table filled up and a clear code was emitted.
    pub fn table_resets(&self) -> u64 {
        self.resets
    }

    /// Current code width in bits.
    pub fn code_bits(&self) -> u8 {
        self.bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(data: &[u8], config: LzwConfig) -> Vec<u8> {
        let mut encoder = LzwEncoder::new(Vec::new(), config).unwrap();
        encoder.compress(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_empty_input() {
        // Clear then EOI at 9 bits
        assert_eq!(encode(b"", LzwConfig::TIFF), vec![0x80, 0x40, 0x40]);
    }

    #[test]
    fn test_single_byte() {
        // 256, 'A' (65), 257 at 9 bits: 100000000 001000001 100000001
        assert_eq!(
            encode(b"A", LzwConfig::TIFF),
            vec![0x80, 0x10, 0x60, 0x20]
        );
    }

    #[test]
    fn test_split_input_matches_single_call() {
        let data = b"TOBEORNOTTOBEORTOBEORNOT".repeat(20);
        let whole = encode(&data, LzwConfig::TIFF);

        let mut encoder = LzwEncoder::new(Vec::new(), LzwConfig::TIFF).unwrap();
        for chunk in data.chunks(7) {
            encoder.compress(chunk).unwrap();
        }
        let split = encoder.finish().unwrap();
        assert_eq!(whole, split);
    }

    #[test]
    fn test_code_width_grows() {
        let mut encoder = LzwEncoder::new(Vec::new(), LzwConfig::TIFF).unwrap();
        assert_eq!(encoder.code_bits(), 9);
        // Pseudo-random bytes produce roughly one new entry per input byte
        let data: Vec<u8> = (0..2000u32).map(|i| (i * 7919 % 251) as u8).collect();
        encoder.compress(&data).unwrap();
        assert!(encoder.code_bits() >= 10);
    }

    #[test]
    fn test_table_resets_on_long_input() {
        let mut seed = 12345u32;
        let data: Vec<u8> = (0..50_000)
            .map(|_| {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
                (seed >> 16) as u8
            })
            .collect();

        let mut encoder = LzwEncoder::new(Vec::new(), LzwConfig::TIFF).unwrap();
        encoder.compress(&data).unwrap();
        assert!(encoder.table_resets() > 0);
        assert!(encoder.code_bits() <= MAX_BITS);
    }

    #[test]
    fn test_final_code_widens_before_eoi() {
        // The last code written makes a decoder's table reach 511 entries,
        // so EOI has to go out at 10 bits
        let data: Vec<u8> = (0..254u32).map(|i| (i * 7 + i / 5) as u8).collect();
        let mut encoder = LzwEncoder::new(Vec::new(), LzwConfig::TIFF).unwrap();
        encoder.compress(&data).unwrap();
        assert_eq!(encoder.code_bits(), 9);
        encoder.flush().unwrap();
        assert_eq!(encoder.code_bits(), 10);

        // One byte shorter stays at 9 bits
        let mut encoder = LzwEncoder::new(Vec::new(), LzwConfig::TIFF).unwrap();
        encoder.compress(&data[..253]).unwrap();
        encoder.flush().unwrap();
        assert_eq!(encoder.code_bits(), 9);
    }

    #[test]
    fn test_final_code_widens_gif() {
        let data = [0, 3, 2, 1, 0, 0, 3, 2, 1, 0, 0, 3, 2, 1, 0, 0];
        let mut encoder = LzwEncoder::new(Vec::new(), LzwConfig::new(2, false)).unwrap();
        encoder.compress(&data).unwrap();
        assert_eq!(encoder.code_bits(), 4);
        encoder.flush().unwrap();
        assert_eq!(encoder.code_bits(), 5);
    }

    #[test]
    fn test_rejects_symbol_outside_code_size() {
        let mut encoder = LzwEncoder::new(Vec::new(), LzwConfig::new(2, false)).unwrap();
        encoder.compress(&[0, 1, 2, 3]).unwrap();
        assert!(matches!(
            encoder.compress(&[1, 200]),
            Err(LzwError::InvalidSymbol(200))
        ));
        // The clear code itself is not a symbol either
        assert!(matches!(
            encoder.compress(&[4]),
            Err(LzwError::InvalidSymbol(4))
        ));

        // 8-bit symbols accept every byte
        let mut encoder = LzwEncoder::new(Vec::new(), LzwConfig::TIFF).unwrap();
        assert!(encoder.compress(&[0, 128, 255]).is_ok());
    }

    #[test]
    fn test_gif_output_is_framed() {
        let data = encode(b"ABABABAB", LzwConfig::GIF);
        // A single sub-block: length byte followed by that many bytes
        assert_eq!(data[0] as usize, data.len() - 1);
    }
}
