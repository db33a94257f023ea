//! MSB-first code reader for TIFF LZW.
//!
//! Codes are 9 to 12 bits wide and packed from the most significant bit of
//! each byte. A code that would need bytes past the end of the input is never
//! returned: the reader reports exhaustion instead, and the decoder treats it
//! like an end-of-information code.

/// MSB-first code reader over a strip.
#[derive(Debug)]
pub struct MsbCodeReader<'a> {
    /// Input data.
    data: &'a [u8],
    /// Next byte to load.
    byte_pos: usize,
    /// Bit buffer; only the low `bits_in_buffer` bits are valid.
    buffer: u32,
    /// Number of valid bits in the buffer (always below 8 between codes).
    bits_in_buffer: u8,
}

impl<'a> MsbCodeReader<'a> {
    /// Create a reader positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// Read the next `count`-bit code (9..=12).
    ///
    /// Returns `None` once the input cannot supply a whole code.
    #[inline]
    pub fn next_code(&mut self, count: u8) -> Option<u16> {
        while self.bits_in_buffer < count {
            let byte = *self.data.get(self.byte_pos)?;
            self.byte_pos += 1;
            self.buffer = (self.buffer << 8) | u32::from(byte);
            self.bits_in_buffer += 8;
        }

        self.bits_in_buffer -= count;
        let code = (self.buffer >> self.bits_in_buffer) & ((1 << count) - 1);
        self.buffer &= (1 << self.bits_in_buffer) - 1;
        Some(code as u16)
    }

    /// Number of input bytes consumed so far.
    pub fn bytes_consumed(&self) -> usize {
        self.byte_pos
    }
}
