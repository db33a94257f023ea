//! TIFF LZW decoder (decompression).
//!
//! Decodes one strip or tile into a caller-provided buffer. Codes start at 9
//! bits and widen to 10, 11 and 12 bits when the table reaches 511, 1023 and
//! 2047 entries, one entry earlier than GIF. Decoding stops at the
//! end-of-information code, when the output buffer is full, or when the input
//! runs out, whichever comes first.

use crate::bitstream_msb::MsbCodeReader;
use crate::config::MAX_CODES;
use crate::error::{LzwError, Result};
use crate::predictor::{self, Predictor};
use log::{debug, trace};

const CLEAR_CODE: u16 = 256;
const EOI_CODE: u16 = 257;
const FIRST_CODE: usize = 258;
const MIN_BITS: u8 = 9;

/// TIFF LZW decoder.
#[derive(Debug)]
pub struct LzwDecoder {
    /// Pixels per row, for the predictor.
    width: usize,
    /// Predictor to undo after decoding.
    predictor: Predictor,
    /// Samples per pixel, for the predictor.
    samples_per_pixel: usize,
    /// Code table: code -> byte sequence.
    table: Vec<Vec<u8>>,
    /// Current code width.
    bits: u8,
    /// Clear codes seen during the last decode.
    clear_codes: u64,
}

impl LzwDecoder {
    /// Create a decoder for rows of `width` pixels.
    pub fn new(width: usize, predictor: Predictor, samples_per_pixel: usize) -> Self {
        let mut table = Vec::with_capacity(MAX_CODES);
        table.extend((0..=255u8).map(|b| vec![b]));
        // Placeholders for the clear and end-of-information codes
        table.push(Vec::new());
        table.push(Vec::new());

        Self {
            width,
            predictor,
            samples_per_pixel,
            table,
            bits: MIN_BITS,
            clear_codes: 0,
        }
    }

    /// Decode `data` into `out`, then undo the predictor over `rows` rows.
    ///
    /// Returns the number of bytes written. A strip without an
    /// end-of-information code decodes to whatever its codes describe; the
    /// last string is cut off if it does not fit in `out`.
    pub fn decode(&mut self, data: &[u8], out: &mut [u8], rows: usize) -> Result<usize> {
        if data.len() >= 2 && data[0] == 0x00 && data[1] == 0x01 {
            return Err(LzwError::OldStyleCodes);
        }

        self.reset();
        self.clear_codes = 0;

        let mut reader = MsbCodeReader::new(data);
        let mut written = 0;
        let mut prev: Option<usize> = None;

        while written < out.len() {
            let Some(code) = reader.next_code(self.bits) else {
                debug!(
                    "lzw: input exhausted after {} bytes in, {} bytes out",
                    reader.bytes_consumed(),
                    written
                );
                break;
            };

            match code {
                EOI_CODE => break,
                CLEAR_CODE => {
                    self.reset();
                    self.clear_codes += 1;
                    prev = None;
                    continue;
                }
                _ => {}
            }

            let idx = usize::from(code);
            if idx < self.table.len() {
                let entry = &self.table[idx];
                written += copy_truncated(entry, &mut out[written..]);
                let first = entry[0];
                if let Some(p) = prev {
                    self.add_entry(p, first);
                }
            } else if idx == self.table.len() {
                // Code being defined by this very step: previous string plus
                // its own first byte.
                let Some(p) = prev else {
                    return Err(LzwError::InvalidCode(code));
                };
                let prev_entry = &self.table[p];
                let mut string = Vec::with_capacity(prev_entry.len() + 1);
                string.extend_from_slice(prev_entry);
                string.push(prev_entry[0]);
                written += copy_truncated(&string, &mut out[written..]);
                self.push_entry(string);
            } else {
                return Err(LzwError::InvalidCode(code));
            }

            prev = Some(idx);
        }

        if self.predictor == Predictor::Horizontal {
            predictor::reverse_horizontal_differencing(
                out,
                self.width,
                self.samples_per_pixel,
                rows,
            )?;
        }

        trace!(
            "lzw: decoded {} bytes, {} clear codes, {} table entries",
            written,
            self.clear_codes,
            self.table.len()
        );
        Ok(written)
    }

    /// Number of clear codes encountered by the last [`decode`](Self::decode),
    /// the leading one included.
    pub fn clear_codes_seen(&self) -> u64 {
        self.clear_codes
    }

    /// Predictor this decoder undoes.
    pub fn predictor(&self) -> Predictor {
        self.predictor
    }

    fn reset(&mut self) {
        self.table.truncate(FIRST_CODE);
        self.bits = MIN_BITS;
    }

    fn add_entry(&mut self, prev: usize, byte: u8) {
        if self.table.len() >= MAX_CODES {
            return;
        }
        let prev_entry = &self.table[prev];
        let mut string = Vec::with_capacity(prev_entry.len() + 1);
        string.extend_from_slice(prev_entry);
        string.push(byte);
        self.push_entry(string);
    }

    fn push_entry(&mut self, string: Vec<u8>) {
        if self.table.len() >= MAX_CODES {
            return;
        }
        self.table.push(string);
        match self.table.len() {
            511 => self.bits = 10,
            1023 => self.bits = 11,
            2047 => self.bits = 12,
            _ => {}
        }
    }
}

#[inline]
fn copy_truncated(src: &[u8], dst: &mut [u8]) -> usize {
    let n = src.len().min(dst.len());
    dst[..n].copy_from_slice(&src[..n]);
    n
}
