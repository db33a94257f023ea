//! CCITT Group 3 / Group 4 scanline decoder.
//!
//! Each decoded row is packed MSB-first into `row_bytes()` bytes of the
//! output buffer; black pixels are set, white pixels are left untouched, so
//! the caller passes a zeroed buffer.
//!
//! Two-dimensional coding describes each row by its changing elements (the
//! pixel positions where the color flips) relative to those of the row
//! above. The decoder keeps both rows' changing elements and swaps them
//! between rows.

use crate::bits::BitCursor;
use crate::config::FaxConfig;
use crate::error::{FaxError, Result};
use crate::options::{T4Options, T6Options};
use crate::tables::{
    BLACK_INIT, BLACK_LONG, BLACK_SHORT, EXTENDED_MAKEUP_TABLE, MODE_2D, Mode, RunCode, RunEntry,
    WHITE,
};
use log::{debug, trace, warn};

/// Longest zero run inside an uncompressed-mode code.
const MAX_UNCOMPRESSED_ZEROS: usize = 10;

/// How two-dimensional lines treat codes they cannot use.
#[derive(Debug, Clone, Copy)]
enum Coding {
    /// Group 3: invalid mode codes are errors.
    Group3 { uncompressed: bool },
    /// Group 4: invalid mode codes abort the line.
    Group4 { uncompressed: bool },
}

impl Coding {
    fn uncompressed(self) -> bool {
        match self {
            Coding::Group3 { uncompressed } | Coding::Group4 { uncompressed } => uncompressed,
        }
    }
}

/// CCITT fax decoder.
#[derive(Debug)]
pub struct FaxDecoder {
    config: FaxConfig,
    /// Changing elements of the reference (previous) row.
    prev: Vec<usize>,
    /// Changing elements of the row being decoded.
    curr: Vec<usize>,
    /// Index in `prev` where the last reference search stopped.
    last_changing: usize,
}

impl FaxDecoder {
    /// Create a decoder for the configured geometry.
    pub fn new(config: FaxConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            prev: Vec::with_capacity(config.width + 2),
            curr: Vec::with_capacity(config.width + 2),
            last_changing: 0,
        })
    }

    /// The decoder configuration.
    pub fn config(&self) -> &FaxConfig {
        &self.config
    }

    /// Decode `rows` Modified Huffman rows (TIFF compression 2).
    ///
    /// Every row is coded one-dimensionally without EOL codes and starts on a
    /// byte boundary. Decoding of each row begins at pixel `start_x`.
    /// Returns the number of rows decoded.
    pub fn decode_1d(
        &mut self,
        out: &mut [u8],
        data: &[u8],
        start_x: usize,
        rows: usize,
    ) -> Result<usize> {
        self.begin(out, rows, "G3 1D")?;
        let stride = self.config.row_bytes();
        let mut cursor = BitCursor::new(data, self.config.fill_order);

        for row in 0..rows {
            if let Err(err) = self.decode_1d_line(&mut cursor, out, row * stride, start_x, true) {
                return self.stop(err, row);
            }
        }

        debug!("fax: decoded {} rows, {} bytes read", rows, cursor.byte_pos());
        Ok(rows)
    }

    /// Decode `rows` Group 3 rows (TIFF compression 3).
    ///
    /// Every row starts with an EOL code. With
    /// [`T4Options::TWO_DIMENSIONAL`] each EOL is followed by a tag bit: 1
    /// for a one-dimensional row, 0 for a row coded against the previous one.
    /// The first row must be one-dimensional. Returns the number of rows
    /// decoded.
    pub fn decode_2d(
        &mut self,
        out: &mut [u8],
        data: &[u8],
        start_x: usize,
        rows: usize,
        options: T4Options,
    ) -> Result<usize> {
        self.begin(out, rows, "G3 2D")?;
        let stride = self.config.row_bytes();
        let mut cursor = BitCursor::new(data, self.config.fill_order);
        let mut fill_bits = options.contains(T4Options::FILL_BITS);
        let two_d = options.contains(T4Options::TWO_DIMENSIONAL);
        let coding = Coding::Group3 {
            uncompressed: options.contains(T4Options::UNCOMPRESSED),
        };

        for row in 0..rows {
            let line = row * stride;
            let result = match self.read_eol(&mut cursor, &mut fill_bits, row == 0, two_d) {
                Ok(false) if row == 0 => Err(FaxError::FirstLineNotOneDimensional),
                Ok(true) => self.decode_1d_line(&mut cursor, out, line, start_x, false),
                Ok(false) => self.decode_2d_line(&mut cursor, out, line, start_x, coding),
                Err(err) => Err(err),
            };
            if let Err(err) = result {
                return self.stop(err, row);
            }
        }

        debug!("fax: decoded {} rows, {} bytes read", rows, cursor.byte_pos());
        Ok(rows)
    }

    /// Decode `rows` Group 4 rows (TIFF compression 4).
    ///
    /// Every row is coded two-dimensionally; the row above the first one is
    /// all white. A row that starts an unknown mode code (including the
    /// end-of-facsimile-block code) is left blank. Returns the number of rows
    /// decoded.
    pub fn decode_t6(
        &mut self,
        out: &mut [u8],
        data: &[u8],
        start_x: usize,
        rows: usize,
        options: T6Options,
    ) -> Result<usize> {
        self.begin(out, rows, "G4")?;
        let width = self.config.width;
        let stride = self.config.row_bytes();
        let mut cursor = BitCursor::new(data, self.config.fill_order);
        let aligned = options.contains(T6Options::FILL_BITS);
        let coding = Coding::Group4 {
            uncompressed: options.contains(T6Options::UNCOMPRESSED),
        };

        // Imaginary all-white reference row
        self.curr.push(width);
        self.curr.push(width);

        for row in 0..rows {
            if aligned {
                cursor.align_to_byte();
            }
            if let Err(err) =
                self.decode_2d_line(&mut cursor, out, row * stride, start_x, coding)
            {
                return self.stop(err, row);
            }
        }

        debug!("fax: decoded {} rows, {} bytes read", rows, cursor.byte_pos());
        Ok(rows)
    }

    fn begin(&mut self, out: &[u8], rows: usize, kind: &str) -> Result<()> {
        let needed = rows
            .checked_mul(self.config.row_bytes())
            .ok_or(FaxError::InvalidGeometry("image too large"))?;
        if out.len() < needed {
            if !self.config.recover {
                return Err(FaxError::BufferTooSmall {
                    needed,
                    available: out.len(),
                });
            }
            warn!(
                "fax: output buffer holds {} of {} bytes, clamping writes",
                out.len(),
                needed
            );
        }

        debug!(
            "fax: {} decode, {}x{} pixels, {:?}",
            kind, self.config.width, rows, self.config.fill_order
        );
        self.prev.clear();
        self.curr.clear();
        self.last_changing = 0;
        Ok(())
    }

    /// End decoding after `rows_done` rows because of `err`.
    fn stop(&self, err: FaxError, rows_done: usize) -> Result<usize> {
        match err {
            FaxError::Truncated { byte_pos } if self.config.recover => {
                warn!(
                    "fax: data ends at byte {}, keeping {} decoded rows",
                    byte_pos, rows_done
                );
                Ok(rows_done)
            }
            err => Err(err),
        }
    }

    /// Consume the EOL (and fill bits) before a Group 3 row.
    ///
    /// Returns true when the row is one-dimensional.
    fn read_eol(
        &self,
        cursor: &mut BitCursor<'_>,
        fill_bits: &mut bool,
        first: bool,
        two_d: bool,
    ) -> Result<bool> {
        let start = cursor.position();
        if !*fill_bits {
            let next12 = cursor.next_bits(12)?;
            if first && next12 == 0 && cursor.next_bits(4)? == 1 {
                warn!("fax: EOL fill bits present but not declared, enabling");
                *fill_bits = true;
            } else if next12 != 1 {
                return Err(FaxError::MissingEol { position: start });
            }
        } else {
            // The EOL ends on a byte boundary, preceded by any number of zero
            // bits.
            let bits_left = cursor.bits_to_boundary();
            if cursor.next_bits(bits_left)? != 0 {
                return Err(FaxError::InvalidFillBits { position: start });
            }
            if bits_left < 4 && cursor.next_bits(8)? != 0 {
                return Err(FaxError::InvalidFillBits { position: start });
            }
            loop {
                let pos = cursor.position();
                match cursor.next_bits(8)? {
                    1 => break,
                    0 => {}
                    _ => return Err(FaxError::InvalidFillBits { position: pos }),
                }
            }
        }

        if !two_d {
            return Ok(true);
        }
        let one_d = cursor.next_bits(1)? == 1;
        trace!("fax: row tagged {}", if one_d { "1D" } else { "2D" });
        Ok(one_d)
    }

    fn decode_1d_line(
        &mut self,
        cursor: &mut BitCursor<'_>,
        out: &mut [u8],
        line: usize,
        start_x: usize,
        byte_aligned: bool,
    ) -> Result<()> {
        let width = self.config.width;
        let mut bit_offset = start_x;
        self.curr.clear();

        while bit_offset < width {
            bit_offset += white_run(cursor)?;
            self.curr.push(bit_offset);
            if bit_offset >= width {
                break;
            }

            let run = black_run(cursor)?;
            self.fill_black(out, line, bit_offset, bit_offset + run)?;
            bit_offset += run;
            self.curr.push(bit_offset);
        }

        if byte_aligned {
            cursor.align_to_byte();
        }
        self.curr.push(bit_offset);
        self.curr.push(bit_offset);
        Ok(())
    }

    fn decode_2d_line(
        &mut self,
        cursor: &mut BitCursor<'_>,
        out: &mut [u8],
        line: usize,
        start_x: usize,
        coding: Coding,
    ) -> Result<()> {
        let width = self.config.width;
        std::mem::swap(&mut self.prev, &mut self.curr);
        self.curr.clear();
        self.last_changing = 0;

        let mut a0: isize = -1;
        let mut is_white = true;
        let mut bit_offset = start_x;

        while bit_offset < width {
            let (b1, b2) = self.next_changing_element(a0, is_white);
            let start = cursor.position();
            let entry = MODE_2D[cursor.next_bits(7)? as usize];

            match entry.mode {
                Mode::Pass => {
                    cursor.rewind(7 - entry.bits);
                    let b2 = b2.min(width);
                    if !is_white {
                        self.fill_black(out, line, bit_offset, b2)?;
                    }
                    bit_offset = b2;
                    a0 = b2 as isize;
                }
                Mode::Horizontal => {
                    cursor.rewind(7 - entry.bits);
                    if is_white {
                        bit_offset += white_run(cursor)?;
                        self.curr.push(bit_offset);
                        let run = black_run(cursor)?.min(width.saturating_sub(bit_offset));
                        self.fill_black(out, line, bit_offset, bit_offset + run)?;
                        bit_offset += run;
                        self.curr.push(bit_offset);
                    } else {
                        let run = black_run(cursor)?.min(width.saturating_sub(bit_offset));
                        self.fill_black(out, line, bit_offset, bit_offset + run)?;
                        bit_offset += run;
                        self.curr.push(bit_offset);
                        bit_offset += white_run(cursor)?;
                        self.curr.push(bit_offset);
                    }
                    a0 = bit_offset as isize;
                }
                Mode::Vertical(offset) => {
                    cursor.rewind(7 - entry.bits);
                    let mut a1 = b1 as isize + isize::from(offset);
                    if a1 < bit_offset as isize {
                        if !self.config.recover {
                            return Err(FaxError::InvalidReference { a0: bit_offset, a1 });
                        }
                        warn!(
                            "fax: changing element {} before {}, clamping",
                            a1, bit_offset
                        );
                        a1 = bit_offset as isize;
                    }
                    let a1 = (a1 as usize).min(width);
                    self.curr.push(a1);
                    if !is_white {
                        self.fill_black(out, line, bit_offset, a1)?;
                    }
                    bit_offset = a1;
                    a0 = a1 as isize;
                    is_white = !is_white;
                }
                Mode::Extension if coding.uncompressed() => {
                    if cursor.next_bits(3)? != 0b111 {
                        return Err(FaxError::InvalidUncompressed { position: start });
                    }
                    self.decode_uncompressed(cursor, out, line, &mut bit_offset, &mut is_white)?;
                    a0 = bit_offset as isize;
                }
                Mode::Extension | Mode::Invalid => match coding {
                    Coding::Group3 { .. } => {
                        return Err(FaxError::InvalidMode { position: start });
                    }
                    Coding::Group4 { .. } => {
                        trace!("fax: unknown mode code at bit {}, row left blank", start);
                        cursor.rewind(7);
                        bit_offset = width;
                    }
                },
            }
        }

        self.curr.push(bit_offset);
        self.curr.push(bit_offset);
        Ok(())
    }

    /// Find b1 (the first changing element of the reference row after `a0`
    /// with the color opposite to the current one) and b2 (the one after it).
    ///
    /// The search resumes near where the previous one stopped. Both default to
    /// the row width.
    fn next_changing_element(&mut self, a0: isize, is_white: bool) -> (usize, usize) {
        let width = self.config.width;
        let pce = &self.prev;

        let mut i = self.last_changing.saturating_sub(1);
        if is_white {
            i &= !1;
        } else {
            i |= 1;
        }

        while i < pce.len() {
            let b1 = pce[i];
            if b1 as isize > a0 {
                self.last_changing = i;
                let b2 = pce.get(i + 1).copied().unwrap_or(width);
                return (b1, b2);
            }
            i += 2;
        }
        (width, width)
    }

    /// Uncompressed mode, entered after the `0000001 111` extension code.
    fn decode_uncompressed(
        &mut self,
        cursor: &mut BitCursor<'_>,
        out: &mut [u8],
        line: usize,
        bit_offset: &mut usize,
        is_white: &mut bool,
    ) -> Result<()> {
        let width = self.config.width;
        loop {
            let start = cursor.position();
            let mut zeros = 0;
            while cursor.next_bits(1)? == 0 {
                zeros += 1;
                if zeros > MAX_UNCOMPRESSED_ZEROS {
                    return Err(FaxError::InvalidUncompressed { position: start });
                }
            }

            match zeros {
                // n white pixels, then one black
                0..=4 => {
                    if zeros > 0 {
                        self.change_color(true, is_white, *bit_offset);
                        *bit_offset += zeros;
                    }
                    self.change_color(false, is_white, *bit_offset);
                    self.fill_black(out, line, *bit_offset, *bit_offset + 1)?;
                    *bit_offset += 1;
                }
                5 => {
                    self.change_color(true, is_white, *bit_offset);
                    *bit_offset += 5;
                }
                // Exit: n - 6 white pixels, then a bit giving the next color
                _ => {
                    if zeros > 6 {
                        self.change_color(true, is_white, *bit_offset);
                        *bit_offset += zeros - 6;
                    }
                    let white_next = cursor.next_bits(1)? == 0;
                    self.change_color(white_next, is_white, *bit_offset);
                    trace!("fax: left uncompressed mode at pixel {}", bit_offset);
                    return Ok(());
                }
            }

            if *bit_offset > width {
                return Err(FaxError::InvalidUncompressed { position: start });
            }
        }
    }

    fn change_color(&mut self, to_white: bool, is_white: &mut bool, at: usize) {
        if *is_white != to_white {
            self.curr.push(at);
            *is_white = to_white;
        }
    }

    /// Set pixels `from..to` of the row starting at byte `line`.
    fn fill_black(&self, out: &mut [u8], line: usize, from: usize, to: usize) -> Result<()> {
        let to = to.min(self.config.width);
        if from >= to {
            return Ok(());
        }

        let last = line + (to - 1) / 8;
        if last >= out.len() && !self.config.recover {
            return Err(FaxError::BufferTooSmall {
                needed: last + 1,
                available: out.len(),
            });
        }

        let mut bit = from;
        while bit < to {
            let idx = line + bit / 8;
            let Some(byte) = out.get_mut(idx) else {
                break;
            };
            let offset = bit % 8;
            let span = (8 - offset).min(to - bit);
            let mask = ((0xFFu16 << (8 - span)) as u8) >> offset;
            *byte |= mask;
            bit += span;
        }
        Ok(())
    }
}

fn extended_makeup(index: u32, position: usize) -> Result<RunCode> {
    match EXTENDED_MAKEUP_TABLE[index as usize] {
        RunEntry::Code(code) => Ok(code),
        _ => Err(FaxError::InvalidCode { position }),
    }
}

/// Decode one white run, makeup codes included.
fn white_run(cursor: &mut BitCursor<'_>) -> Result<usize> {
    let mut run = 0;
    loop {
        let start = cursor.position();
        let window = cursor.next_bits(10)?;
        let code = match WHITE[window as usize] {
            RunEntry::Code(code) => {
                cursor.rewind(10 - code.bits);
                code
            }
            RunEntry::ExtendedMakeup => {
                // Two prefix-window bits plus two more select the code
                let low = cursor.next_bits(2)?;
                let code = extended_makeup(((window << 2) & 0b1100) | low, start)?;
                cursor.rewind(4 - code.bits);
                code
            }
            RunEntry::EndOfLine => {
                return Err(FaxError::UnexpectedEol {
                    color: "white",
                    position: start,
                });
            }
            _ => return Err(FaxError::InvalidCode { position: start }),
        };

        run += usize::from(code.run);
        if code.terminating {
            return Ok(run);
        }
    }
}

/// Decode one black run, makeup codes included.
fn black_run(cursor: &mut BitCursor<'_>) -> Result<usize> {
    let mut run = 0;
    loop {
        let start = cursor.position();
        let code = match BLACK_INIT[cursor.next_bits(4)? as usize] {
            RunEntry::Code(code) => {
                cursor.rewind(4 - code.bits);
                code
            }
            RunEntry::ShortBlack => match BLACK_SHORT[cursor.next_bits(2)? as usize] {
                RunEntry::Code(code) => {
                    cursor.rewind(2 - code.bits);
                    code
                }
                _ => return Err(FaxError::InvalidCode { position: start }),
            },
            RunEntry::LongBlack => match BLACK_LONG[cursor.next_bits(9)? as usize] {
                RunEntry::Code(code) => {
                    cursor.rewind(9 - code.bits);
                    code
                }
                RunEntry::ExtendedMakeup => {
                    // Back up to just after the 00000001 prefix
                    cursor.rewind(5);
                    let code = extended_makeup(cursor.next_bits(4)?, start)?;
                    cursor.rewind(4 - code.bits);
                    code
                }
                RunEntry::EndOfLine => {
                    return Err(FaxError::UnexpectedEol {
                        color: "black",
                        position: start,
                    });
                }
                _ => return Err(FaxError::InvalidCode { position: start }),
            },
            _ => return Err(FaxError::InvalidCode { position: start }),
        };

        run += usize::from(code.run);
        if code.terminating {
            return Ok(run);
        }
    }
}
