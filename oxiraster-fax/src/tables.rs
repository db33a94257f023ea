//! CCITT T.4/T.6 code tables.
//!
//! The run-length tables are indexed by a fixed-width lookahead window; each
//! entry records how many bits of that window the code actually used, so the
//! decoder reads a whole window and then rewinds the unused bits.
//!
//! - White runs: one 10-bit window.
//! - Black runs: a 4-bit first window, then either a 2-bit window (codes
//!   starting `0001`) or a 9-bit window (codes starting `0000`).
//! - Makeup runs 1792..=2560: a 4-bit window after the shared `00000001`
//!   prefix.
//! - Two-dimensional modes: one 7-bit window.
//!
//! All tables are expanded at compile time from the code words below.

/// A decoded run code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunCode {
    /// Run length in pixels.
    pub run: u16,
    /// Bits of the lookup window used by the code.
    pub bits: u8,
    /// Terminating code (ends the run) rather than a makeup code.
    pub terminating: bool,
}

/// Entry of a run-length lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunEntry {
    /// No code starts with these bits.
    Invalid,
    /// End-of-line code (or the zero fill preceding one).
    EndOfLine,
    /// `00000001` prefix of a makeup code in [`EXTENDED_MAKEUP_TABLE`].
    ExtendedMakeup,
    /// Black code starting `0000`: continue in [`BLACK_LONG`].
    LongBlack,
    /// Black code starting `0001`: continue in [`BLACK_SHORT`].
    ShortBlack,
    /// A complete run code.
    Code(RunCode),
}

/// Two-dimensional coding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Pass,
    Horizontal,
    /// Vertical mode with a1 = b1 + offset.
    Vertical(i8),
    /// Extension code `0000001`.
    Extension,
    Invalid,
}

/// Entry of the two-dimensional mode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModeEntry {
    pub mode: Mode,
    pub bits: u8,
}

/// White terminating codes, indexed by run length 0..=63.
#[rustfmt::skip]
const WHITE_TERMINATING: [(u16, u8); 64] = [
    (0b00110101, 8), (0b000111, 6), (0b0111, 4), (0b1000, 4),
    (0b1011, 4), (0b1100, 4), (0b1110, 4), (0b1111, 4),
    (0b10011, 5), (0b10100, 5), (0b00111, 5), (0b01000, 5),
    (0b001000, 6), (0b000011, 6), (0b110100, 6), (0b110101, 6),
    (0b101010, 6), (0b101011, 6), (0b0100111, 7), (0b0001100, 7),
    (0b0001000, 7), (0b0010111, 7), (0b0000011, 7), (0b0000100, 7),
    (0b0101000, 7), (0b0101011, 7), (0b0010011, 7), (0b0100100, 7),
    (0b0011000, 7), (0b00000010, 8), (0b00000011, 8), (0b00011010, 8),
    (0b00011011, 8), (0b00010010, 8), (0b00010011, 8), (0b00010100, 8),
    (0b00010101, 8), (0b00010110, 8), (0b00010111, 8), (0b00101000, 8),
    (0b00101001, 8), (0b00101010, 8), (0b00101011, 8), (0b00101100, 8),
    (0b00101101, 8), (0b00000100, 8), (0b00000101, 8), (0b00001010, 8),
    (0b00001011, 8), (0b01010010, 8), (0b01010011, 8), (0b01010100, 8),
    (0b01010101, 8), (0b00100100, 8), (0b00100101, 8), (0b01011000, 8),
    (0b01011001, 8), (0b01011010, 8), (0b01011011, 8), (0b01001010, 8),
    (0b01001011, 8), (0b00110010, 8), (0b00110011, 8), (0b00110100, 8),
];

/// White makeup codes for runs 64, 128, ..., 1728.
#[rustfmt::skip]
const WHITE_MAKEUP: [(u16, u8); 27] = [
    (0b11011, 5), (0b10010, 5), (0b010111, 6), (0b0110111, 7),
    (0b00110110, 8), (0b00110111, 8), (0b01100100, 8), (0b01100101, 8),
    (0b01101000, 8), (0b01100111, 8), (0b011001100, 9), (0b011001101, 9),
    (0b011010010, 9), (0b011010011, 9), (0b011010100, 9), (0b011010101, 9),
    (0b011010110, 9), (0b011010111, 9), (0b011011000, 9), (0b011011001, 9),
    (0b011011010, 9), (0b011011011, 9), (0b010011000, 9), (0b010011001, 9),
    (0b010011010, 9), (0b011000, 6), (0b010011011, 9),
];

/// Black terminating codes, indexed by run length 0..=63.
#[rustfmt::skip]
const BLACK_TERMINATING: [(u16, u8); 64] = [
    (0b0000110111, 10), (0b010, 3), (0b11, 2), (0b10, 2),
    (0b011, 3), (0b0011, 4), (0b0010, 4), (0b00011, 5),
    (0b000101, 6), (0b000100, 6), (0b0000100, 7), (0b0000101, 7),
    (0b0000111, 7), (0b00000100, 8), (0b00000111, 8), (0b000011000, 9),
    (0b0000010111, 10), (0b0000011000, 10), (0b0000001000, 10), (0b00001100111, 11),
    (0b00001101000, 11), (0b00001101100, 11), (0b00000110111, 11), (0b00000101000, 11),
    (0b00000010111, 11), (0b00000011000, 11), (0b000011001010, 12), (0b000011001011, 12),
    (0b000011001100, 12), (0b000011001101, 12), (0b000001101000, 12), (0b000001101001, 12),
    (0b000001101010, 12), (0b000001101011, 12), (0b000011010010, 12), (0b000011010011, 12),
    (0b000011010100, 12), (0b000011010101, 12), (0b000011010110, 12), (0b000011010111, 12),
    (0b000001101100, 12), (0b000001101101, 12), (0b000011011010, 12), (0b000011011011, 12),
    (0b000001010100, 12), (0b000001010101, 12), (0b000001010110, 12), (0b000001010111, 12),
    (0b000001100100, 12), (0b000001100101, 12), (0b000001010010, 12), (0b000001010011, 12),
    (0b000000100100, 12), (0b000000110111, 12), (0b000000111000, 12), (0b000000100111, 12),
    (0b000000101000, 12), (0b000001011000, 12), (0b000001011001, 12), (0b000000101011, 12),
    (0b000000101100, 12), (0b000001011010, 12), (0b000001100110, 12), (0b000001100111, 12),
];

/// Black makeup codes for runs 64, 128, ..., 1728.
#[rustfmt::skip]
const BLACK_MAKEUP: [(u16, u8); 27] = [
    (0b0000001111, 10), (0b000011001000, 12), (0b000011001001, 12), (0b000001011011, 12),
    (0b000000110011, 12), (0b000000110100, 12), (0b000000110101, 12), (0b0000001101100, 13),
    (0b0000001101101, 13), (0b0000001001010, 13), (0b0000001001011, 13), (0b0000001001100, 13),
    (0b0000001001101, 13), (0b0000001110010, 13), (0b0000001110011, 13), (0b0000001110100, 13),
    (0b0000001110101, 13), (0b0000001110110, 13), (0b0000001110111, 13), (0b0000001010010, 13),
    (0b0000001010011, 13), (0b0000001010100, 13), (0b0000001010101, 13), (0b0000001011010, 13),
    (0b0000001011011, 13), (0b0000001100100, 13), (0b0000001100101, 13),
];

/// Makeup codes for runs 1792, 1856, ..., 2560 shared by both colors, without
/// their `00000001` prefix.
#[rustfmt::skip]
const EXTENDED_MAKEUP: [(u16, u8); 13] = [
    (0b000, 3), (0b100, 3), (0b101, 3), (0b0010, 4),
    (0b0011, 4), (0b0100, 4), (0b0101, 4), (0b0110, 4),
    (0b0111, 4), (0b1100, 4), (0b1101, 4), (0b1110, 4),
    (0b1111, 4),
];

#[rustfmt::skip]
const MODES: [(u16, u8, Mode); 10] = [
    (0b0001, 4, Mode::Pass),
    (0b001, 3, Mode::Horizontal),
    (0b1, 1, Mode::Vertical(0)),
    (0b011, 3, Mode::Vertical(1)),
    (0b010, 3, Mode::Vertical(-1)),
    (0b000011, 6, Mode::Vertical(2)),
    (0b000010, 6, Mode::Vertical(-2)),
    (0b0000011, 7, Mode::Vertical(3)),
    (0b0000010, 7, Mode::Vertical(-3)),
    (0b0000001, 7, Mode::Extension),
];

/// White runs, 10-bit window.
pub(crate) static WHITE: [RunEntry; 1024] = build_white();

/// Black runs, first 4 bits.
pub(crate) static BLACK_INIT: [RunEntry; 16] = build_black(4, 0, 0);

/// Black runs starting `0001`, next 2 bits.
pub(crate) static BLACK_SHORT: [RunEntry; 4] = build_black(2, 4, 0b0001);

/// Black runs starting `0000`, next 9 bits.
pub(crate) static BLACK_LONG: [RunEntry; 512] = build_black(9, 4, 0b0000);

/// Makeup runs 1792..=2560, 4 bits after the `00000001` prefix.
pub(crate) static EXTENDED_MAKEUP_TABLE: [RunEntry; 16] = build_extended();

/// Two-dimensional modes, 7-bit window.
pub(crate) static MODE_2D: [ModeEntry; 128] = build_modes();

/// Fill every window slot that starts with `code` (of `len` bits).
const fn place<const N: usize>(
    mut table: [RunEntry; N],
    window: u8,
    code: u16,
    len: u8,
    entry: RunEntry,
) -> [RunEntry; N] {
    assert!(len <= window);
    let shift = window - len;
    let start = (code as usize) << shift;
    let end = start + (1usize << shift);
    let mut i = start;
    while i < end {
        table[i] = entry;
        i += 1;
    }
    table
}

const fn run_code(run: usize, bits: u8, terminating: bool) -> RunEntry {
    RunEntry::Code(RunCode {
        run: run as u16,
        bits,
        terminating,
    })
}

const fn build_white() -> [RunEntry; 1024] {
    let mut table = [RunEntry::Invalid; 1024];
    let mut i = 0;
    while i < WHITE_TERMINATING.len() {
        let (code, len) = WHITE_TERMINATING[i];
        table = place(table, 10, code, len, run_code(i, len, true));
        i += 1;
    }
    i = 0;
    while i < WHITE_MAKEUP.len() {
        let (code, len) = WHITE_MAKEUP[i];
        table = place(table, 10, code, len, run_code(64 * (i + 1), len, false));
        i += 1;
    }
    table = place(table, 10, 0b00000001, 8, RunEntry::ExtendedMakeup);
    table[0] = RunEntry::EndOfLine;
    table
}

/// Place the black codes that start with the `skip`-bit `prefix` (all codes
/// when `skip` is 0) and fit in a `window`-bit table after that prefix.
const fn place_black<const N: usize>(
    mut table: [RunEntry; N],
    window: u8,
    skip: u8,
    prefix: u16,
    codes: &[(u16, u8)],
    makeup: bool,
) -> [RunEntry; N] {
    let mut i = 0;
    while i < codes.len() {
        let (code, len) = codes[i];
        let entry = if makeup {
            run_code(64 * (i + 1), 0, false)
        } else {
            run_code(i, 0, true)
        };
        if skip == 0 {
            if len <= window {
                table = place(table, window, code, len, with_bits(entry, len));
            }
        } else if len > skip && (code >> (len - skip)) == prefix {
            let rest = len - skip;
            let suffix = code & ((1u16 << rest) - 1);
            table = place(table, window, suffix, rest, with_bits(entry, rest));
        }
        i += 1;
    }
    table
}

const fn with_bits(entry: RunEntry, bits: u8) -> RunEntry {
    match entry {
        RunEntry::Code(code) => RunEntry::Code(RunCode { bits, ..code }),
        other => other,
    }
}

const fn build_black<const N: usize>(window: u8, skip: u8, prefix: u16) -> [RunEntry; N] {
    let mut table = [RunEntry::Invalid; N];
    table = place_black(table, window, skip, prefix, &BLACK_TERMINATING, false);
    table = place_black(table, window, skip, prefix, &BLACK_MAKEUP, true);
    if skip == 0 {
        // Codes longer than the first window continue in a second table
        table[0b0000] = RunEntry::LongBlack;
        table[0b0001] = RunEntry::ShortBlack;
    } else if prefix == 0b0000 {
        table = place(table, window, 0b0001, 4, RunEntry::ExtendedMakeup);
        table = place(table, window, 0b0000000, 7, RunEntry::EndOfLine);
    }
    table
}

const fn build_extended() -> [RunEntry; 16] {
    let mut table = [RunEntry::Invalid; 16];
    let mut i = 0;
    while i < EXTENDED_MAKEUP.len() {
        let (code, len) = EXTENDED_MAKEUP[i];
        table = place(table, 4, code, len, run_code(1792 + 64 * i, len, false));
        i += 1;
    }
    table
}

const fn build_modes() -> [ModeEntry; 128] {
    let mut table = [ModeEntry {
        mode: Mode::Invalid,
        bits: 0,
    }; 128];
    let mut i = 0;
    while i < MODES.len() {
        let (code, len, mode) = MODES[i];
        let shift = 7 - len;
        let start = (code as usize) << shift;
        let mut j = start;
        while j < start + (1usize << shift) {
            table[j] = ModeEntry { mode, bits: len };
            j += 1;
        }
        i += 1;
    }
    table
}
