//! Integration tests for oxiraster-fax.

use oxiraster_core::{BitPacker, FLIP_TABLE, PackOrder};
use oxiraster_fax::{
    FaxConfig, FaxDecoder, FaxError, FillOrder, T4Options, T6Options, decode_g3_1d,
    decode_g3_2d, decode_g4,
};

/// Bit string builder for hand-coded strips.
struct Strip {
    packer: BitPacker<Vec<u8>>,
}

impl Strip {
    fn new() -> Self {
        Self {
            packer: BitPacker::new(Vec::new(), PackOrder::Msb),
        }
    }

    /// Append code words written as '0'/'1' strings; whitespace is ignored.
    fn bits(mut self, code: &str) -> Self {
        for c in code.chars().filter(|c| !c.is_whitespace()) {
            self.packer.write_bits(u32::from(c == '1'), 1).unwrap();
        }
        self
    }

    /// Zero bits up to the next byte boundary.
    fn pad(mut self) -> Self {
        while self.packer.bits_written() % 8 != 0 {
            self.packer.write_bits(0, 1).unwrap();
        }
        self
    }

    fn finish(self) -> Vec<u8> {
        self.packer.into_inner().unwrap()
    }
}

// Code words used below
const EOL: &str = "000000000001";
const PASS: &str = "0001";
const HORIZONTAL: &str = "001";
const V0: &str = "1";
const WHITE_0: &str = "00110101";
const WHITE_8: &str = "10011";
const WHITE_36: &str = "00010101";
const WHITE_MAKEUP_64: &str = "11011";
const WHITE_MAKEUP_1728: &str = "010011011";
const BLACK_8: &str = "000101";
const BLACK_MAKEUP_192: &str = "000011001001";

fn is_black(row: &[u8], x: usize) -> bool {
    row[x / 8] & (0x80 >> (x % 8)) != 0
}

#[test]
fn test_mh_all_white_row() {
    let data = Strip::new().bits(WHITE_8).finish();
    let image = decode_g3_1d(&data, FaxConfig::new(8, 1)).unwrap();
    assert_eq!(image, vec![0x00]);
}

#[test]
fn test_mh_single_transition() {
    // White 3, black 5
    let data = Strip::new().bits("1000").bits("0011").finish();
    let image = decode_g3_1d(&data, FaxConfig::new(8, 1)).unwrap();
    assert_eq!(image, vec![0b0001_1111]);
}

#[test]
fn test_mh_fax_width_rows() {
    // Row 1 all white; row 2 white 100, black 200, white rest
    let data = Strip::new()
        .bits(WHITE_MAKEUP_1728)
        .bits(WHITE_0)
        .pad()
        .bits(WHITE_MAKEUP_64)
        .bits(WHITE_36)
        .bits(BLACK_MAKEUP_192)
        .bits(BLACK_8)
        .bits(WHITE_MAKEUP_1728)
        .bits(WHITE_0)
        .pad()
        .finish();

    // The last white run overshoots the row; it is cut at the width
    let config = FaxConfig::new(1728, 2);
    let image = decode_g3_1d(&data, config).unwrap();
    let (row1, row2) = image.split_at(config.row_bytes());
    assert!(row1.iter().all(|&b| b == 0));
    for x in 0..1728 {
        assert_eq!(is_black(row2, x), (100..300).contains(&x), "pixel {x}");
    }
}

#[test]
fn test_g4_repeated_rows() {
    // Row 1: H(white 100, black 200), V0; rows 2..: V0 V0 V0
    let rows = 50;
    let mut strip = Strip::new()
        .bits(HORIZONTAL)
        .bits(WHITE_MAKEUP_64)
        .bits(WHITE_36)
        .bits(BLACK_MAKEUP_192)
        .bits(BLACK_8)
        .bits(V0);
    for _ in 1..rows {
        strip = strip.bits(V0).bits(V0).bits(V0);
    }
    let data = strip.finish();

    let config = FaxConfig::new(1728, rows);
    let image = decode_g4(&data, config, T6Options::empty()).unwrap();
    for row in image.chunks_exact(config.row_bytes()) {
        assert!(!is_black(row, 99));
        assert!(is_black(row, 100));
        assert!(is_black(row, 299));
        assert!(!is_black(row, 300));
        assert_eq!(row.iter().map(|b| b.count_ones()).sum::<u32>(), 200);
    }
}

#[test]
fn test_g4_identical_lines() {
    // H(white 2, black 3), V0; then two rows copied with V0
    let data = Strip::new()
        .bits(HORIZONTAL)
        .bits("0111 10")
        .bits(V0)
        .bits("111 111")
        .finish();
    let image = decode_g4(&data, FaxConfig::new(8, 3), T6Options::empty()).unwrap();
    assert_eq!(image, vec![0b0011_1000; 3]);
}

#[test]
fn test_g4_all_white_via_pass() {
    let data = Strip::new().bits(PASS).bits(PASS).bits(PASS).finish();
    let image = decode_g4(&data, FaxConfig::new(8, 3), T6Options::empty()).unwrap();
    assert_eq!(image, vec![0; 3]);
}

#[test]
fn test_g4_eofb_leaves_rows_blank() {
    let data = Strip::new()
        .bits(HORIZONTAL)
        .bits("0111 10")
        .bits(V0)
        .bits(EOL)
        .bits(EOL)
        .finish();
    let mut out = vec![0u8; 4];
    let mut decoder = FaxDecoder::new(FaxConfig::new(8, 4)).unwrap();
    let rows = decoder
        .decode_t6(&mut out, &data, 0, 4, T6Options::empty())
        .unwrap();
    assert_eq!(rows, 4);
    assert_eq!(out, vec![0b0011_1000, 0, 0, 0]);
}

#[test]
fn test_g4_truncated_with_and_without_recover() {
    let data = [0b0001_0001];
    let mut out = vec![0u8; 4];

    let mut strict = FaxDecoder::new(FaxConfig::new(8, 4)).unwrap();
    assert!(matches!(
        strict.decode_t6(&mut out, &data, 0, 4, T6Options::empty()),
        Err(FaxError::Truncated { .. })
    ));

    let mut lenient = FaxDecoder::new(FaxConfig::new(8, 4).with_recover(true)).unwrap();
    assert_eq!(
        lenient
            .decode_t6(&mut out, &data, 0, 4, T6Options::empty())
            .unwrap(),
        2
    );
}

#[test]
fn test_fill_order_symmetry() {
    let msb = Strip::new()
        .bits(HORIZONTAL)
        .bits("0111 10")
        .bits(V0)
        .bits("011 000011 1")
        .finish();
    let lsb: Vec<u8> = msb.iter().map(|&b| FLIP_TABLE[b as usize]).collect();

    let expected = decode_g4(&msb, FaxConfig::new(8, 2), T6Options::empty()).unwrap();
    assert_eq!(expected, vec![0b0011_1000, 0b0001_1110]);

    let config = FaxConfig::new(8, 2).with_fill_order(FillOrder::LsbFirst);
    assert_eq!(decode_g4(&lsb, config, T6Options::empty()).unwrap(), expected);

    let config = FaxConfig::new(8, 2).with_fill_order_tag(2).unwrap();
    assert_eq!(decode_g4(&lsb, config, T6Options::empty()).unwrap(), expected);
}

#[test]
fn test_g3_2d_mixed_rows() {
    // 1D row, then a 2D row copying it, then a 1D all-white row
    let data = Strip::new()
        .bits(EOL)
        .bits("1")
        .bits("0111 10 1000")
        .bits(EOL)
        .bits("0")
        .bits("111")
        .bits(EOL)
        .bits("1")
        .bits(WHITE_8)
        .finish();
    let image = decode_g3_2d(&data, FaxConfig::new(8, 3), T4Options::TWO_DIMENSIONAL).unwrap();
    assert_eq!(image, vec![0b0011_1000, 0b0011_1000, 0]);
}

#[test]
fn test_g3_fill_bits_declared_and_detected() {
    // Every EOL padded so that it ends on a byte boundary
    let data = Strip::new()
        .bits("0000")
        .bits(EOL)
        .bits("1")
        .bits("0111 10 1000")
        .pad()
        .bits("0000")
        .bits(EOL)
        .bits("0")
        .bits("111")
        .finish();
    let expected = vec![0b0011_1000; 2];

    let declared = T4Options::TWO_DIMENSIONAL | T4Options::FILL_BITS;
    assert_eq!(
        decode_g3_2d(&data, FaxConfig::new(8, 2), declared).unwrap(),
        expected
    );
    assert_eq!(
        decode_g3_2d(&data, FaxConfig::new(8, 2), T4Options::TWO_DIMENSIONAL).unwrap(),
        expected
    );
}

#[test]
fn test_g3_first_row_must_be_1d() {
    let data = Strip::new().bits(EOL).bits("0").bits("111").finish();
    assert!(matches!(
        decode_g3_2d(&data, FaxConfig::new(8, 1), T4Options::TWO_DIMENSIONAL),
        Err(FaxError::FirstLineNotOneDimensional)
    ));
}

#[test]
fn test_g3_uncompressed_mode() {
    // 1D row, then a 2D row in uncompressed mode: B W B, WWWWW, exit (white)
    let data = Strip::new()
        .bits(EOL)
        .bits("1")
        .bits(WHITE_8)
        .bits(EOL)
        .bits("0")
        .bits("0000001 111")
        .bits("1 01 000001")
        .bits("0000001 0")
        .finish();
    let options = T4Options::TWO_DIMENSIONAL | T4Options::UNCOMPRESSED;
    let image = decode_g3_2d(&data, FaxConfig::new(8, 2), options).unwrap();
    assert_eq!(image, vec![0, 0b1010_0000]);

    // Group 3 rejects the extension code when uncompressed mode is off
    assert!(matches!(
        decode_g3_2d(&data, FaxConfig::new(8, 2), T4Options::TWO_DIMENSIONAL),
        Err(FaxError::InvalidMode { .. })
    ));
}

#[test]
fn test_decoder_reuse() {
    let first = Strip::new()
        .bits(HORIZONTAL)
        .bits("0111 10")
        .bits(V0)
        .finish();
    let second = Strip::new().bits(PASS).finish();

    let mut decoder = FaxDecoder::new(FaxConfig::new(8, 1)).unwrap();
    let mut out = [0u8; 1];
    decoder
        .decode_t6(&mut out, &first, 0, 1, T6Options::empty())
        .unwrap();
    assert_eq!(out, [0b0011_1000]);

    // The reference row starts over as all white
    let mut out = [0u8; 1];
    decoder
        .decode_t6(&mut out, &second, 0, 1, T6Options::empty())
        .unwrap();
    assert_eq!(out, [0]);
}
