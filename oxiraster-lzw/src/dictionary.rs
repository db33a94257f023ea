//! Encoder string table.
//!
//! Each entry is a (prefix code, byte) pair; the strings themselves are never
//! materialized. Lookups go through an open-addressed hash of 9973 slots with
//! a fixed probe step, so a table of at most 4096 entries always finds a free
//! slot.

use crate::config::MAX_CODES;

const HASH_SIZE: usize = 9973;
const HASH_STEP: usize = 2039;
const EMPTY: u16 = 0xFFFF;

/// Hashed (prefix, byte) -> code table used by the encoder.
#[derive(Debug)]
pub struct LzwDictionary {
    /// Last byte of each entry.
    suffix: Vec<u8>,
    /// Prefix code of each entry.
    prefix: Vec<u16>,
    /// Hash slots holding codes, or `EMPTY`.
    slots: Vec<u16>,
    /// Symbol size the table was last cleared with.
    code_size: u8,
}

impl LzwDictionary {
    /// Create a table seeded for `code_size`-bit symbols.
    pub fn new(code_size: u8) -> Self {
        let mut dict = Self {
            suffix: Vec::with_capacity(MAX_CODES),
            prefix: Vec::with_capacity(MAX_CODES),
            slots: vec![EMPTY; HASH_SIZE],
            code_size,
        };
        dict.clear();
        dict
    }

    /// Reset to the single-symbol entries plus the two reserved codes.
    pub fn clear(&mut self) {
        self.suffix.clear();
        self.prefix.clear();
        self.slots.fill(EMPTY);

        // Singletons and the clear/EOI placeholders are looked up directly,
        // never through the hash.
        let seeded = (1usize << self.code_size) + 2;
        for code in 0..seeded {
            self.suffix.push(code as u8);
            self.prefix.push(EMPTY);
        }
    }

    /// Number of assigned codes, reserved ones included.
    pub fn len(&self) -> usize {
        self.suffix.len()
    }

    /// Whether no further code can be assigned.
    pub fn is_full(&self) -> bool {
        self.len() >= MAX_CODES
    }

    /// Code for the string `prefix` followed by `byte`, if present.
    pub fn find(&self, prefix: u16, byte: u8) -> Option<u16> {
        let mut slot = hash(prefix, byte);
        loop {
            let code = self.slots[slot];
            if code == EMPTY {
                return None;
            }
            let idx = code as usize;
            if self.prefix[idx] == prefix && self.suffix[idx] == byte {
                return Some(code);
            }
            slot = (slot + HASH_STEP) % HASH_SIZE;
        }
    }

    /// Assign the next code to `prefix` followed by `byte`.
    ///
    /// Returns `None` when all 4096 codes are in use.
    pub fn add(&mut self, prefix: u16, byte: u8) -> Option<u16> {
        if self.is_full() {
            return None;
        }

        let code = self.len() as u16;
        let mut slot = hash(prefix, byte);
        while self.slots[slot] != EMPTY {
            slot = (slot + HASH_STEP) % HASH_SIZE;
        }
        self.slots[slot] = code;
        self.prefix.push(prefix);
        self.suffix.push(byte);
        Some(code)
    }
}

#[inline]
fn hash(prefix: u16, byte: u8) -> usize {
    (((u16::from(byte) << 8) ^ prefix) as usize) % HASH_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_size() {
        let dict = LzwDictionary::new(8);
        assert_eq!(dict.len(), 258);

        let dict = LzwDictionary::new(2);
        assert_eq!(dict.len(), 6);
    }

    #[test]
    fn test_add_and_find() {
        let mut dict = LzwDictionary::new(8);
        assert_eq!(dict.find(b'A' as u16, b'B'), None);

        let ab = dict.add(b'A' as u16, b'B').unwrap();
        assert_eq!(ab, 258);
        assert_eq!(dict.find(b'A' as u16, b'B'), Some(258));

        let abc = dict.add(ab, b'C').unwrap();
        assert_eq!(abc, 259);
        assert_eq!(dict.find(ab, b'C'), Some(259));
        assert_eq!(dict.find(ab, b'D'), None);
    }

    #[test]
    fn test_colliding_entries_are_distinct() {
        let mut dict = LzwDictionary::new(8);
        // Same hash: (0x01 << 8) ^ 0x0100 == (0x00 << 8) ^ 0x0000
        let a = dict.add(0x0100, 0x01).unwrap();
        let b = dict.add(0x0000, 0x00).unwrap();
        assert_eq!(dict.find(0x0100, 0x01), Some(a));
        assert_eq!(dict.find(0x0000, 0x00), Some(b));
    }

    #[test]
    fn test_full_table() {
        let mut dict = LzwDictionary::new(8);
        let mut prefix = 0u16;
        while !dict.is_full() {
            prefix = dict.add(prefix, 7).unwrap();
        }
        assert_eq!(dict.len(), MAX_CODES);
        assert_eq!(prefix, 4095);
        assert_eq!(dict.add(prefix, 7), None);

        dict.clear();
        assert_eq!(dict.len(), 258);
        assert_eq!(dict.find(0, 7), None);
    }
}
