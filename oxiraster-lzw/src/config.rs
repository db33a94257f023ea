//! LZW configuration for different formats (TIFF, GIF).

use crate::error::{LzwError, Result};
use oxiraster_core::PackOrder;

/// Maximum code width in bits.
pub const MAX_BITS: u8 = 12;

/// Maximum number of codes in a table.
pub const MAX_CODES: usize = 1 << MAX_BITS;

/// LZW encoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwConfig {
    /// Symbol size in bits (8 for byte data). Codes start one bit wider.
    pub code_size: u8,
    /// TIFF flavour: MSB-first packing and a code width that grows one code
    /// earlier than GIF. Otherwise GIF: LSB-first packing in sub-blocks.
    pub tiff: bool,
}

impl LzwConfig {
    /// Standard TIFF LZW configuration.
    ///
    /// - MSB-first bit order, unframed
    /// - 9-12 bit codes
    /// - Early code change
    pub const TIFF: Self = Self {
        code_size: 8,
        tiff: true,
    };

    /// Standard GIF LZW configuration for 8-bit images.
    ///
    /// - LSB-first bit order in 255-byte sub-blocks
    /// - 9-12 bit codes
    /// - Standard code change
    pub const GIF: Self = Self {
        code_size: 8,
        tiff: false,
    };

    /// Create a new LZW configuration.
    pub fn new(code_size: u8, tiff: bool) -> Self {
        Self { code_size, tiff }
    }

    /// Check that the symbol size leaves room for the reserved codes.
    pub fn validate(&self) -> Result<()> {
        if !(2..=8).contains(&self.code_size) {
            return Err(LzwError::InvalidCodeSize(self.code_size));
        }
        Ok(())
    }

    /// Get the clear code value (256 for 8-bit symbols).
    pub fn clear_code(&self) -> u16 {
        1 << self.code_size
    }

    /// Get the end-of-information code value (clear_code + 1).
    pub fn eoi_code(&self) -> u16 {
        self.clear_code() + 1
    }

    /// Get the first available code for dictionary entries.
    pub fn first_code(&self) -> u16 {
        self.eoi_code() + 1
    }

    /// Width of the first codes after a clear.
    pub fn min_bits(&self) -> u8 {
        self.code_size + 1
    }

    /// Highest code that may be assigned before the width must grow.
    ///
    /// TIFF readers switch widths one code earlier than GIF readers, so the
    /// TIFF limit is one lower.
    pub fn code_limit(&self, bits: u8) -> u16 {
        let limit = (1u16 << bits) - 1;
        if self.tiff { limit - 1 } else { limit }
    }

    /// Bit packing used for this flavour.
    pub fn pack_order(&self) -> PackOrder {
        if self.tiff {
            PackOrder::Msb
        } else {
            PackOrder::LsbBlocks
        }
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self::TIFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiff_config() {
        let config = LzwConfig::TIFF;
        assert_eq!(config.code_size, 8);
        assert_eq!(config.clear_code(), 256);
        assert_eq!(config.eoi_code(), 257);
        assert_eq!(config.first_code(), 258);
        assert_eq!(config.min_bits(), 9);
        assert_eq!(config.code_limit(9), 510);
        assert_eq!(config.code_limit(12), 4094);
        assert_eq!(config.pack_order(), PackOrder::Msb);
    }

    #[test]
    fn test_gif_config() {
        let config = LzwConfig::GIF;
        assert_eq!(config.clear_code(), 256);
        assert_eq!(config.eoi_code(), 257);
        assert_eq!(config.code_limit(9), 511);
        assert_eq!(config.pack_order(), PackOrder::LsbBlocks);
    }

    #[test]
    fn test_small_code_size() {
        let config = LzwConfig::new(2, false);
        assert!(config.validate().is_ok());
        assert_eq!(config.clear_code(), 4);
        assert_eq!(config.first_code(), 6);
        assert_eq!(config.min_bits(), 3);
    }

    #[test]
    fn test_invalid_code_size() {
        assert!(matches!(
            LzwConfig::new(9, true).validate(),
            Err(LzwError::InvalidCodeSize(9))
        ));
        assert!(LzwConfig::new(1, false).validate().is_err());
    }
}
