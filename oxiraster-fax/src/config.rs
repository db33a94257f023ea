//! Fax decoder configuration.

use crate::error::{FaxError, Result};
use oxiraster_core::FillOrder;

/// Geometry and behavior of a fax decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaxConfig {
    /// Pixels per row.
    pub width: usize,
    /// Rows in the image.
    pub height: usize,
    /// Bit order of the compressed input.
    pub fill_order: FillOrder,
    /// Keep going on damaged input: stop at the end of the data instead of
    /// failing, clamp out-of-bounds writes, accept a short output buffer.
    pub recover: bool,
}

impl FaxConfig {
    /// Configuration for an MSB-first image of `width` x `height` pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            fill_order: FillOrder::MsbFirst,
            recover: false,
        }
    }

    /// Set the fill order.
    pub fn with_fill_order(mut self, fill_order: FillOrder) -> Self {
        self.fill_order = fill_order;
        self
    }

    /// Set the fill order from a TIFF FillOrder tag value.
    pub fn with_fill_order_tag(self, tag: u16) -> Result<Self> {
        Ok(self.with_fill_order(FillOrder::try_from(tag)?))
    }

    /// Enable or disable recovery from damaged input.
    pub fn with_recover(mut self, recover: bool) -> Self {
        self.recover = recover;
        self
    }

    /// Bytes per packed output row.
    pub fn row_bytes(&self) -> usize {
        self.width.div_ceil(8)
    }

    /// Bytes for the whole image.
    pub fn image_bytes(&self) -> usize {
        self.row_bytes().saturating_mul(self.height)
    }

    /// Check the geometry.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(FaxError::InvalidGeometry("width must be non-zero"));
        }
        if self.width > u32::MAX as usize {
            return Err(FaxError::InvalidGeometry("width too large"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_bytes() {
        assert_eq!(FaxConfig::new(1, 1).row_bytes(), 1);
        assert_eq!(FaxConfig::new(8, 1).row_bytes(), 1);
        assert_eq!(FaxConfig::new(9, 1).row_bytes(), 2);
        assert_eq!(FaxConfig::new(1728, 10).image_bytes(), 2160);
    }

    #[test]
    fn test_builders() {
        let config = FaxConfig::new(16, 2)
            .with_fill_order(FillOrder::LsbFirst)
            .with_recover(true);
        assert_eq!(config.fill_order, FillOrder::LsbFirst);
        assert!(config.recover);

        let config = FaxConfig::new(16, 2).with_fill_order_tag(2).unwrap();
        assert_eq!(config.fill_order, FillOrder::LsbFirst);
        assert!(matches!(
            FaxConfig::new(16, 2).with_fill_order_tag(7),
            Err(FaxError::Core(_))
        ));
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(FaxConfig::new(0, 1).validate().is_err());
        assert!(FaxConfig::new(1, 0).validate().is_ok());
    }
}
