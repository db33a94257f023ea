//! # OxiRaster Core
//!
//! Core components shared by the OxiRaster strip codecs.
//!
//! - [`bitstream`]: Variable-width code packing for encoders
//! - [`fill_order`]: TIFF fill order and the bit-reversal table
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Container readers/writers (TIFF, PDF, ...) - external   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Codec                                                   │
//! │     oxiraster-fax (T.4/T.6), oxiraster-lzw (TIFF LZW)   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Core (this crate)                                       │
//! │     BitPacker, FillOrder, flip table                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxiraster_core::bitstream::{BitPacker, PackOrder};
//!
//! let mut packer = BitPacker::new(Vec::new(), PackOrder::Msb);
//! packer.write_bits(0b101, 3).unwrap();
//! packer.write_bits(0b11001, 5).unwrap();
//! let bytes = packer.into_inner().unwrap();
//! assert_eq!(bytes, vec![0b1011_1001]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod error;
pub mod fill_order;

// Re-exports for convenience
pub use bitstream::{BitPacker, PackOrder};
pub use error::{OxiRasterError, Result};
pub use fill_order::{FLIP_TABLE, FillOrder};
