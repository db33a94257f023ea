//! T4Options / T6Options flag words (TIFF tags 292 and 293).

use bitflags::bitflags;

bitflags! {
    /// Group 3 options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct T4Options: u32 {
        /// Lines may be coded two-dimensionally; each EOL is followed by a
        /// 1D/2D tag bit.
        const TWO_DIMENSIONAL = 1 << 0;
        /// Uncompressed mode may appear.
        const UNCOMPRESSED = 1 << 1;
        /// Fill bits pad each EOL so that it ends on a byte boundary.
        const FILL_BITS = 1 << 2;
    }
}

bitflags! {
    /// Group 4 options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct T6Options: u32 {
        /// Uncompressed mode may appear.
        const UNCOMPRESSED = 1 << 1;
        /// Each line starts on a byte boundary.
        const FILL_BITS = 1 << 2;
    }
}
