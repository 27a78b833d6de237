//! 10-bit 4:4:4 RGB (`R10l`).
//!
//! One little-endian 32-bit word per pixel:
//!
//! ```text
//! bits 31:22  R
//! bits 21:12  G
//! bits 11:2   B
//! bits 1:0    zero
//! ```

use crate::codec::{Codec, Triple, read_u32, write_u32};
use sdi_core::WireFormat;

const MASK: u32 = 0x3FF;

/// R10l codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rgb10;

/// Packs one pixel into its word.
#[inline]
pub fn pack_word([r, g, b]: Triple) -> u32 {
    (r as u32 & MASK) << 22 | (g as u32 & MASK) << 12 | (b as u32 & MASK) << 2
}

/// Unpacks one word.
#[inline]
pub fn unpack_word(word: u32) -> Triple {
    [
        ((word >> 22) & MASK) as u16,
        ((word >> 12) & MASK) as u16,
        ((word >> 2) & MASK) as u16,
    ]
}

impl Codec for Rgb10 {
    const FORMAT: WireFormat = WireFormat::Rgb10;

    fn pack_row(width: usize, mut src: impl FnMut(usize) -> Triple, dst: &mut [u8]) {
        debug_assert_eq!(dst.len(), width * 4);
        for x in 0..width {
            write_u32(dst, x * 4, pack_word(src(x)));
        }
    }

    fn unpack_row(src: &[u8], width: usize, mut sink: impl FnMut(usize, Triple)) {
        debug_assert_eq!(src.len(), width * 4);
        for x in 0..width {
            sink(x, unpack_word(read_u32(src, x * 4)));
        }
    }
}
