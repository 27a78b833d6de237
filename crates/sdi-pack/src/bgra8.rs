//! 8-bit BGRA.
//!
//! One pixel per 4 bytes in the order B, G, R, A. Alpha is always 255 on
//! encode and ignored on decode. Triples are 8-bit `[R, G, B]` codes.

use crate::codec::{Codec, Triple};
use sdi_core::WireFormat;

/// Alpha written for every pixel.
pub const ALPHA: u8 = 0xFF;

/// BGRA8 codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bgra8;

impl Codec for Bgra8 {
    const FORMAT: WireFormat = WireFormat::Bgra8;

    fn pack_row(width: usize, mut src: impl FnMut(usize) -> Triple, dst: &mut [u8]) {
        debug_assert_eq!(dst.len(), width * 4);
        for (x, px) in dst.chunks_exact_mut(4).enumerate() {
            let [r, g, b] = src(x);
            px.copy_from_slice(&[b as u8, g as u8, r as u8, ALPHA]);
        }
    }

    fn unpack_row(src: &[u8], width: usize, mut sink: impl FnMut(usize, Triple)) {
        debug_assert_eq!(src.len(), width * 4);
        for (x, px) in src.chunks_exact(4).enumerate() {
            sink(x, [px[2] as u16, px[1] as u16, px[0] as u16]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order() {
        let mut row = [0u8; 8];
        Bgra8::pack_row(2, |x| if x == 0 { [10, 20, 30] } else { [255, 0, 128] }, &mut row);
        assert_eq!(row, [30, 20, 10, 255, 128, 0, 255, 255]);

        let mut out = Vec::new();
        Bgra8::unpack_row(&row, 2, |_, t| out.push(t));
        assert_eq!(out, vec![[10, 20, 30], [255, 0, 128]]);
    }

    #[test]
    fn test_alpha_ignored_on_decode() {
        let row = [1u8, 2, 3, 0];
        let mut out = None;
        Bgra8::unpack_row(&row, 1, |_, t| out = Some(t));
        assert_eq!(out, Some([3, 2, 1]));
    }
}
