//! 8-bit 4:2:2 Y'CbCr (`2vuy`).
//!
//! Two pixels share one chroma pair in 4 bytes: Cb, Y0, Cr, Y1.
//!
//! Chroma decimation is lossy by construction: the encoder averages the
//! Cb and Cr codes of each horizontal pixel pair (rounding half up) and
//! the decoder assigns the shared pair to both pixels. A round trip
//! reproduces luma exactly and chroma only where neighbours agree.

use crate::codec::{Codec, Triple, avg, gather};
use sdi_core::WireFormat;

/// 2vuy codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yuv8;

impl Codec for Yuv8 {
    const FORMAT: WireFormat = WireFormat::Yuv8;

    fn pack_row(width: usize, mut src: impl FnMut(usize) -> Triple, dst: &mut [u8]) {
        debug_assert_eq!(dst.len(), width.div_ceil(2) * 4);
        for (g, out) in dst.chunks_exact_mut(4).enumerate() {
            let [p0, p1] = gather::<2>(g * 2, width, &mut src);
            out[0] = avg(p0[1], p1[1]) as u8;
            out[1] = p0[0] as u8;
            out[2] = avg(p0[2], p1[2]) as u8;
            out[3] = p1[0] as u8;
        }
    }

    fn unpack_row(src: &[u8], width: usize, mut sink: impl FnMut(usize, Triple)) {
        debug_assert_eq!(src.len(), width.div_ceil(2) * 4);
        for (g, grp) in src.chunks_exact(4).enumerate() {
            let cb = grp[0] as u16;
            let cr = grp[2] as u16;
            let x = g * 2;
            sink(x, [grp[1] as u16, cb, cr]);
            if x + 1 < width {
                sink(x + 1, [grp[3] as u16, cb, cr]);
            }
        }
    }
}
