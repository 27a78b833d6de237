//! 10-bit 4:2:2 Y'CbCr (`v210`).
//!
//! Six pixels (six Y', three Cb, three Cr) pack into four little-endian
//! 32-bit words, 16 bytes. Each word holds three 10-bit fields at bits
//! [9:0], [19:10] and [29:20]; bits 31:30 are zero.
//!
//! ```text
//! word 0:  Cb0 | Y0 << 10 | Cr0 << 20
//! word 1:  Y1  | Cb1 << 10 | Y2 << 20
//! word 2:  Cr1 | Y3 << 10 | Cb2 << 20
//! word 3:  Y4  | Cr2 << 10 | Y5 << 20
//! ```
//!
//! Chroma pair k is shared by pixels 2k and 2k+1. As with 2vuy, the
//! encoder averages each pair and the decoder duplicates it, which is
//! lossy. Rows are padded to a multiple of six pixels by repeating the
//! last real pixel.

use crate::codec::{Codec, Triple, avg, gather, read_u32, write_u32};
use sdi_core::WireFormat;

const MASK: u32 = 0x3FF;

/// v210 codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct V210;

/// Packs one group of six subsampled pixels.
#[inline]
pub fn pack_group(y: [u16; 6], cb: [u16; 3], cr: [u16; 3]) -> [u32; 4] {
    let f = |v: u16| v as u32 & MASK;
    [
        f(cb[0]) | f(y[0]) << 10 | f(cr[0]) << 20,
        f(y[1]) | f(cb[1]) << 10 | f(y[2]) << 20,
        f(cr[1]) | f(y[3]) << 10 | f(cb[2]) << 20,
        f(y[4]) | f(cr[2]) << 10 | f(y[5]) << 20,
    ]
}

/// Unpacks one group into (Y', Cb, Cr) sample arrays.
#[inline]
pub fn unpack_group(w: [u32; 4]) -> ([u16; 6], [u16; 3], [u16; 3]) {
    let f = |word: u32, shift: u32| ((word >> shift) & MASK) as u16;
    let y = [
        f(w[0], 10),
        f(w[1], 0),
        f(w[1], 20),
        f(w[2], 10),
        f(w[3], 0),
        f(w[3], 20),
    ];
    let cb = [f(w[0], 0), f(w[1], 10), f(w[2], 20)];
    let cr = [f(w[0], 20), f(w[2], 0), f(w[3], 10)];
    (y, cb, cr)
}

impl Codec for V210 {
    const FORMAT: WireFormat = WireFormat::Yuv10;

    fn pack_row(width: usize, mut src: impl FnMut(usize) -> Triple, dst: &mut [u8]) {
        debug_assert_eq!(dst.len(), width.div_ceil(6) * 16);
        for (g, out) in dst.chunks_exact_mut(16).enumerate() {
            let px = gather::<6>(g * 6, width, &mut src);
            let y = px.map(|p| p[0]);
            let cb = [0, 1, 2].map(|k| avg(px[2 * k][1], px[2 * k + 1][1]));
            let cr = [0, 1, 2].map(|k| avg(px[2 * k][2], px[2 * k + 1][2]));
            for (i, word) in pack_group(y, cb, cr).into_iter().enumerate() {
                write_u32(out, i * 4, word);
            }
        }
    }

    fn unpack_row(src: &[u8], width: usize, mut sink: impl FnMut(usize, Triple)) {
        debug_assert_eq!(src.len(), width.div_ceil(6) * 16);
        for (g, grp) in src.chunks_exact(16).enumerate() {
            let words = [0, 1, 2, 3].map(|i| read_u32(grp, i * 4));
            let (y, cb, cr) = unpack_group(words);
            let base = g * 6;
            for i in 0..6 {
                if base + i >= width {
                    break;
                }
                sink(base + i, [y[i], cb[i / 2], cr[i / 2]]);
            }
        }
    }
}
