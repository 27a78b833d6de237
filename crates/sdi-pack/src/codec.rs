//! Row codec trait shared by every wire format.
//!
//! A codec packs one row of integer code triples into wire bytes and back.
//! Triples are `[R, G, B]` for RGB formats and `[Y', Cb, Cr]` for Y'CbCr
//! formats, already quantized to the format's bit depth.
//!
//! # Padding
//!
//! Rows whose width is not a multiple of the group size are padded to a
//! whole group. Padding slots repeat the last real pixel of the row, so a
//! padded 4:2:2 chroma pair never averages against black. Decoders read
//! only the real pixels and ignore padding.

use sdi_core::WireFormat;

/// One pixel's code values.
pub type Triple = [u16; 3];

/// Packs and unpacks rows of one wire format.
///
/// `pack_row` pulls pixels from `src(x)` for `x` in `0..width` and writes
/// exactly `FORMAT.row_bytes(width)` bytes. `unpack_row` pushes each real
/// pixel to `sink(x, triple)` in order.
pub trait Codec {
    /// Format this codec implements.
    const FORMAT: WireFormat;

    /// Packs one row. `dst.len()` must equal the row size.
    fn pack_row(width: usize, src: impl FnMut(usize) -> Triple, dst: &mut [u8]);

    /// Unpacks one row. `src.len()` must equal the row size.
    fn unpack_row(src: &[u8], width: usize, sink: impl FnMut(usize, Triple));
}

/// Fetches the `N` pixels of the group starting at `base`, repeating the
/// last real pixel for slots past `width`.
#[inline]
pub(crate) fn gather<const N: usize>(
    base: usize,
    width: usize,
    src: &mut impl FnMut(usize) -> Triple,
) -> [Triple; N] {
    let last = width - 1;
    let mut out = [[0u16; 3]; N];
    let mut prev = None;
    for (i, slot) in out.iter_mut().enumerate() {
        let x = (base + i).min(last);
        *slot = match prev {
            Some((px, t)) if px == x => t,
            _ => src(x),
        };
        prev = Some((x, *slot));
    }
    out
}

/// Averages two codes, rounding half up.
#[inline]
pub(crate) fn avg(a: u16, b: u16) -> u16 {
    ((a as u32 + b as u32 + 1) >> 1) as u16
}

#[inline]
pub(crate) fn read_u32(src: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([src[offset], src[offset + 1], src[offset + 2], src[offset + 3]])
}

#[inline]
pub(crate) fn write_u32(dst: &mut [u8], offset: usize, word: u32) {
    dst[offset..offset + 4].copy_from_slice(&word.to_le_bytes());
}
