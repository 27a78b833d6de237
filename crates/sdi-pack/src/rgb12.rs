//! 12-bit 4:4:4 RGB (`R12L`).
//!
//! Eight pixels pack into nine little-endian 32-bit words, 36 bytes. The
//! 24 fields of a group (R, G, B of pixels 0-7) form a continuous bit
//! stream, least significant bit first, so a field may start near the top
//! of one word and continue at the bottom of the next. [`FIELDS`] lists
//! where each field starts. Padding slots of a partial group repeat the
//! last pixel of the row rather than being zero-filled.

use crate::codec::{Codec, Triple, gather, read_u32, write_u32};
use sdi_core::WireFormat;

const MASK: u32 = 0xFFF;

/// (word, bit shift) of the first bit of each field, indexed by pixel then
/// channel R, G, B. Fields with `shift > 20` spill into the next word.
pub const FIELDS: [[(u8, u8); 3]; 8] = [
    [(0, 0), (0, 12), (0, 24)],
    [(1, 4), (1, 16), (1, 28)],
    [(2, 8), (2, 20), (3, 0)],
    [(3, 12), (3, 24), (4, 4)],
    [(4, 16), (4, 28), (5, 8)],
    [(5, 20), (6, 0), (6, 12)],
    [(6, 24), (7, 4), (7, 16)],
    [(7, 28), (8, 8), (8, 20)],
];

/// R12L codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rgb12;

/// Packs one group of eight pixels.
#[inline]
pub fn pack_group(px: &[Triple; 8]) -> [u32; 9] {
    let mut w = [0u32; 9];
    for (p, fields) in FIELDS.iter().enumerate() {
        for (c, &(word, shift)) in fields.iter().enumerate() {
            let v = px[p][c] as u32 & MASK;
            let (word, shift) = (word as usize, shift as u32);
            w[word] |= v << shift;
            if shift > 20 {
                w[word + 1] |= v >> (32 - shift);
            }
        }
    }
    w
}

/// Unpacks one group of eight pixels.
#[inline]
pub fn unpack_group(w: &[u32; 9]) -> [Triple; 8] {
    let mut px = [[0u16; 3]; 8];
    for (p, fields) in FIELDS.iter().enumerate() {
        for (c, &(word, shift)) in fields.iter().enumerate() {
            let (word, shift) = (word as usize, shift as u32);
            let mut v = w[word] >> shift;
            if shift > 20 {
                v |= w[word + 1] << (32 - shift);
            }
            px[p][c] = (v & MASK) as u16;
        }
    }
    px
}

impl Codec for Rgb12 {
    const FORMAT: WireFormat = WireFormat::Rgb12;

    fn pack_row(width: usize, mut src: impl FnMut(usize) -> Triple, dst: &mut [u8]) {
        debug_assert_eq!(dst.len(), width.div_ceil(8) * 36);
        for (g, out) in dst.chunks_exact_mut(36).enumerate() {
            let px = gather::<8>(g * 8, width, &mut src);
            for (i, word) in pack_group(&px).into_iter().enumerate() {
                write_u32(out, i * 4, word);
            }
        }
    }

    fn unpack_row(src: &[u8], width: usize, mut sink: impl FnMut(usize, Triple)) {
        debug_assert_eq!(src.len(), width.div_ceil(8) * 36);
        for (g, grp) in src.chunks_exact(36).enumerate() {
            let mut words = [0u32; 9];
            for (i, w) in words.iter_mut().enumerate() {
                *w = read_u32(grp, i * 4);
            }
            let base = g * 8;
            for (i, t) in unpack_group(&words).into_iter().enumerate() {
                if base + i >= width {
                    break;
                }
                sink(base + i, t);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_contiguous_bitstream() {
        for (p, fields) in FIELDS.iter().enumerate() {
            for (c, &(word, shift)) in fields.iter().enumerate() {
                let bit = word as usize * 32 + shift as usize;
                assert_eq!(bit, p * 36 + c * 12, "pixel {p} channel {c}");
            }
        }
    }

    #[test]
    fn test_straddling_fields() {
        // blue of pixel 0 splits 8 bits / 4 bits across words 0 and 1
        let mut px = [[0u16; 3]; 8];
        px[0][2] = 0xABC;
        let w = pack_group(&px);
        assert_eq!(w[0], 0xBC00_0000);
        assert_eq!(w[1], 0x0000_000A);

        // green of pixel 4 splits 4 bits / 8 bits across words 4 and 5
        let mut px = [[0u16; 3]; 8];
        px[4][1] = 0xABC;
        let w = pack_group(&px);
        assert_eq!(w[4], 0xC000_0000);
        assert_eq!(w[5], 0x0000_00AB);
    }

    #[test]
    fn test_group_round_trip_distinct_values() {
        let mut px = [[0u16; 3]; 8];
        for (p, t) in px.iter_mut().enumerate() {
            for (c, v) in t.iter_mut().enumerate() {
                *v = (p * 3 + c) as u16 * 157 + 11;
            }
        }
        assert_eq!(unpack_group(&pack_group(&px)), px);
    }

    #[test]
    fn test_full_white_sets_all_bits() {
        let w = pack_group(&[[4095; 3]; 8]);
        assert!(w.iter().all(|&word| word == u32::MAX));
    }

    #[test]
    fn test_partial_group_repeats_last_pixel() {
        let codes = [[100u16, 200, 300], [4000, 2000, 1000], [7, 8, 9]];
        let bytes = crate::encode(WireFormat::Rgb12, &codes, 3, 1).unwrap();
        assert_eq!(bytes.len(), 36);
        let words: [u32; 9] = std::array::from_fn(|i| u32::from_le_bytes(bytes[i * 4..i * 4 + 4].try_into().unwrap()));
        let group = unpack_group(&words);
        assert_eq!(&group[..3], &codes);
        assert!(group[3..].iter().all(|&t| t == [7, 8, 9]));
    }
}
