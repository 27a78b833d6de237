//! Packing across every row width from 1 to 64 pixels.
//!
//! Widths that are not a multiple of the group size must still produce
//! the padded size, and decoding must return exactly the real pixels.

use sdi_core::WireFormat;
use sdi_pack::{Triple, decode, encode};

/// Deterministic pseudo-random codes (64-bit LCG).
fn codes(n: usize, bits: u32, seed: u64) -> Vec<Triple> {
    let mut state = seed;
    let mut next = || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((state >> 33) as u16) & ((1u32 << bits) - 1) as u16
    };
    (0..n).map(|_| [next(), next(), next()]).collect()
}

#[test]
fn padded_sizes_match_formula() {
    for format in WireFormat::ALL {
        for width in 1..=64u32 {
            for height in [1u32, 2, 3] {
                let input = codes((width * height) as usize, format.bit_depth(), 7);
                let bytes = encode(format, &input, width, height).unwrap();
                let groups = (width as usize).div_ceil(format.group_pixels());
                assert_eq!(bytes.len(), groups * format.group_bytes() * height as usize);
                assert_eq!(bytes.len(), format.frame_bytes(width, height));
            }
        }
    }
}

#[test]
fn full_sampling_formats_are_lossless() {
    for format in [WireFormat::Bgra8, WireFormat::Rgb10, WireFormat::Rgb12] {
        for width in 1..=64u32 {
            let input = codes(width as usize * 2, format.bit_depth(), width as u64);
            let bytes = encode(format, &input, width, 2).unwrap();
            let output = decode(format, &bytes, width, 2).unwrap();
            assert_eq!(output, input, "{format} width {width}");
        }
    }
}

#[test]
fn subsampled_formats_keep_luma_and_average_chroma() {
    for format in [WireFormat::Yuv8, WireFormat::Yuv10] {
        for width in 1..=64u32 {
            let input = codes(width as usize, format.bit_depth(), 99 + width as u64);
            let bytes = encode(format, &input, width, 1).unwrap();
            let output = decode(format, &bytes, width, 1).unwrap();
            assert_eq!(output.len(), input.len());

            for (x, (got, want)) in output.iter().zip(&input).enumerate() {
                assert_eq!(got[0], want[0], "{format} width {width} luma at {x}");
                let pair = x & !1;
                let partner = (pair + 1).min(width as usize - 1);
                for c in 1..3 {
                    let sum = input[pair][c] as u32 + input[partner][c] as u32;
                    assert_eq!(got[c] as u32, (sum + 1) / 2, "{format} width {width} chroma at {x}");
                }
            }
        }
    }
}

#[test]
fn padding_repeats_last_pixel() {
    let last: Triple = [700, 300, 800];
    let mut input = codes(7, 10, 3);
    input[6] = last;
    let bytes = encode(WireFormat::Rgb10, &input, 7, 1).unwrap();
    assert_eq!(bytes.len(), 28);

    let bytes = encode(WireFormat::Rgb12, &input, 7, 1).unwrap();
    assert_eq!(bytes.len(), 36);
    let mut words = [0u32; 9];
    for (i, w) in words.iter_mut().enumerate() {
        *w = u32::from_le_bytes(bytes[i * 4..i * 4 + 4].try_into().unwrap());
    }
    assert_eq!(sdi_pack::rgb12::unpack_group(&words)[7], last);

    let bytes = encode(WireFormat::Yuv10, &input, 7, 1).unwrap();
    let words = [0, 1, 2, 3].map(|i| u32::from_le_bytes(bytes[16 + i * 4..20 + i * 4].try_into().unwrap()));
    let (y, cb, cr) = sdi_pack::v210::unpack_group(words);
    assert_eq!(y, [700; 6]);
    assert_eq!(cb, [300; 3]);
    assert_eq!(cr, [800; 3]);
}

#[test]
fn truncated_buffers_are_rejected() {
    for format in WireFormat::ALL {
        let input = codes(13, format.bit_depth(), 1);
        let bytes = encode(format, &input, 13, 1).unwrap();
        assert!(decode(format, &bytes[..bytes.len() - 1], 13, 1).is_err());
        let mut longer = bytes.clone();
        longer.push(0);
        assert!(decode(format, &longer, 13, 1).is_err());
    }
}
