//! # sdi-pack
//!
//! Bit-exact packers and unpackers for broadcast video wire formats.
//!
//! Each format has a stateless row [`Codec`]; this module lifts them to
//! whole frames with size validation.
//!
//! | Codec | Format | Group | Notes |
//! |-------|--------|-------|-------|
//! | [`Bgra8`] | `BGRA` | 1 px / 4 B | alpha fixed at 255 |
//! | [`Yuv8`] | `2vuy` | 2 px / 4 B | chroma averaged per pair |
//! | [`V210`] | `v210` | 6 px / 16 B | chroma averaged per pair |
//! | [`Rgb10`] | `R10l` | 1 px / 4 B | low 2 bits zero |
//! | [`Rgb12`] | `R12L` | 8 px / 36 B | fields straddle words |
//!
//! The frame functions work on integer code triples already quantized to
//! the format's bit depth. Range mapping and colour matrices live in
//! `sdi-color`; `sdi-convert` composes everything.
//!
//! # Usage
//!
//! ```rust
//! use sdi_core::WireFormat;
//!
//! let codes = vec![[940u16, 512, 512]; 7];
//! let bytes = sdi_pack::encode(WireFormat::Yuv10, &codes, 7, 1).unwrap();
//! assert_eq!(bytes.len(), 32);
//!
//! let back = sdi_pack::decode(WireFormat::Yuv10, &bytes, 7, 1).unwrap();
//! assert_eq!(back, codes);
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` - pack and unpack rows on the rayon thread pool
//!
//! # Used By
//!
//! - `sdi-convert` - the frame conversion facade

#![warn(missing_docs)]

pub mod bgra8;
pub mod codec;
pub mod planes;
pub mod rgb10;
pub mod rgb12;
pub mod v210;
pub mod yuv8;

pub use bgra8::Bgra8;
pub use codec::{Codec, Triple};
pub use planes::{CodePlanes, unpack_planes};
pub use rgb10::Rgb10;
pub use rgb12::Rgb12;
pub use v210::V210;
pub use yuv8::Yuv8;

use sdi_core::{Error, Result, WireFormat};
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// ============================================================================
// Validation
// ============================================================================

/// Checks `len` against the exact frame size of `format`.
pub fn check_wire_len(format: WireFormat, width: u32, height: u32, len: usize) -> Result<()> {
    let expected = wire_len(format, width, height)?;
    if len != expected {
        return Err(Error::buffer_size(format, width, height, expected, len));
    }
    Ok(())
}

fn wire_len(format: WireFormat, width: u32, height: u32) -> Result<usize> {
    check_dims(width, height)?;
    format
        .checked_frame_bytes(width, height)
        .ok_or_else(|| Error::invalid_shape(width, height, "frame size overflows"))
}

fn check_dims(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_shape(width, height, "width and height must be non-zero"));
    }
    Ok(())
}

fn check_codes_len(width: u32, height: u32, len: usize) -> Result<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_shape(width, height, "pixel count overflows"))?;
    if len != expected {
        return Err(Error::invalid_shape(
            width,
            height,
            format!("expected {expected} code triples, got {len}"),
        ));
    }
    Ok(())
}

// ============================================================================
// Row-level frame drivers
// ============================================================================

/// Packs a frame row by row, pulling pixels from `src(x, y)`.
///
/// `dst` must hold exactly `format.frame_bytes(width, height)` bytes.
/// With the `parallel` feature rows are packed concurrently, so `src`
/// must be `Sync`.
pub fn pack_frame<F>(format: WireFormat, width: u32, height: u32, dst: &mut [u8], src: F) -> Result<()>
where
    F: Fn(usize, usize) -> Triple + Sync,
{
    check_wire_len(format, width, height, dst.len())?;
    trace!(%format, width, height, "pack_frame");
    match format {
        WireFormat::Bgra8 => pack_rows::<Bgra8, F>(width, dst, &src),
        WireFormat::Yuv8 => pack_rows::<Yuv8, F>(width, dst, &src),
        WireFormat::Yuv10 => pack_rows::<V210, F>(width, dst, &src),
        WireFormat::Rgb10 => pack_rows::<Rgb10, F>(width, dst, &src),
        WireFormat::Rgb12 => pack_rows::<Rgb12, F>(width, dst, &src),
    }
    Ok(())
}

/// Unpacks a frame row by row into `dst`, `N` output values per pixel.
///
/// Each decoded triple goes through `map` and the result is stored at
/// `dst[(y * width + x) * N..]`. `dst` must hold `width * height * N`
/// values.
pub fn unpack_frame<T, F, const N: usize>(
    format: WireFormat,
    width: u32,
    height: u32,
    src: &[u8],
    dst: &mut [T],
    map: F,
) -> Result<()>
where
    T: Copy + Send,
    F: Fn(Triple) -> [T; N] + Sync,
{
    check_wire_len(format, width, height, src.len())?;
    let expected = width as usize * height as usize * N;
    if dst.len() != expected {
        return Err(Error::invalid_shape(
            width,
            height,
            format!("output needs {expected} values, got {}", dst.len()),
        ));
    }
    trace!(%format, width, height, "unpack_frame");
    match format {
        WireFormat::Bgra8 => unpack_rows::<Bgra8, T, F, N>(width, src, dst, &map),
        WireFormat::Yuv8 => unpack_rows::<Yuv8, T, F, N>(width, src, dst, &map),
        WireFormat::Yuv10 => unpack_rows::<V210, T, F, N>(width, src, dst, &map),
        WireFormat::Rgb10 => unpack_rows::<Rgb10, T, F, N>(width, src, dst, &map),
        WireFormat::Rgb12 => unpack_rows::<Rgb12, T, F, N>(width, src, dst, &map),
    }
    Ok(())
}

fn pack_rows<C: Codec, F>(width: u32, dst: &mut [u8], src: &F)
where
    F: Fn(usize, usize) -> Triple + Sync,
{
    let w = width as usize;
    let row_bytes = C::FORMAT.row_bytes(width);
    let pack = |(y, row): (usize, &mut [u8])| C::pack_row(w, |x| src(x, y), row);

    #[cfg(feature = "parallel")]
    dst.par_chunks_mut(row_bytes).enumerate().for_each(pack);

    #[cfg(not(feature = "parallel"))]
    dst.chunks_mut(row_bytes).enumerate().for_each(pack);
}

fn unpack_rows<C: Codec, T, F, const N: usize>(width: u32, src: &[u8], dst: &mut [T], map: &F)
where
    T: Copy + Send,
    F: Fn(Triple) -> [T; N] + Sync,
{
    let w = width as usize;
    let row_bytes = C::FORMAT.row_bytes(width);
    let unpack = |(row_in, row_out): (&[u8], &mut [T])| {
        C::unpack_row(row_in, w, |x, t| {
            row_out[x * N..x * N + N].copy_from_slice(&map(t));
        })
    };

    #[cfg(feature = "parallel")]
    src.par_chunks(row_bytes)
        .zip(dst.par_chunks_mut(w * N))
        .for_each(unpack);

    #[cfg(not(feature = "parallel"))]
    src.chunks(row_bytes).zip(dst.chunks_mut(w * N)).for_each(unpack);
}

// ============================================================================
// Code-triple frame API
// ============================================================================

/// Packs `width * height` code triples into a freshly allocated buffer.
pub fn encode(format: WireFormat, codes: &[Triple], width: u32, height: u32) -> Result<Vec<u8>> {
    check_codes_len(width, height, codes.len())?;
    let mut out = vec![0u8; wire_len(format, width, height)?];
    encode_into(format, codes, width, height, &mut out)?;
    Ok(out)
}

/// Packs code triples into caller storage of the exact frame size.
pub fn encode_into(
    format: WireFormat,
    codes: &[Triple],
    width: u32,
    height: u32,
    dst: &mut [u8],
) -> Result<()> {
    check_dims(width, height)?;
    check_codes_len(width, height, codes.len())?;
    let w = width as usize;
    pack_frame(format, width, height, dst, |x, y| codes[y * w + x])
}

/// Unpacks a wire buffer into `width * height` code triples.
pub fn decode(format: WireFormat, bytes: &[u8], width: u32, height: u32) -> Result<Vec<Triple>> {
    check_wire_len(format, width, height, bytes.len())?;
    let mut out = vec![[0u16; 3]; width as usize * height as usize];
    decode_into(format, bytes, width, height, &mut out)?;
    Ok(out)
}

/// Unpacks a wire buffer into caller storage of `width * height` triples.
pub fn decode_into(
    format: WireFormat,
    bytes: &[u8],
    width: u32,
    height: u32,
    dst: &mut [Triple],
) -> Result<()> {
    check_wire_len(format, width, height, bytes.len())?;
    check_codes_len(width, height, dst.len())?;
    let flat = dst.as_flattened_mut();
    unpack_frame::<u16, _, 3>(format, width, height, bytes, flat, |t| t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversized_geometry_is_an_error() {
        for format in WireFormat::ALL {
            let err = check_wire_len(format, u32::MAX, u32::MAX, 0).unwrap_err();
            assert!(matches!(err, Error::InvalidShape { .. }), "{format}: {err:?}");
            assert!(decode(format, &[], u32::MAX, u32::MAX).is_err());
        }
    }

    #[test]
    fn test_rejects_wrong_buffer_size() {
        let bytes = vec![0u8; 15];
        let err = decode(WireFormat::Yuv10, &bytes, 6, 1).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBufferSize {
                format: WireFormat::Yuv10,
                width: 6,
                height: 1,
                expected: 16,
                actual: 15,
            }
        );

        let codes = vec![[0u16; 3]; 8];
        let mut dst = vec![0u8; 37];
        assert!(matches!(
            encode_into(WireFormat::Rgb12, &codes, 8, 1, &mut dst),
            Err(Error::InvalidBufferSize { expected: 36, .. })
        ));
    }

    #[test]
    fn test_rejects_wrong_code_count() {
        let codes = vec![[0u16; 3]; 5];
        assert!(matches!(
            encode(WireFormat::Rgb10, &codes, 3, 2),
            Err(Error::InvalidShape { .. })
        ));
        assert!(matches!(
            encode(WireFormat::Rgb10, &[], 0, 2),
            Err(Error::InvalidShape { width: 0, .. })
        ));
    }

    #[test]
    fn test_multi_row_layout() {
        let codes: Vec<Triple> = (0..12).map(|i| [i * 80, i * 40, i * 20]).collect();
        let bytes = encode(WireFormat::Rgb10, &codes, 4, 3).unwrap();
        // row 1, pixel 0 is code index 4
        let word = u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        assert_eq!(rgb10::unpack_word(word), [320, 160, 80]);
        assert_eq!(decode(WireFormat::Rgb10, &bytes, 4, 3).unwrap(), codes);
    }

    #[test]
    fn test_unpack_frame_maps_values() {
        let codes = vec![[10u16, 20, 30]; 2];
        let bytes = encode(WireFormat::Bgra8, &codes, 2, 1).unwrap();
        let mut out = vec![0u8; 8];
        unpack_frame(WireFormat::Bgra8, 2, 1, &bytes, &mut out[..], |[r, g, b]| {
            [r as u8, g as u8, b as u8, 255]
        })
        .unwrap();
        assert_eq!(out, vec![10, 20, 30, 255, 10, 20, 30, 255]);
    }
}
