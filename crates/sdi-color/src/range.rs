//! Narrow/full range mapping between normalized values and code values.
//!
//! A [`CodeRange`] describes how one channel of an n-bit signal maps the
//! normalized interval [0, 1] onto integer codes.
//!
//! # Conventions
//!
//! Narrow (legal) range scales the 8-bit broadcast values by 2^(n-8):
//!
//! | Bits | Luma / RGB | Chroma | Chroma centre |
//! |------|-----------|--------|---------------|
//! | 8    | 16-235    | 16-240 | 128           |
//! | 10   | 64-940    | 64-960 | 512           |
//! | 12   | 256-3760  | 256-3840 | 2048        |
//!
//! Full range spans [0, 2^n - 1] with the chroma centre at 2^(n-1).
//!
//! # Quantization
//!
//! Rounding is half-up. Inputs outside [0, 1] are clamped before
//! quantization so codes never leave the range. 0.0 always maps to the
//! black code and 1.0 to the white code.
//!
//! Chroma is carried as an offset from 0.5: `code = centre + (c - 0.5) * span`,
//! where `span` is `max - min` for narrow range and `2^n - 1` for full range.
//!
//! # Example
//!
//! ```rust
//! use sdi_color::range::{ChannelKind, CodeRange};
//!
//! let luma = CodeRange::new(10, ChannelKind::Luma, true);
//! assert_eq!(luma.quantize(0.0), 64);
//! assert_eq!(luma.quantize(1.0), 940);
//!
//! let full = CodeRange::new(10, ChannelKind::Rgb, false);
//! assert_eq!(luma.remap(940, &full), 1023);
//! ```

use sdi_core::{Error, Result};

/// Which component a [`CodeRange`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Y' of a Y'CbCr signal
    Luma,
    /// Cb or Cr of a Y'CbCr signal
    Chroma,
    /// R', G' or B' of an RGB signal
    Rgb,
}

/// Handling of normalized inputs outside [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RangePolicy {
    /// Clamp into range. Never fails.
    #[default]
    Clamp,
    /// Reject with [`Error::RangeOutOfBounds`].
    Strict,
}

/// Tolerance applied by [`RangePolicy::Strict`] around [0, 1].
pub const STRICT_TOLERANCE: f32 = 1e-6;

/// Code-value range of one channel at a given bit depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodeRange {
    bits: u32,
    kind: ChannelKind,
    narrow: bool,
    min: f32,
    max: f32,
    center: f32,
    span: f32,
    code_max: f32,
}

impl CodeRange {
    /// Builds the range for `bits` bits per component (8 through 16).
    pub const fn new(bits: u32, kind: ChannelKind, narrow: bool) -> Self {
        let code_max = ((1u32 << bits) - 1) as f32;
        let scale = (1u32 << (bits - 8)) as f32;
        let (min, max, center) = if narrow {
            let max = match kind {
                ChannelKind::Chroma => 240.0,
                ChannelKind::Luma | ChannelKind::Rgb => 235.0,
            };
            (16.0 * scale, max * scale, 128.0 * scale)
        } else {
            (0.0, code_max, (1u32 << (bits - 1)) as f32)
        };
        let span = if narrow { max - min } else { code_max };
        Self {
            bits,
            kind,
            narrow,
            min,
            max,
            center,
            span,
            code_max,
        }
    }

    /// Bit depth.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Channel kind.
    #[inline]
    pub const fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// True for narrow (legal) range.
    #[inline]
    pub const fn is_narrow(&self) -> bool {
        self.narrow
    }

    /// Code of normalized 0.0 (minimum chroma for [`ChannelKind::Chroma`]).
    #[inline]
    pub fn black(&self) -> u16 {
        self.min as u16
    }

    /// Code of normalized 1.0 (maximum chroma for [`ChannelKind::Chroma`]).
    #[inline]
    pub fn white(&self) -> u16 {
        self.max as u16
    }

    /// Chroma zero-point code.
    #[inline]
    pub fn center(&self) -> u16 {
        self.center as u16
    }

    /// Largest representable code, 2^n - 1.
    #[inline]
    pub fn code_max(&self) -> u16 {
        self.code_max as u16
    }

    /// Quantizes a normalized value, clamping out-of-range input.
    ///
    /// NaN maps to the black (or centre, for chroma) code.
    #[inline]
    pub fn quantize(&self, v: f32) -> u16 {
        let v = if v.is_nan() {
            match self.kind {
                ChannelKind::Chroma => 0.5,
                _ => 0.0,
            }
        } else {
            v.clamp(0.0, 1.0)
        };
        let code = match self.kind {
            ChannelKind::Chroma => self.center + (v - 0.5) * self.span,
            ChannelKind::Luma | ChannelKind::Rgb => self.min + v * self.span,
        };
        (code + 0.5).floor().clamp(0.0, self.code_max) as u16
    }

    /// Quantizes under `policy`, naming `channel` in any error.
    #[inline]
    pub fn quantize_checked(&self, v: f32, policy: RangePolicy, channel: &'static str) -> Result<u16> {
        check_unit(v, policy, channel)?;
        Ok(self.quantize(v))
    }

    /// Converts a code back to its normalized value. Not clamped.
    #[inline]
    pub fn normalize(&self, code: u16) -> f32 {
        match self.kind {
            ChannelKind::Chroma => 0.5 + (code as f32 - self.center) / self.span,
            ChannelKind::Luma | ChannelKind::Rgb => (code as f32 - self.min) / self.span,
        }
    }

    /// Re-expresses `code` from this range in `to`.
    ///
    /// Narrow to full and back recovers the original code within one unit.
    #[inline]
    pub fn remap(&self, code: u16, to: &CodeRange) -> u16 {
        to.quantize(self.normalize(code))
    }
}

/// Validates a normalized value against [0, 1] under `policy`.
#[inline]
pub fn check_unit(v: f32, policy: RangePolicy, channel: &'static str) -> Result<()> {
    if policy == RangePolicy::Strict
        && (v.is_nan() || v < -STRICT_TOLERANCE || v > 1.0 + STRICT_TOLERANCE)
    {
        return Err(Error::RangeOutOfBounds { value: v, channel });
    }
    Ok(())
}

/// Luma and chroma ranges of a Y'CbCr signal at one bit depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YcbcrRange {
    /// Y' range
    pub luma: CodeRange,
    /// Cb/Cr range
    pub chroma: CodeRange,
}

impl YcbcrRange {
    /// Builds both ranges for `bits` bits per component.
    pub const fn new(bits: u32, narrow: bool) -> Self {
        Self {
            luma: CodeRange::new(bits, ChannelKind::Luma, narrow),
            chroma: CodeRange::new(bits, ChannelKind::Chroma, narrow),
        }
    }

    /// Quantizes a normalized [Y', Cb, Cr] triple.
    #[inline]
    pub fn quantize(&self, ycbcr: [f32; 3]) -> [u16; 3] {
        [
            self.luma.quantize(ycbcr[0]),
            self.chroma.quantize(ycbcr[1]),
            self.chroma.quantize(ycbcr[2]),
        ]
    }

    /// Normalizes a [Y', Cb, Cr] code triple.
    #[inline]
    pub fn normalize(&self, codes: [u16; 3]) -> [f32; 3] {
        [
            self.luma.normalize(codes[0]),
            self.chroma.normalize(codes[1]),
            self.chroma.normalize(codes[2]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_narrow_reference_codes() {
        let cases = [
            (8, ChannelKind::Luma, 16, 235),
            (8, ChannelKind::Chroma, 16, 240),
            (10, ChannelKind::Luma, 64, 940),
            (10, ChannelKind::Chroma, 64, 960),
            (10, ChannelKind::Rgb, 64, 940),
            (12, ChannelKind::Rgb, 256, 3760),
        ];
        for (bits, kind, black, white) in cases {
            let r = CodeRange::new(bits, kind, true);
            assert_eq!(r.quantize(0.0), black, "{bits}-bit {kind:?} black");
            assert_eq!(r.quantize(1.0), white, "{bits}-bit {kind:?} white");
        }
        assert_eq!(CodeRange::new(10, ChannelKind::Chroma, true).quantize(0.5), 512);
        assert_eq!(CodeRange::new(8, ChannelKind::Chroma, true).quantize(0.5), 128);
    }

    #[test]
    fn test_full_range_extremes() {
        for (bits, max) in [(8, 255), (10, 1023), (12, 4095)] {
            let r = CodeRange::new(bits, ChannelKind::Rgb, false);
            assert_eq!(r.quantize(0.0), 0);
            assert_eq!(r.quantize(1.0), max);
            assert_eq!(r.code_max(), max);
        }
        let c = CodeRange::new(10, ChannelKind::Chroma, false);
        assert_eq!(c.quantize(0.5), 512);
        assert_eq!(c.quantize(1.0), 1023);
    }

    #[test]
    fn test_clamping() {
        let r = CodeRange::new(10, ChannelKind::Luma, true);
        assert_eq!(r.quantize(-0.5), 64);
        assert_eq!(r.quantize(1.5), 940);
        assert_eq!(r.quantize(f32::NAN), 64);
        assert_eq!(CodeRange::new(10, ChannelKind::Chroma, true).quantize(f32::NAN), 512);
    }

    #[test]
    fn test_round_half_up() {
        let r = CodeRange::new(8, ChannelKind::Rgb, false);
        // 0.5 * 255 = 127.5 rounds up
        assert_eq!(r.quantize(0.5), 128);
        assert_eq!(r.quantize(127.4 / 255.0), 127);
    }

    #[test]
    fn test_normalize_inverse() {
        let r = CodeRange::new(10, ChannelKind::Luma, true);
        assert_eq!(r.normalize(64), 0.0);
        assert_eq!(r.normalize(940), 1.0);
        assert!(r.normalize(0) < 0.0);

        let c = CodeRange::new(10, ChannelKind::Chroma, true);
        assert_eq!(c.normalize(512), 0.5);
        assert_relative_eq!(c.normalize(960), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_monotonic() {
        for narrow in [true, false] {
            let r = CodeRange::new(10, ChannelKind::Rgb, narrow);
            let mut prev = 0;
            for i in 0..=2000 {
                let code = r.quantize(i as f32 / 2000.0);
                assert!(code >= prev);
                prev = code;
            }
        }
    }

    #[test]
    fn test_remap_round_trip_within_one_code() {
        for bits in [8, 10, 12] {
            for kind in [ChannelKind::Luma, ChannelKind::Chroma, ChannelKind::Rgb] {
                let narrow = CodeRange::new(bits, kind, true);
                let full = CodeRange::new(bits, kind, false);
                for code in narrow.black()..=narrow.white() {
                    let back = full.remap(narrow.remap(code, &full), &narrow);
                    assert!(
                        (back as i32 - code as i32).abs() <= 1,
                        "{bits}-bit {kind:?}: {code} -> {back}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_narrow_white_to_full() {
        let narrow = CodeRange::new(10, ChannelKind::Rgb, true);
        let full = CodeRange::new(10, ChannelKind::Rgb, false);
        assert_eq!(narrow.remap(940, &full), 1023);
        assert_eq!(narrow.remap(64, &full), 0);
    }

    #[test]
    fn test_strict_policy() {
        let r = CodeRange::new(10, ChannelKind::Rgb, false);
        assert_eq!(r.quantize_checked(1.2, RangePolicy::Clamp, "R").unwrap(), 1023);

        let err = r.quantize_checked(1.2, RangePolicy::Strict, "R").unwrap_err();
        assert!(matches!(err, Error::RangeOutOfBounds { channel: "R", .. }));
        assert!(r.quantize_checked(f32::NAN, RangePolicy::Strict, "G").is_err());
        assert!(r.quantize_checked(1.0 + 1e-7, RangePolicy::Strict, "B").is_ok());
    }

    #[test]
    fn test_ycbcr_range() {
        let r = YcbcrRange::new(10, true);
        assert_eq!(r.quantize([0.0, 0.5, 0.5]), [64, 512, 512]);
        assert_eq!(r.quantize([1.0, 0.5, 0.5]), [940, 512, 512]);
        assert_eq!(r.normalize([64, 512, 512]), [0.0, 0.5, 0.5]);
    }
}
