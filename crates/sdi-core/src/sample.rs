//! Application-side sample types.
//!
//! RGB frames handed to the engine hold one of three sample types:
//! 8-bit integer, 16-bit integer (full scale 0-65535) or 32-bit float
//! (nominal 0.0-1.0). The [`Sample`] trait carries the type tag as an
//! associated constant so conversion paths are chosen at compile time.
//!
//! # Range conventions
//!
//! Integer samples may be declared narrow range. Narrow `u8` spans 16-235
//! and narrow `u16` spans 4096-60160 (the 8-bit legal range scaled by 256).
//! Float samples are always full range and ignore the flag.
//!
//! # Example
//!
//! ```
//! use sdi_core::{Sample, SampleType};
//!
//! assert_eq!(<u16 as Sample>::KIND, SampleType::U16);
//! assert_eq!(60160u16.to_unit(true), 1.0);
//! assert_eq!(u8::from_unit(1.0, true), 235);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Runtime tag for a [`Sample`] type.
///
/// Used in error reports and CLI parsing only. Conversion code never
/// branches on it at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SampleType {
    /// 8-bit unsigned integer
    U8,
    /// 16-bit unsigned integer, full scale 0-65535
    U16,
    /// 32-bit float, nominal 0.0-1.0
    F32,
}

impl SampleType {
    /// All sample types.
    pub const ALL: [SampleType; 3] = [SampleType::U8, SampleType::U16, SampleType::F32];

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            SampleType::U8 => "uint8",
            SampleType::U16 => "uint16",
            SampleType::F32 => "float32",
        }
    }

    /// Size of one sample in bytes.
    pub const fn size(self) -> usize {
        match self {
            SampleType::U8 => 1,
            SampleType::U16 => 2,
            SampleType::F32 => 4,
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "u8" | "uint8" | "8" => Ok(SampleType::U8),
            "u16" | "uint16" | "16" => Ok(SampleType::U16),
            "f32" | "float" | "float32" => Ok(SampleType::F32),
            _ => Err(Error::parse("sample type", s)),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for f32 {}
}

/// Sample type of an RGB frame buffer.
///
/// Sealed: implemented for `u8`, `u16` and `f32` only.
///
/// # Methods
///
/// - [`to_unit`](Sample::to_unit) - normalize to [0, 1] under a range flag
/// - [`from_unit`](Sample::from_unit) - quantize from [0, 1], clamping
/// - [`exact_u16`](Sample::exact_u16) - raw value for bit-shift paths
pub trait Sample:
    Copy + Default + PartialEq + PartialOrd + Send + Sync + fmt::Debug + 'static + sealed::Sealed
{
    /// Runtime tag of this type.
    const KIND: SampleType;

    /// Normalizes to [0, 1].
    ///
    /// Integer samples outside the narrow legal range map outside [0, 1].
    /// The result is not clamped.
    fn to_unit(self, narrow: bool) -> f32;

    /// Converts a normalized value into this sample type.
    ///
    /// Integers round half up and clamp to their representable range.
    fn from_unit(v: f32, narrow: bool) -> Self;

    /// Raw 16-bit value for types that have one.
    #[inline]
    fn exact_u16(self) -> Option<u16> {
        None
    }
}

/// Narrow-range black for 16-bit samples.
pub const U16_NARROW_BLACK: u16 = 16 << 8;
/// Narrow-range white for 16-bit samples.
pub const U16_NARROW_WHITE: u16 = 235 << 8;
/// Narrow-range black for 8-bit samples.
pub const U8_NARROW_BLACK: u8 = 16;
/// Narrow-range white for 8-bit samples.
pub const U8_NARROW_WHITE: u8 = 235;

#[inline]
fn quantize(v: f32, black: f32, span: f32, max: f32) -> f32 {
    if v.is_nan() {
        return black;
    }
    (v * span + black + 0.5).floor().clamp(0.0, max)
}

impl Sample for u8 {
    const KIND: SampleType = SampleType::U8;

    #[inline]
    fn to_unit(self, narrow: bool) -> f32 {
        if narrow {
            (self as f32 - U8_NARROW_BLACK as f32) / (U8_NARROW_WHITE - U8_NARROW_BLACK) as f32
        } else {
            self as f32 / 255.0
        }
    }

    #[inline]
    fn from_unit(v: f32, narrow: bool) -> Self {
        if narrow {
            let span = (U8_NARROW_WHITE - U8_NARROW_BLACK) as f32;
            quantize(v, U8_NARROW_BLACK as f32, span, 255.0) as u8
        } else {
            quantize(v, 0.0, 255.0, 255.0) as u8
        }
    }
}

impl Sample for u16 {
    const KIND: SampleType = SampleType::U16;

    #[inline]
    fn to_unit(self, narrow: bool) -> f32 {
        if narrow {
            (self as f32 - U16_NARROW_BLACK as f32) / (U16_NARROW_WHITE - U16_NARROW_BLACK) as f32
        } else {
            self as f32 / 65535.0
        }
    }

    #[inline]
    fn from_unit(v: f32, narrow: bool) -> Self {
        if narrow {
            let span = (U16_NARROW_WHITE - U16_NARROW_BLACK) as f32;
            quantize(v, U16_NARROW_BLACK as f32, span, 65535.0) as u16
        } else {
            quantize(v, 0.0, 65535.0, 65535.0) as u16
        }
    }

    #[inline]
    fn exact_u16(self) -> Option<u16> {
        Some(self)
    }
}

impl Sample for f32 {
    const KIND: SampleType = SampleType::F32;

    #[inline]
    fn to_unit(self, _narrow: bool) -> f32 {
        self
    }

    #[inline]
    fn from_unit(v: f32, _narrow: bool) -> Self {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_u8_ranges() {
        assert_eq!(0u8.to_unit(false), 0.0);
        assert_eq!(255u8.to_unit(false), 1.0);
        assert_eq!(16u8.to_unit(true), 0.0);
        assert_eq!(235u8.to_unit(true), 1.0);
        assert!(0u8.to_unit(true) < 0.0);

        assert_eq!(u8::from_unit(0.0, true), 16);
        assert_eq!(u8::from_unit(1.0, true), 235);
        assert_eq!(u8::from_unit(2.0, false), 255);
        assert_eq!(u8::from_unit(-1.0, false), 0);
    }

    #[test]
    fn test_u16_ranges() {
        assert_eq!(4096u16.to_unit(true), 0.0);
        assert_eq!(60160u16.to_unit(true), 1.0);
        assert_relative_eq!(32768u16.to_unit(false), 0.500_007_6, epsilon = 1e-6);

        assert_eq!(u16::from_unit(1.0, false), 65535);
        assert_eq!(u16::from_unit(1.0, true), 60160);
        assert_eq!(u16::from_unit(0.0, true), 4096);
        assert_eq!(u16::from_unit(0.5, false), 32768);
    }

    #[test]
    fn test_float_passthrough() {
        assert_eq!(1.5f32.to_unit(true), 1.5);
        assert_eq!(f32::from_unit(-0.25, true), -0.25);
        assert_eq!(1.0f32.exact_u16(), None);
        assert_eq!(7u16.exact_u16(), Some(7));
    }

    #[test]
    fn test_nan_maps_to_black() {
        assert_eq!(u8::from_unit(f32::NAN, true), 16);
        assert_eq!(u16::from_unit(f32::NAN, false), 0);
    }

    #[test]
    fn test_sample_type_parse() {
        assert_eq!("uint16".parse::<SampleType>().unwrap(), SampleType::U16);
        assert_eq!("F32".parse::<SampleType>().unwrap(), SampleType::F32);
        assert!("u32".parse::<SampleType>().is_err());
    }
}
