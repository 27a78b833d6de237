//! Wire formats and colour-matrix selection.
//!
//! A [`WireFormat`] names one of the packed byte layouts a broadcast video
//! interface accepts. Its buffer size is a pure function of the frame
//! geometry: pixels are packed in fixed-size groups and every row is padded
//! up to a whole number of groups.
//!
//! | Format | FourCC | Group | Bytes | Sampling |
//! |--------|--------|-------|-------|----------|
//! | [`Bgra8`](WireFormat::Bgra8) | `BGRA` | 1 px | 4 | 8-bit 4:4:4:4 |
//! | [`Yuv8`](WireFormat::Yuv8) | `2vuy` | 2 px | 4 | 8-bit 4:2:2 |
//! | [`Yuv10`](WireFormat::Yuv10) | `v210` | 6 px | 16 | 10-bit 4:2:2 |
//! | [`Rgb10`](WireFormat::Rgb10) | `R10l` | 1 px | 4 | 10-bit 4:4:4 |
//! | [`Rgb12`](WireFormat::Rgb12) | `R12L` | 8 px | 36 | 12-bit 4:4:4 |
//!
//! # Example
//!
//! ```
//! use sdi_core::WireFormat;
//!
//! // 1920 is a multiple of 6, so no row padding
//! assert_eq!(WireFormat::Yuv10.row_bytes(1920), 5120);
//! // 7 pixels round up to two groups of 6
//! assert_eq!(WireFormat::Yuv10.row_bytes(7), 32);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// ============================================================================
// Wire formats
// ============================================================================

/// Packed pixel layout on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WireFormat {
    /// 8-bit BGRA, alpha fixed at 255.
    Bgra8,
    /// 8-bit 4:2:2 Y'CbCr, byte order Cb Y0 Cr Y1.
    Yuv8,
    /// 10-bit 4:2:2 Y'CbCr, six pixels in four little-endian words.
    Yuv10,
    /// 10-bit 4:4:4 RGB, one little-endian word per pixel.
    Rgb10,
    /// 12-bit 4:4:4 RGB, eight pixels in nine little-endian words.
    Rgb12,
}

impl WireFormat {
    /// All wire formats.
    pub const ALL: [WireFormat; 5] = [
        WireFormat::Bgra8,
        WireFormat::Yuv8,
        WireFormat::Yuv10,
        WireFormat::Rgb10,
        WireFormat::Rgb12,
    ];

    /// Pixels per packing group.
    #[inline]
    pub const fn group_pixels(self) -> usize {
        match self {
            WireFormat::Bgra8 | WireFormat::Rgb10 => 1,
            WireFormat::Yuv8 => 2,
            WireFormat::Yuv10 => 6,
            WireFormat::Rgb12 => 8,
        }
    }

    /// Bytes per packing group.
    #[inline]
    pub const fn group_bytes(self) -> usize {
        match self {
            WireFormat::Bgra8 | WireFormat::Yuv8 | WireFormat::Rgb10 => 4,
            WireFormat::Yuv10 => 16,
            WireFormat::Rgb12 => 36,
        }
    }

    /// Number of groups needed for `width` pixels.
    #[inline]
    pub const fn groups_per_row(self, width: u32) -> usize {
        (width as usize).div_ceil(self.group_pixels())
    }

    /// Bytes per row, padded to whole groups.
    #[inline]
    pub const fn row_bytes(self, width: u32) -> usize {
        self.groups_per_row(width) * self.group_bytes()
    }

    /// Bytes per frame.
    ///
    /// Overflows for geometries whose size exceeds `usize`; buffer
    /// constructors use [`checked_frame_bytes`](Self::checked_frame_bytes).
    #[inline]
    pub const fn frame_bytes(self, width: u32, height: u32) -> usize {
        self.row_bytes(width) * height as usize
    }

    /// Bytes per frame, or `None` when the size does not fit in `usize`.
    pub const fn checked_frame_bytes(self, width: u32, height: u32) -> Option<usize> {
        let row = match self.groups_per_row(width).checked_mul(self.group_bytes()) {
            Some(row) => row,
            None => return None,
        };
        row.checked_mul(height as usize)
    }

    /// Bits per component on the wire.
    pub const fn bit_depth(self) -> u32 {
        match self {
            WireFormat::Bgra8 | WireFormat::Yuv8 => 8,
            WireFormat::Yuv10 | WireFormat::Rgb10 => 10,
            WireFormat::Rgb12 => 12,
        }
    }

    /// True for the Y'CbCr formats that need a colour matrix.
    pub const fn is_yuv(self) -> bool {
        matches!(self, WireFormat::Yuv8 | WireFormat::Yuv10)
    }

    /// True for 4:2:2 chroma-subsampled formats.
    pub const fn is_subsampled(self) -> bool {
        self.is_yuv()
    }

    /// Four-character code used by capture hardware.
    pub const fn fourcc(self) -> &'static str {
        match self {
            WireFormat::Bgra8 => "BGRA",
            WireFormat::Yuv8 => "2vuy",
            WireFormat::Yuv10 => "v210",
            WireFormat::Rgb10 => "R10l",
            WireFormat::Rgb12 => "R12L",
        }
    }

    /// Short human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            WireFormat::Bgra8 => "bgra8",
            WireFormat::Yuv8 => "yuv8",
            WireFormat::Yuv10 => "yuv10",
            WireFormat::Rgb10 => "rgb10",
            WireFormat::Rgb12 => "rgb12",
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fourcc())
    }
}

impl FromStr for WireFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bgra" | "bgra8" | "8bitbgra" => Ok(WireFormat::Bgra8),
            "2vuy" | "yuv8" | "uyvy" | "8bityuv" => Ok(WireFormat::Yuv8),
            "v210" | "yuv10" | "10bityuv" => Ok(WireFormat::Yuv10),
            "r10l" | "rgb10" | "10bitrgb" => Ok(WireFormat::Rgb10),
            "r12l" | "rgb12" | "12bitrgb" => Ok(WireFormat::Rgb12),
            _ => Err(Error::parse("wire format", s)),
        }
    }
}

// ============================================================================
// Colour matrix
// ============================================================================

/// R'G'B' to Y'CbCr matrix standard.
///
/// Rec.601 is conventionally used for SD geometries only. The engine does
/// not enforce that; see the policy layer in `sdi-convert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorMatrix {
    /// ITU-R BT.601
    Rec601,
    /// ITU-R BT.709
    #[default]
    Rec709,
    /// ITU-R BT.2020 (non-constant luminance)
    Rec2020,
}

impl ColorMatrix {
    /// All matrices.
    pub const ALL: [ColorMatrix; 3] = [ColorMatrix::Rec601, ColorMatrix::Rec709, ColorMatrix::Rec2020];

    /// Canonical name.
    pub const fn name(self) -> &'static str {
        match self {
            ColorMatrix::Rec601 => "Rec601",
            ColorMatrix::Rec709 => "Rec709",
            ColorMatrix::Rec2020 => "Rec2020",
        }
    }
}

impl fmt::Display for ColorMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMatrix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "rec601" | "bt601" | "601" => Ok(ColorMatrix::Rec601),
            "rec709" | "bt709" | "709" => Ok(ColorMatrix::Rec709),
            "rec2020" | "bt2020" | "2020" => Ok(ColorMatrix::Rec2020),
            _ => Err(Error::parse("color matrix", s)),
        }
    }
}
