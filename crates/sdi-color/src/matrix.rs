//! R'G'B' to Y'CbCr matrices.
//!
//! Works on normalized full-range values only. Range mapping happens
//! before or after, in [`crate::range`].
//!
//! Forward transform:
//!
//! ```text
//! Y' = Kr*R + Kg*G + Kb*B
//! Cb = 0.5 + (B - Y') / (2 * (1 - Kb))
//! Cr = 0.5 + (R - Y') / (2 * (1 - Kr))
//! ```
//!
//! The inverse reconstructs R and B from Cr and Cb, solves G from the luma
//! equation and clamps the result into [0, 1].

use sdi_core::ColorMatrix;

/// Rec.601 red luma weight.
pub const REC601_KR: f32 = 0.299;
/// Rec.601 blue luma weight.
pub const REC601_KB: f32 = 0.114;
/// Rec.709 red luma weight.
pub const REC709_KR: f32 = 0.2126;
/// Rec.709 blue luma weight.
pub const REC709_KB: f32 = 0.0722;
/// Rec.2020 red luma weight.
pub const REC2020_KR: f32 = 0.2627;
/// Rec.2020 blue luma weight.
pub const REC2020_KB: f32 = 0.0593;

/// Luma weights of one matrix standard. `kg = 1 - kr - kb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaCoefficients {
    /// Red weight
    pub kr: f32,
    /// Green weight
    pub kg: f32,
    /// Blue weight
    pub kb: f32,
}

impl LumaCoefficients {
    /// Builds coefficients from Kr and Kb.
    pub const fn new(kr: f32, kb: f32) -> Self {
        Self {
            kr,
            kg: 1.0 - kr - kb,
            kb,
        }
    }

    /// Coefficients of a matrix standard.
    pub const fn for_matrix(matrix: ColorMatrix) -> Self {
        match matrix {
            ColorMatrix::Rec601 => Self::new(REC601_KR, REC601_KB),
            ColorMatrix::Rec709 => Self::new(REC709_KR, REC709_KB),
            ColorMatrix::Rec2020 => Self::new(REC2020_KR, REC2020_KB),
        }
    }

    /// Luma of an R'G'B' triple.
    #[inline]
    pub fn luma(&self, rgb: [f32; 3]) -> f32 {
        self.kr * rgb[0] + self.kg * rgb[1] + self.kb * rgb[2]
    }

    /// R'G'B' to [Y', Cb, Cr], chroma centred on 0.5.
    #[inline]
    pub fn rgb_to_ycbcr(&self, rgb: [f32; 3]) -> [f32; 3] {
        let y = self.luma(rgb);
        let cb = 0.5 + (rgb[2] - y) / (2.0 * (1.0 - self.kb));
        let cr = 0.5 + (rgb[0] - y) / (2.0 * (1.0 - self.kr));
        [y, cb, cr]
    }

    /// [Y', Cb, Cr] to R'G'B', clamped to [0, 1].
    #[inline]
    pub fn ycbcr_to_rgb(&self, ycbcr: [f32; 3]) -> [f32; 3] {
        let [y, cb, cr] = ycbcr;
        let r = y + 2.0 * (1.0 - self.kr) * (cr - 0.5);
        let b = y + 2.0 * (1.0 - self.kb) * (cb - 0.5);
        let g = (y - self.kr * r - self.kb * b) / self.kg;
        [clamp_unit(r), clamp_unit(g), clamp_unit(b)]
    }
}

impl From<ColorMatrix> for LumaCoefficients {
    fn from(matrix: ColorMatrix) -> Self {
        Self::for_matrix(matrix)
    }
}

#[inline]
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
