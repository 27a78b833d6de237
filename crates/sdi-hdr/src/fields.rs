//! Per-field metadata transport and the capture-side view.
//!
//! Devices exchange HDR metadata as a flat set of numeric fields, one per
//! value, each of which may be absent. [`HdrFieldSet`] is that flat form.
//! Output metadata is flattened with [`HdrFieldSet::from_metadata`]; the
//! capture side parses it with [`CapturedHdrMetadata::from_fields`], which
//! reports each group independently and never substitutes zero for a
//! missing value.

use std::collections::BTreeMap;

use sdi_core::{ColorMatrix, Result};
use serde::{Deserialize, Serialize};

use crate::metadata::{
    Chromaticity, DisplayPrimaries, Eotf, HdrMetadata, HdrMetadataBuilder, MasteringLuminance,
};

/// Identifier of one metadata value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HdrField {
    /// CTA-861 EOTF code
    Eotf,
    /// Colour matrix code (0 Rec.601, 1 Rec.709, 2 Rec.2020)
    Colorspace,
    /// Red primary x
    RedX,
    /// Red primary y
    RedY,
    /// Green primary x
    GreenX,
    /// Green primary y
    GreenY,
    /// Blue primary x
    BlueX,
    /// Blue primary y
    BlueY,
    /// White point x
    WhiteX,
    /// White point y
    WhiteY,
    /// Mastering peak luminance, cd/m²
    MaxMasteringLuminance,
    /// Mastering black level, cd/m²
    MinMasteringLuminance,
    /// MaxCLL, cd/m²
    MaxCll,
    /// MaxFALL, cd/m²
    MaxFall,
}

const PRIMARY_FIELDS: [(HdrField, HdrField); 3] = [
    (HdrField::RedX, HdrField::RedY),
    (HdrField::GreenX, HdrField::GreenY),
    (HdrField::BlueX, HdrField::BlueY),
];

/// Colour matrix wire code.
pub const fn matrix_code(matrix: ColorMatrix) -> u8 {
    match matrix {
        ColorMatrix::Rec601 => 0,
        ColorMatrix::Rec709 => 1,
        ColorMatrix::Rec2020 => 2,
    }
}

/// Parses a colour matrix wire code.
pub const fn matrix_from_code(code: u8) -> Option<ColorMatrix> {
    match code {
        0 => Some(ColorMatrix::Rec601),
        1 => Some(ColorMatrix::Rec709),
        2 => Some(ColorMatrix::Rec2020),
        _ => None,
    }
}

/// Flat set of present metadata fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HdrFieldSet {
    values: BTreeMap<HdrField, f64>,
}

impl HdrFieldSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens outgoing metadata together with the frame's colour matrix.
    pub fn from_metadata(matrix: ColorMatrix, hdr: &HdrMetadata) -> Self {
        let mut set = Self::new();
        set.set(HdrField::Eotf, hdr.eotf().code() as f64);
        set.set(HdrField::Colorspace, matrix_code(matrix) as f64);
        if let Some(p) = hdr.primaries() {
            for ((fx, fy), c) in PRIMARY_FIELDS.iter().zip([p.red, p.green, p.blue]) {
                set.set(*fx, c.x);
                set.set(*fy, c.y);
            }
            set.set(HdrField::WhiteX, p.white.x);
            set.set(HdrField::WhiteY, p.white.y);
        }
        if let Some(l) = hdr.mastering_luminance() {
            set.set(HdrField::MaxMasteringLuminance, l.max);
            set.set(HdrField::MinMasteringLuminance, l.min);
        }
        if let Some(v) = hdr.max_cll() {
            set.set(HdrField::MaxCll, v);
        }
        if let Some(v) = hdr.max_fall() {
            set.set(HdrField::MaxFall, v);
        }
        set
    }

    /// Sets a field.
    pub fn set(&mut self, field: HdrField, value: f64) {
        self.values.insert(field, value);
    }

    /// Removes a field.
    pub fn remove(&mut self, field: HdrField) -> Option<f64> {
        self.values.remove(&field)
    }

    /// Value of a field, if present.
    pub fn get(&self, field: HdrField) -> Option<f64> {
        self.values.get(&field).copied()
    }

    /// True when the field is present.
    pub fn contains(&self, field: HdrField) -> bool {
        self.values.contains_key(&field)
    }

    /// Number of present fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Present fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (HdrField, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    fn pair(&self, x: HdrField, y: HdrField) -> Option<Chromaticity> {
        Some(Chromaticity::new(self.get(x)?, self.get(y)?))
    }
}

impl HdrMetadata {
    /// Flat field form, see [`HdrFieldSet::from_metadata`].
    pub fn to_fields(&self, matrix: ColorMatrix) -> HdrFieldSet {
        HdrFieldSet::from_metadata(matrix, self)
    }
}

/// HDR metadata as recovered from a captured frame.
///
/// Every group is independently optional. Values are reported as
/// received, without validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapturedHdrMetadata {
    /// Signalled transfer function (SDR when absent or unrecognised)
    pub eotf: Eotf,
    /// Signalled colour matrix
    pub matrix: Option<ColorMatrix>,
    /// Red, green and blue primaries
    pub display_primaries: Option<[Chromaticity; 3]>,
    /// White point
    pub white_point: Option<Chromaticity>,
    /// Mastering luminance range
    pub mastering_luminance: Option<MasteringLuminance>,
    /// MaxCLL
    pub max_cll: Option<f64>,
    /// MaxFALL
    pub max_fall: Option<f64>,
}

impl CapturedHdrMetadata {
    /// Parses a field set.
    pub fn from_fields(set: &HdrFieldSet) -> Self {
        let eotf = set
            .get(HdrField::Eotf)
            .and_then(|v| Eotf::from_code(v as u8))
            .unwrap_or_default();
        let matrix = set
            .get(HdrField::Colorspace)
            .and_then(|v| matrix_from_code(v as u8));

        let rgb: Option<Vec<_>> = PRIMARY_FIELDS.iter().map(|&(x, y)| set.pair(x, y)).collect();
        let display_primaries = rgb.map(|v| [v[0], v[1], v[2]]);

        let mastering_luminance = match (
            set.get(HdrField::MaxMasteringLuminance),
            set.get(HdrField::MinMasteringLuminance),
        ) {
            (Some(max), Some(min)) => Some(MasteringLuminance { max, min }),
            _ => None,
        };

        Self {
            eotf,
            matrix,
            display_primaries,
            white_point: set.pair(HdrField::WhiteX, HdrField::WhiteY),
            mastering_luminance,
            max_cll: set.get(HdrField::MaxCll),
            max_fall: set.get(HdrField::MaxFall),
        }
    }

    /// Primaries present.
    pub fn has_display_primaries(&self) -> bool {
        self.display_primaries.is_some()
    }

    /// White point present.
    pub fn has_white_point(&self) -> bool {
        self.white_point.is_some()
    }

    /// Mastering luminance present.
    pub fn has_mastering_luminance(&self) -> bool {
        self.mastering_luminance.is_some()
    }

    /// MaxCLL present.
    pub fn has_max_cll(&self) -> bool {
        self.max_cll.is_some()
    }

    /// MaxFALL present.
    pub fn has_max_fall(&self) -> bool {
        self.max_fall.is_some()
    }

    /// Primaries with white point, when both are present.
    pub fn full_primaries(&self) -> Option<DisplayPrimaries> {
        let [red, green, blue] = self.display_primaries?;
        Some(DisplayPrimaries {
            red,
            green,
            blue,
            white: self.white_point?,
        })
    }

    /// Re-validates into output metadata, for pass-through.
    ///
    /// Fails on the same partial groups the builder rejects.
    pub fn to_metadata(&self) -> Result<HdrMetadata> {
        let mut b = HdrMetadataBuilder::new(self.eotf);
        if let Some([r, g, bl]) = self.display_primaries {
            b = b.primaries(r, g, bl);
        }
        if let Some(w) = self.white_point {
            b = b.white_point(w);
        }
        if let Some(l) = self.mastering_luminance {
            b = b.max_mastering_luminance(l.max).min_mastering_luminance(l.min);
        }
        if let Some(v) = self.max_cll {
            b = b.max_cll(v);
        }
        if let Some(v) = self.max_fall {
            b = b.max_fall(v);
        }
        b.build()
    }
}

impl From<&HdrFieldSet> for CapturedHdrMetadata {
    fn from(set: &HdrFieldSet) -> Self {
        Self::from_fields(set)
    }
}
