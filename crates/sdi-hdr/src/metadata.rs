//! Output-side HDR static metadata.
//!
//! [`HdrMetadata`] always satisfies its invariants:
//!
//! - SDR carries no optional groups
//! - display primaries come with a white point (all-or-nothing)
//! - mastering luminance has both bounds, `max >= min > 0`
//! - MaxCLL and MaxFALL are non-negative, `max_fall <= max_cll` when both
//!   are present
//!
//! Values are built with [`HdrMetadataBuilder`], which rejects partially
//! filled groups with [`Error::IncompleteMetadata`], or taken from the
//! fixed PQ/HLG reference set.

use std::fmt;
use std::str::FromStr;

use sdi_core::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Value types
// ============================================================================

/// Electro-optical transfer function signalled with the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eotf {
    /// Standard dynamic range gamma
    #[default]
    Sdr,
    /// SMPTE ST 2084 perceptual quantizer
    Pq,
    /// ARIB STD-B67 hybrid log-gamma
    Hlg,
}

impl Eotf {
    /// All transfer functions.
    pub const ALL: [Eotf; 3] = [Eotf::Sdr, Eotf::Pq, Eotf::Hlg];

    /// CTA-861 EOTF code.
    pub const fn code(self) -> u8 {
        match self {
            Eotf::Sdr => 0,
            Eotf::Pq => 2,
            Eotf::Hlg => 3,
        }
    }

    /// Parses a CTA-861 EOTF code. Code 1 (traditional HDR gamma) has no
    /// variant and returns `None`.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Eotf::Sdr),
            2 => Some(Eotf::Pq),
            3 => Some(Eotf::Hlg),
            _ => None,
        }
    }

    /// True for PQ and HLG.
    pub const fn is_hdr(self) -> bool {
        !matches!(self, Eotf::Sdr)
    }
}

impl fmt::Display for Eotf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Eotf::Sdr => "SDR",
            Eotf::Pq => "PQ",
            Eotf::Hlg => "HLG",
        })
    }
}

impl FromStr for Eotf {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sdr" => Ok(Eotf::Sdr),
            "pq" | "st2084" => Ok(Eotf::Pq),
            "hlg" => Ok(Eotf::Hlg),
            _ => Err(Error::parse("eotf", s)),
        }
    }
}

/// CIE 1931 xy chromaticity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chromaticity {
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
}

impl Chromaticity {
    /// Creates a chromaticity.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Checks both coordinates are finite and inside [0, 1].
    pub fn validate(&self, what: &str) -> Result<()> {
        let ok = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !ok(self.x) || !ok(self.y) {
            return Err(Error::invalid_metadata(format!(
                "{what} chromaticity ({}, {}) outside [0, 1]",
                self.x, self.y
            )));
        }
        Ok(())
    }
}

/// Mastering display primaries with white point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayPrimaries {
    /// Red primary
    pub red: Chromaticity,
    /// Green primary
    pub green: Chromaticity,
    /// Blue primary
    pub blue: Chromaticity,
    /// White point
    pub white: Chromaticity,
}

impl DisplayPrimaries {
    /// Validates every coordinate.
    pub fn validate(&self) -> Result<()> {
        self.red.validate("red")?;
        self.green.validate("green")?;
        self.blue.validate("blue")?;
        self.white.validate("white point")
    }
}

/// Mastering display luminance range in cd/m².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MasteringLuminance {
    /// Peak luminance
    pub max: f64,
    /// Black level
    pub min: f64,
}

impl MasteringLuminance {
    /// Creates a validated range.
    pub fn new(max: f64, min: f64) -> Result<Self> {
        let lum = Self { max, min };
        lum.validate()?;
        Ok(lum)
    }

    /// Checks `max >= min > 0`.
    pub fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.max >= self.min) {
            return Err(Error::invalid_metadata(format!(
                "mastering luminance must satisfy max >= min > 0, got max {} min {}",
                self.max, self.min
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Reference values
// ============================================================================

/// D65 white point.
pub const D65: Chromaticity = Chromaticity::new(0.3127, 0.3290);

/// ITU-R BT.709 primaries, D65 white.
pub const REC709_PRIMARIES: DisplayPrimaries = DisplayPrimaries {
    red: Chromaticity::new(0.64, 0.33),
    green: Chromaticity::new(0.30, 0.60),
    blue: Chromaticity::new(0.15, 0.06),
    white: D65,
};

/// ITU-R BT.2020 primaries, D65 white.
pub const REC2020_PRIMARIES: DisplayPrimaries = DisplayPrimaries {
    red: Chromaticity::new(0.708, 0.292),
    green: Chromaticity::new(0.170, 0.797),
    blue: Chromaticity::new(0.131, 0.046),
    white: D65,
};

/// Reference mastering peak for PQ and HLG, cd/m².
pub const REFERENCE_MAX_LUMINANCE: f64 = 1000.0;
/// Reference mastering black level for PQ and HLG, cd/m².
pub const REFERENCE_MIN_LUMINANCE: f64 = 0.0001;
/// Reference MaxCLL for PQ and HLG, cd/m².
pub const REFERENCE_MAX_CLL: f64 = 1000.0;
/// Reference MaxFALL for PQ and HLG, cd/m².
pub const REFERENCE_MAX_FALL: f64 = 50.0;

// ============================================================================
// HdrMetadata
// ============================================================================

/// HDR metadata attached to outgoing frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HdrSidecar", into = "HdrSidecar")]
pub struct HdrMetadata {
    eotf: Eotf,
    primaries: Option<DisplayPrimaries>,
    mastering: Option<MasteringLuminance>,
    max_cll: Option<f64>,
    max_fall: Option<f64>,
}

impl Default for HdrMetadata {
    fn default() -> Self {
        Self::sdr()
    }
}

impl HdrMetadata {
    /// SDR: no optional metadata.
    pub const fn sdr() -> Self {
        Self {
            eotf: Eotf::Sdr,
            primaries: None,
            mastering: None,
            max_cll: None,
            max_fall: None,
        }
    }

    /// PQ with the reference defaults.
    pub const fn pq() -> Self {
        Self::reference(Eotf::Pq)
    }

    /// HLG with the reference defaults.
    pub const fn hlg() -> Self {
        Self::reference(Eotf::Hlg)
    }

    /// The fixed reference set for `eotf`: Rec.2020 primaries, D65 white,
    /// 1000 / 0.0001 cd/m² mastering, MaxCLL 1000, MaxFALL 50. SDR has none.
    pub const fn reference(eotf: Eotf) -> Self {
        match eotf {
            Eotf::Sdr => Self::sdr(),
            Eotf::Pq | Eotf::Hlg => Self {
                eotf,
                primaries: Some(REC2020_PRIMARIES),
                mastering: Some(MasteringLuminance {
                    max: REFERENCE_MAX_LUMINANCE,
                    min: REFERENCE_MIN_LUMINANCE,
                }),
                max_cll: Some(REFERENCE_MAX_CLL),
                max_fall: Some(REFERENCE_MAX_FALL),
            },
        }
    }

    /// Starts a builder.
    pub fn builder(eotf: Eotf) -> HdrMetadataBuilder {
        HdrMetadataBuilder::new(eotf)
    }

    /// Switches transfer function.
    ///
    /// SDR clears every optional group. Switching to PQ or HLG keeps any
    /// custom values already present and otherwise installs the reference
    /// defaults.
    pub fn with_eotf(self, eotf: Eotf) -> Self {
        match eotf {
            Eotf::Sdr => Self::sdr(),
            _ if self.has_custom_values() => Self { eotf, ..self },
            _ => Self::reference(eotf),
        }
    }

    /// Transfer function.
    pub fn eotf(&self) -> Eotf {
        self.eotf
    }

    /// Display primaries and white point.
    pub fn primaries(&self) -> Option<&DisplayPrimaries> {
        self.primaries.as_ref()
    }

    /// Mastering luminance range.
    pub fn mastering_luminance(&self) -> Option<&MasteringLuminance> {
        self.mastering.as_ref()
    }

    /// Maximum content light level, cd/m².
    pub fn max_cll(&self) -> Option<f64> {
        self.max_cll
    }

    /// Maximum frame-average light level, cd/m².
    pub fn max_fall(&self) -> Option<f64> {
        self.max_fall
    }

    /// True when any optional group is present.
    pub fn has_custom_values(&self) -> bool {
        self.primaries.is_some()
            || self.mastering.is_some()
            || self.max_cll.is_some()
            || self.max_fall.is_some()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`HdrMetadata`].
///
/// ```
/// use sdi_hdr::{Chromaticity, Eotf, HdrMetadata};
///
/// let err = HdrMetadata::builder(Eotf::Pq)
///     .primaries(
///         Chromaticity::new(0.68, 0.32),
///         Chromaticity::new(0.265, 0.69),
///         Chromaticity::new(0.15, 0.06),
///     )
///     .build();
/// assert!(err.is_err()); // no white point
/// ```
#[derive(Debug, Clone, Default)]
pub struct HdrMetadataBuilder {
    eotf: Eotf,
    rgb: Option<[Chromaticity; 3]>,
    white: Option<Chromaticity>,
    max_luminance: Option<f64>,
    min_luminance: Option<f64>,
    max_cll: Option<f64>,
    max_fall: Option<f64>,
}

impl HdrMetadataBuilder {
    /// Starts from `eotf` with no optional values.
    pub fn new(eotf: Eotf) -> Self {
        Self {
            eotf,
            ..Self::default()
        }
    }

    /// Red, green and blue primaries.
    pub fn primaries(mut self, red: Chromaticity, green: Chromaticity, blue: Chromaticity) -> Self {
        self.rgb = Some([red, green, blue]);
        self
    }

    /// White point.
    pub fn white_point(mut self, white: Chromaticity) -> Self {
        self.white = Some(white);
        self
    }

    /// Primaries and white point together.
    pub fn display_primaries(self, p: DisplayPrimaries) -> Self {
        self.primaries(p.red, p.green, p.blue).white_point(p.white)
    }

    /// Mastering peak luminance.
    pub fn max_mastering_luminance(mut self, v: f64) -> Self {
        self.max_luminance = Some(v);
        self
    }

    /// Mastering black level.
    pub fn min_mastering_luminance(mut self, v: f64) -> Self {
        self.min_luminance = Some(v);
        self
    }

    /// MaxCLL.
    pub fn max_cll(mut self, v: f64) -> Self {
        self.max_cll = Some(v);
        self
    }

    /// MaxFALL.
    pub fn max_fall(mut self, v: f64) -> Self {
        self.max_fall = Some(v);
        self
    }

    fn is_empty(&self) -> bool {
        self.rgb.is_none()
            && self.white.is_none()
            && self.max_luminance.is_none()
            && self.min_luminance.is_none()
            && self.max_cll.is_none()
            && self.max_fall.is_none()
    }

    /// Validates and builds.
    ///
    /// SDR discards every optional value. PQ or HLG with no optional
    /// values yields the reference defaults.
    pub fn build(self) -> Result<HdrMetadata> {
        if self.eotf == Eotf::Sdr {
            return Ok(HdrMetadata::sdr());
        }
        if self.is_empty() {
            return Ok(HdrMetadata::reference(self.eotf));
        }

        let primaries = match (self.rgb, self.white) {
            (Some([red, green, blue]), Some(white)) => {
                let p = DisplayPrimaries { red, green, blue, white };
                p.validate()?;
                Some(p)
            }
            (Some(_), None) => {
                return Err(Error::IncompleteMetadata {
                    group: "display primaries",
                    missing: "white point",
                });
            }
            (None, Some(_)) => {
                return Err(Error::IncompleteMetadata {
                    group: "display primaries",
                    missing: "red/green/blue primaries",
                });
            }
            (None, None) => None,
        };

        let mastering = match (self.max_luminance, self.min_luminance) {
            (Some(max), Some(min)) => Some(MasteringLuminance::new(max, min)?),
            (Some(_), None) => {
                return Err(Error::IncompleteMetadata {
                    group: "mastering luminance",
                    missing: "min luminance",
                });
            }
            (None, Some(_)) => {
                return Err(Error::IncompleteMetadata {
                    group: "mastering luminance",
                    missing: "max luminance",
                });
            }
            (None, None) => None,
        };

        for (name, v) in [("MaxCLL", self.max_cll), ("MaxFALL", self.max_fall)] {
            if let Some(v) = v {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::invalid_metadata(format!("{name} must be >= 0, got {v}")));
                }
            }
        }
        if let (Some(cll), Some(fall)) = (self.max_cll, self.max_fall) {
            if fall > cll {
                return Err(Error::invalid_metadata(format!(
                    "MaxFALL {fall} exceeds MaxCLL {cll}"
                )));
            }
        }

        Ok(HdrMetadata {
            eotf: self.eotf,
            primaries,
            mastering,
            max_cll: self.max_cll,
            max_fall: self.max_fall,
        })
    }
}

// ============================================================================
// Serialized form
// ============================================================================

/// Flat serialized form of [`HdrMetadata`], as used in JSON/YAML sidecars.
///
/// Deserializing goes through the builder, so a sidecar with a partial
/// group is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HdrSidecar {
    /// Transfer function
    pub eotf: Eotf,
    /// Red, green, blue primaries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primaries: Option<[Chromaticity; 3]>,
    /// White point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_point: Option<Chromaticity>,
    /// Mastering peak luminance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_mastering_luminance: Option<f64>,
    /// Mastering black level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_mastering_luminance: Option<f64>,
    /// MaxCLL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cll: Option<f64>,
    /// MaxFALL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fall: Option<f64>,
}

impl TryFrom<HdrSidecar> for HdrMetadata {
    type Error = Error;

    fn try_from(s: HdrSidecar) -> Result<Self> {
        HdrMetadataBuilder {
            eotf: s.eotf,
            rgb: s.primaries,
            white: s.white_point,
            max_luminance: s.max_mastering_luminance,
            min_luminance: s.min_mastering_luminance,
            max_cll: s.max_cll,
            max_fall: s.max_fall,
        }
        .build()
    }
}

impl From<HdrMetadata> for HdrSidecar {
    fn from(m: HdrMetadata) -> Self {
        Self {
            eotf: m.eotf,
            primaries: m.primaries.map(|p| [p.red, p.green, p.blue]),
            white_point: m.primaries.map(|p| p.white),
            max_mastering_luminance: m.mastering.map(|l| l.max),
            min_mastering_luminance: m.mastering.map(|l| l.min),
            max_cll: m.max_cll,
            max_fall: m.max_fall,
        }
    }
}
