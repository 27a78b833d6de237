//! Output policy layered above the conversion functions.
//!
//! The conversion functions only do what they are told. This module
//! decides what to tell them when the caller leaves a choice open:
//!
//! - Matrix: Rec.601 for SD geometries, Rec.709 for everything else,
//!   unless the caller names one
//! - Format: 8-bit samples cannot feed v210, so a v210 request with u8
//!   input is served as BGRA8 instead
//!
//! # Example
//!
//! ```rust
//! use sdi_convert::policy::OutputPlan;
//! use sdi_core::{ColorMatrix, DisplayMode, SampleType, WireFormat};
//!
//! let plan = OutputPlan::resolve(DisplayMode::Pal, WireFormat::Yuv10, SampleType::U8, None);
//! assert_eq!(plan.format, WireFormat::Bgra8);
//! assert_eq!(plan.matrix, ColorMatrix::Rec601);
//! assert!(plan.substituted);
//! ```

use sdi_core::{ColorMatrix, DisplayMode, SampleType, WireFormat};
use tracing::warn;

use crate::encode::supports_encode;

/// SD active-picture sizes.
pub const SD_GEOMETRIES: [(u32, u32); 2] = [(720, 486), (720, 576)];

/// True for 720x486 and 720x576.
pub fn is_sd_geometry(width: u32, height: u32) -> bool {
    SD_GEOMETRIES.contains(&(width, height))
}

/// Default matrix for a frame size.
pub fn default_matrix_for(width: u32, height: u32) -> ColorMatrix {
    if is_sd_geometry(width, height) {
        ColorMatrix::Rec601
    } else {
        ColorMatrix::Rec709
    }
}

/// Default matrix for a display mode.
pub fn default_matrix_for_mode(mode: DisplayMode) -> ColorMatrix {
    if mode.is_sd() || is_sd_geometry(mode.width(), mode.height()) {
        ColorMatrix::Rec601
    } else {
        ColorMatrix::Rec709
    }
}

/// Caller override, or the mode default.
pub fn resolve_matrix(requested: Option<ColorMatrix>, mode: DisplayMode) -> ColorMatrix {
    requested.unwrap_or_else(|| default_matrix_for_mode(mode))
}

/// Wire format actually used for a request.
///
/// Returns the requested format unless it is v210 with u8 input, which
/// becomes BGRA8.
pub fn resolve_format(requested: WireFormat, sample: SampleType) -> WireFormat {
    if requested == WireFormat::Yuv10 && sample == SampleType::U8 {
        WireFormat::Bgra8
    } else {
        requested
    }
}

/// Resolved matrix and format for one output frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPlan {
    /// Format to encode and push
    pub format: WireFormat,
    /// Matrix to encode with
    pub matrix: ColorMatrix,
    /// True when `format` differs from the request
    pub substituted: bool,
}

impl OutputPlan {
    /// Applies both policies.
    pub fn resolve(
        mode: DisplayMode,
        requested: WireFormat,
        sample: SampleType,
        matrix: Option<ColorMatrix>,
    ) -> Self {
        let format = resolve_format(requested, sample);
        let substituted = format != requested;
        if substituted {
            warn!(%requested, %format, %sample, "substituting wire format");
        }
        Self {
            format,
            matrix: resolve_matrix(matrix, mode),
            substituted,
        }
    }

    /// True when the planned format accepts `sample` input.
    pub fn is_encodable(&self, sample: SampleType) -> bool {
        supports_encode(sample, self.format)
    }
}
