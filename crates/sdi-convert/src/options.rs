//! Per-call conversion options.

use sdi_color::RangePolicy;
use sdi_core::ColorMatrix;

/// Options for RGB to wire conversion.
///
/// Defaults: Rec.709, full-range input, narrow-range output, clamping.
/// `input_narrow` only applies to integer samples; float input is always
/// full range. BGRA8 output ignores both range flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Matrix for Y'CbCr formats
    pub matrix: ColorMatrix,
    /// Integer input samples are narrow range
    pub input_narrow: bool,
    /// Wire codes are narrow range
    pub output_narrow: bool,
    /// Handling of out-of-range input
    pub policy: RangePolicy,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            matrix: ColorMatrix::Rec709,
            input_narrow: false,
            output_narrow: true,
            policy: RangePolicy::Clamp,
        }
    }
}

impl EncodeOptions {
    /// Sets the matrix.
    pub fn matrix(mut self, matrix: ColorMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    /// Sets input and output range flags.
    pub fn ranges(mut self, input_narrow: bool, output_narrow: bool) -> Self {
        self.input_narrow = input_narrow;
        self.output_narrow = output_narrow;
        self
    }

    /// Rejects out-of-range input instead of clamping.
    pub fn strict(mut self) -> Self {
        self.policy = RangePolicy::Strict;
        self
    }
}

/// Options for wire to RGB conversion.
///
/// Defaults: Rec.709, narrow-range wire codes, full-range output.
/// `output_narrow` only applies to integer samples. BGRA8 input ignores
/// both range flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Matrix for Y'CbCr formats
    pub matrix: ColorMatrix,
    /// Wire codes are narrow range
    pub input_narrow: bool,
    /// Integer output samples are narrow range
    pub output_narrow: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            matrix: ColorMatrix::Rec709,
            input_narrow: true,
            output_narrow: false,
        }
    }
}

impl DecodeOptions {
    /// Sets the matrix.
    pub fn matrix(mut self, matrix: ColorMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    /// Sets input and output range flags.
    pub fn ranges(mut self, input_narrow: bool, output_narrow: bool) -> Self {
        self.input_narrow = input_narrow;
        self.output_narrow = output_narrow;
        self
    }
}

impl From<EncodeOptions> for DecodeOptions {
    /// Inverse of an encode: same matrix, range flags swapped.
    fn from(e: EncodeOptions) -> Self {
        Self {
            matrix: e.matrix,
            input_narrow: e.output_narrow,
            output_narrow: e.input_narrow,
        }
    }
}
