//! # sdi-color
//!
//! The two pure numeric stages of the conversion engine:
//!
//! - [`range`] - normalized value to/from integer code value, narrow or full
//!   range, at any bit depth from 8 to 16
//! - [`matrix`] - R'G'B' to/from Y'CbCr for Rec.601, Rec.709 and Rec.2020
//!
//! Both are stateless and hold only immutable constants, so they can be
//! called from any number of threads.
//!
//! # Usage
//!
//! ```rust
//! use sdi_color::{LumaCoefficients, YcbcrRange};
//! use sdi_core::ColorMatrix;
//!
//! let k = LumaCoefficients::for_matrix(ColorMatrix::Rec709);
//! let range = YcbcrRange::new(10, true);
//! assert_eq!(range.quantize(k.rgb_to_ycbcr([1.0, 1.0, 1.0])), [940, 512, 512]);
//! ```

#![warn(missing_docs)]

pub mod matrix;
pub mod range;

pub use matrix::LumaCoefficients;
pub use range::{ChannelKind, CodeRange, RangePolicy, YcbcrRange};
