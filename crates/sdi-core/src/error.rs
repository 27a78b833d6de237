//! Error types for the conversion engine.
//!
//! Every failure the engine can report is local and synchronous: it is
//! detected at the call site and returned to the caller. Nothing here is
//! retried or recovered internally.
//!
//! # Overview
//!
//! The [`Error`] enum groups failures into the families the engine exposes:
//! - **Invalid input** ([`InvalidShape`](Error::InvalidShape),
//!   [`UnsupportedSampleType`](Error::UnsupportedSampleType)) - caller bugs
//! - **Wire size** ([`InvalidBufferSize`](Error::InvalidBufferSize)) - a wire
//!   buffer that does not match the size formula of its geometry
//! - **Range** ([`RangeOutOfBounds`](Error::RangeOutOfBounds)) - only raised
//!   under strict range validation
//! - **Metadata** ([`IncompleteMetadata`](Error::IncompleteMetadata),
//!   [`InvalidMetadata`](Error::InvalidMetadata))
//!
//! # Usage
//!
//! ```rust
//! use sdi_core::{Error, Result, WireFormat};
//!
//! fn check(len: usize) -> Result<()> {
//!     let expected = WireFormat::Yuv10.frame_bytes(1920, 1080);
//!     if len != expected {
//!         return Err(Error::buffer_size(WireFormat::Yuv10, 1920, 1080, expected, len));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(0).unwrap_err().is_caller_error());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive for `Display` and `std::error::Error`
//!
//! # Used By
//!
//! - `sdi-color` - strict range validation
//! - `sdi-pack` - buffer size checks
//! - `sdi-convert` - dispatch errors
//! - `sdi-hdr` - metadata validation

use crate::format::WireFormat;
use crate::sample::SampleType;
use std::fmt;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Conversion direction, reported by [`Error::UnsupportedSampleType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// RGB samples to wire bytes.
    Encode,
    /// Wire bytes to RGB samples.
    Decode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encode => f.write_str("encode"),
            Direction::Decode => f.write_str("decode"),
        }
    }
}

/// Errors reported by the conversion engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Frame geometry or sample count does not describe a W×H×3 raster.
    ///
    /// Returned for zero width or height, and for sample slices whose
    /// length is not `width * height * 3`.
    #[error("invalid frame shape {width}x{height}: {reason}")]
    InvalidShape {
        /// Frame width in pixels
        width: u32,
        /// Frame height in pixels
        height: u32,
        /// What is wrong with the shape
        reason: String,
    },

    /// The sample type has no conversion path for this wire format.
    ///
    /// For example `u8` samples cannot be encoded to 10-bit 4:2:2, and
    /// BGRA8 cannot be decoded to `u16`.
    #[error("unsupported sample type {sample} for {direction} of {format}")]
    UnsupportedSampleType {
        /// Application-side sample type
        sample: SampleType,
        /// Target or source wire format
        format: WireFormat,
        /// Conversion direction
        direction: Direction,
    },

    /// Wire buffer length does not match the deterministic size formula.
    #[error("{format} buffer for {width}x{height} must be {expected} bytes, got {actual}")]
    InvalidBufferSize {
        /// Wire format of the buffer
        format: WireFormat,
        /// Frame width in pixels
        width: u32,
        /// Frame height in pixels
        height: u32,
        /// Size required by the format
        expected: usize,
        /// Size supplied
        actual: usize,
    },

    /// A normalized intensity fell outside [0, 1] under strict validation.
    #[error("{channel} value {value} outside of declared range")]
    RangeOutOfBounds {
        /// Offending value, already normalized
        value: f32,
        /// Channel name (`"R"`, `"G"`, `"B"`, ...)
        channel: &'static str,
    },

    /// An HDR metadata group was supplied with some of its fields missing.
    #[error("incomplete {group} metadata: missing {missing}")]
    IncompleteMetadata {
        /// Metadata group name
        group: &'static str,
        /// First missing field
        missing: &'static str,
    },

    /// An HDR metadata value violates its constraints.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// A textual name did not match any known variant.
    #[error("unknown {kind}: {value}")]
    Parse {
        /// Kind of value being parsed
        kind: &'static str,
        /// Input that failed to parse
        value: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidShape`].
    pub fn invalid_shape(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::UnsupportedSampleType`].
    pub fn unsupported(sample: SampleType, format: WireFormat, direction: Direction) -> Self {
        Self::UnsupportedSampleType {
            sample,
            format,
            direction,
        }
    }

    /// Creates an [`Error::InvalidBufferSize`].
    pub fn buffer_size(
        format: WireFormat,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::InvalidBufferSize {
            format,
            width,
            height,
            expected,
            actual,
        }
    }

    /// Creates an [`Error::InvalidMetadata`].
    pub fn invalid_metadata(reason: impl Into<String>) -> Self {
        Self::InvalidMetadata(reason.into())
    }

    /// Creates an [`Error::Parse`].
    pub fn parse(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            value: value.into(),
        }
    }

    /// Returns true for the invalid-input family (shape and sample type).
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidShape { .. }
                | Self::UnsupportedSampleType { .. }
                | Self::InvalidBufferSize { .. }
        )
    }

    /// Returns true for metadata construction failures.
    pub fn is_metadata_error(&self) -> bool {
        matches!(
            self,
            Self::IncompleteMetadata { .. } | Self::InvalidMetadata(_)
        )
    }
}
