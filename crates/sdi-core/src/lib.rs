//! # sdi-core
//!
//! Core types for broadcast video I/O.
//!
//! This crate provides the data model shared by every other SDI-RS crate:
//!
//! - [`Sample`], [`SampleType`] - application-side sample types (u8, u16, f32)
//! - [`WireFormat`] - packed wire layouts and their size formulas
//! - [`ColorMatrix`] - Rec.601/709/2020 selector
//! - [`RgbFrame`], [`RgbView`], [`WireFrame`], [`WireView`] - frame buffers
//! - [`DisplayMode`], [`FrameRate`] - broadcast timing presets
//! - [`Error`], [`Result`] - the engine's error taxonomy
//!
//! ## Crate Structure
//!
//! ```text
//! sdi-core (this crate)
//!    ^
//!    |
//!    +-- sdi-color (range mapping, colour matrices)
//!    +-- sdi-pack (wire codecs)
//!    +-- sdi-hdr (HDR metadata)
//!    +-- sdi-convert (frame conversion facade)
//!    +-- sdi-device (device session boundary)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/Deserialize for the enums and [`FrameRate`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod format;
pub mod frame;
pub mod mode;
pub mod sample;

pub use error::{Direction, Error, Result};
pub use format::{ColorMatrix, WireFormat};
pub use frame::{RgbFrame, RgbView, RgbViewMut, WireFrame, WireView, WireViewMut};
pub use mode::{DisplayMode, FrameRate};
pub use sample::{Sample, SampleType};

/// Prelude module for convenient imports.
///
/// ```
/// use sdi_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::format::{ColorMatrix, WireFormat};
    pub use crate::frame::{RgbFrame, RgbView, RgbViewMut, WireFrame, WireView, WireViewMut};
    pub use crate::mode::{DisplayMode, FrameRate};
    pub use crate::sample::{Sample, SampleType};
}
