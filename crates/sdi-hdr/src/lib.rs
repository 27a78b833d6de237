//! # sdi-hdr
//!
//! HDR static metadata carried alongside broadcast video frames.
//!
//! - [`HdrMetadata`] - validated output-side value: transfer function plus
//!   optional mastering display and content light information
//! - [`HdrFieldSet`] - flat per-field form exchanged with devices
//! - [`CapturedHdrMetadata`] - capture-side view with independent presence
//!   per group
//!
//! Metadata never affects pixel arithmetic. It only tells the downstream
//! display how to interpret the signal.
//!
//! # Usage
//!
//! ```rust
//! use sdi_core::ColorMatrix;
//! use sdi_hdr::{CapturedHdrMetadata, Eotf, HdrFieldSet, HdrMetadata};
//!
//! let out = HdrMetadata::sdr().with_eotf(Eotf::Pq);
//! let fields = HdrFieldSet::from_metadata(ColorMatrix::Rec2020, &out);
//!
//! let captured = CapturedHdrMetadata::from_fields(&fields);
//! assert!(captured.has_display_primaries());
//! assert_eq!(captured.max_fall, Some(50.0));
//! ```
//!
//! # Dependencies
//!
//! - `sdi-core` - error type, colour matrix
//! - [`serde`] - sidecar serialization
//!
//! # Used By
//!
//! - `sdi-device` - metadata transport on sessions
//! - `sdi-cli` - JSON sidecars

#![warn(missing_docs)]

pub mod fields;
pub mod metadata;

pub use fields::{CapturedHdrMetadata, HdrField, HdrFieldSet, matrix_code, matrix_from_code};
pub use metadata::{
    Chromaticity, D65, DisplayPrimaries, Eotf, HdrMetadata, HdrMetadataBuilder, HdrSidecar,
    MasteringLuminance, REC709_PRIMARIES, REC2020_PRIMARIES,
};
