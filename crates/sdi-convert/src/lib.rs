//! # sdi-convert
//!
//! Conversion between application RGB frames and broadcast wire buffers.
//!
//! This crate composes the range mapper and colour matrices from
//! `sdi-color` with the codecs from `sdi-pack`:
//!
//! ```text
//!   RgbFrame<T> --encode--> [range in] -> [matrix] -> [range out] -> [pack] --> WireFrame
//!   WireFrame  --decode--> [unpack] -> [range in] -> [inverse matrix] -> [range out] --> RgbFrame<T>
//! ```
//!
//! - [`encode`] / [`decode`] - the pure conversion functions
//! - [`policy`] - default matrix and format substitution, applied above them
//! - [`pattern`] - colour bars, ramps and patches for line-up
//! - [`config`] - YAML-backed defaults
//!
//! The conversion functions are stateless and safe to call from several
//! threads at once.
//!
//! # Usage
//!
//! ```rust
//! use sdi_convert::{DecodeOptions, EncodeOptions, decode, encode};
//! use sdi_core::{RgbFrame, WireFormat};
//!
//! let white = RgbFrame::<u16>::from_fn(6, 1, |_, _| [65535; 3]).unwrap();
//! let wire = encode(white.view(), WireFormat::Yuv10, &EncodeOptions::default()).unwrap();
//! assert_eq!(wire.data().len(), 16);
//!
//! let back: RgbFrame<u16> = decode(wire.view(), &DecodeOptions::default()).unwrap();
//! assert_eq!(back.pixel(0, 0), [65535; 3]);
//! ```
//!
//! # Dependencies
//!
//! - `sdi-core`, `sdi-color`, `sdi-pack`
//! - [`serde`], [`serde_yaml`] - config and pattern serialization
//! - [`tracing`] - call-level diagnostics
//!
//! # Used By
//!
//! - `sdi-device` - output pipeline
//! - `sdi-cli`

#![warn(missing_docs)]

pub mod config;
pub mod decode;
pub mod encode;
pub mod options;
pub mod pattern;
pub mod policy;

pub use config::{ConfigError, ConvertConfig};
pub use decode::{decode, decode_into, supports_decode};
pub use encode::{encode, encode_into, supports_encode};
pub use options::{DecodeOptions, EncodeOptions};
pub use pattern::Pattern;
pub use policy::OutputPlan;
