//! # sdi-device
//!
//! The boundary between the conversion engine and video hardware.
//!
//! - [`Device`], [`Session`] - what a hardware driver implements
//! - [`ScopedSession`] - session that is released on every exit path
//! - [`OutputPipeline`] - policy, conversion and push in one call
//! - [`LoopbackDevice`] - in-memory card with output cabled to input
//! - [`fourcc`] - vendor pixel format codes
//!
//! # Usage
//!
//! ```rust
//! use std::time::Duration;
//! use sdi_convert::Pattern;
//! use sdi_core::{DisplayMode, WireFormat};
//! use sdi_device::{Device, FrameRequest, LoopbackDevice, OutputPipeline, Session};
//! use sdi_hdr::HdrMetadata;
//!
//! let card = LoopbackDevice::default();
//! let mut out = OutputPipeline::new(card.open_output_scoped(0).unwrap());
//! let request = FrameRequest::new(WireFormat::Yuv10).with_hdr(HdrMetadata::pq());
//! out.display_pattern(&Pattern::Bars75, DisplayMode::Hd1080p25, &request).unwrap();
//!
//! let mut input = card.open_input_scoped(0, None).unwrap();
//! let frame = input.capture_frame(Duration::from_millis(100)).unwrap();
//! assert!(frame.hdr.has_display_primaries());
//! ```
//!
//! # Dependencies
//!
//! - `sdi-core`, `sdi-color`, `sdi-hdr`, `sdi-convert`
//! - [`thiserror`] - [`DeviceError`]
//! - [`tracing`] - session lifecycle logging
//!
//! # Used By
//!
//! - `sdi-cli` - `loopback` command

#![warn(missing_docs)]

pub mod error;
pub mod fourcc;
pub mod loopback;
pub mod pipeline;
pub mod scoped;
pub mod session;

pub use error::{DeviceError, DeviceResult, Role};
pub use loopback::{LoopbackDevice, LoopbackSession};
pub use pipeline::{FrameRequest, OutputPipeline};
pub use scoped::ScopedSession;
pub use session::{CapturedFrame, Connection, Device, DeviceInfo, ModeInfo, Session};
