//! The device and session seam.
//!
//! [`Device`] enumerates hardware and opens sessions; [`Session`] is one
//! open playout or capture channel. Everything behind these traits (SDK
//! bindings, callbacks, scheduling) is the implementor's business.

use std::time::Duration;

use sdi_convert::DecodeOptions;
use sdi_core::{ColorMatrix, DisplayMode, FrameRate, RgbFrame, Sample, WireFormat, WireFrame};
use sdi_hdr::{CapturedHdrMetadata, HdrMetadata};

use crate::error::{DeviceResult, Role};
use crate::scoped::ScopedSession;

/// One entry of a device listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Display name
    pub name: String,
    /// Can capture
    pub supports_input: bool,
    /// Can play out
    pub supports_output: bool,
}

/// Physical input connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connection {
    /// Coaxial SDI
    Sdi,
    /// HDMI
    Hdmi,
    /// Optical SDI
    OpticalSdi,
    /// Analogue component
    Component,
    /// Analogue composite
    Composite,
    /// S-Video
    SVideo,
}

/// Negotiated picture geometry and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeInfo {
    /// Mode preset
    pub mode: DisplayMode,
    /// Active width in pixels
    pub width: u32,
    /// Active height in lines
    pub height: u32,
    /// Frame rate
    pub frame_rate: FrameRate,
}

impl From<DisplayMode> for ModeInfo {
    fn from(mode: DisplayMode) -> Self {
        Self {
            mode,
            width: mode.width(),
            height: mode.height(),
            frame_rate: mode.frame_rate(),
        }
    }
}

/// A frame received by an input session.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    /// Wire bytes as received
    pub wire: WireFrame,
    /// Detected mode
    pub mode: DisplayMode,
    /// Detected pixel format
    pub detected_format: WireFormat,
    /// Signalled matrix, or the mode default when none was signalled
    pub matrix: ColorMatrix,
    /// HDR metadata, each group independently present
    pub hdr: CapturedHdrMetadata,
}

impl CapturedFrame {
    /// Decodes to RGB with the signalled matrix and default ranges.
    pub fn to_rgb<T: Sample>(&self) -> sdi_core::Result<RgbFrame<T>> {
        self.to_rgb_with(&DecodeOptions::default().matrix(self.matrix))
    }

    /// Decodes to RGB with explicit options.
    pub fn to_rgb_with<T: Sample>(&self, opts: &DecodeOptions) -> sdi_core::Result<RgbFrame<T>> {
        sdi_convert::decode(self.wire.view(), opts)
    }
}

/// A video device.
pub trait Device {
    /// Session type opened by this device.
    type Session: Session;

    /// Lists every device reachable through this driver.
    fn enumerate_devices(&self) -> Vec<DeviceInfo>;

    /// Connectors usable for capture on device `index`.
    fn input_connections(&self, index: usize) -> DeviceResult<Vec<Connection>>;

    /// Opens a playout session.
    fn open_output(&self, index: usize) -> DeviceResult<Self::Session>;

    /// Opens a capture session, on `connection` or the device default.
    fn open_input(&self, index: usize, connection: Option<Connection>) -> DeviceResult<Self::Session>;

    /// Opens a playout session that closes itself when dropped.
    fn open_output_scoped(&self, index: usize) -> DeviceResult<ScopedSession<Self::Session>> {
        self.open_output(index).map(ScopedSession::new)
    }

    /// Opens a capture session that closes itself when dropped.
    fn open_input_scoped(
        &self,
        index: usize,
        connection: Option<Connection>,
    ) -> DeviceResult<ScopedSession<Self::Session>> {
        self.open_input(index, connection).map(ScopedSession::new)
    }
}

/// An open playout or capture channel.
///
/// Output sessions use `negotiate_mode`, `set_wire_format`, the HDR
/// setters and `push_frame`. Input sessions use `negotiate_mode` and
/// `capture_frame`. Calling the other direction's operations fails with
/// [`DeviceError::WrongRole`](crate::DeviceError::WrongRole).
pub trait Session: Send {
    /// Playout or capture.
    fn role(&self) -> Role;

    /// False after [`close`](Session::close).
    fn is_open(&self) -> bool;

    /// True when the hardware offers `mode`.
    fn supports_mode(&self, mode: DisplayMode) -> bool;

    /// True when the hardware offers `format` in `mode`.
    fn supports_format(&self, mode: DisplayMode, format: WireFormat) -> bool;

    /// Selects a display mode and reports its geometry.
    fn negotiate_mode(&mut self, mode: DisplayMode) -> DeviceResult<ModeInfo>;

    /// Selects the pixel format for pushed frames.
    fn set_wire_format(&mut self, format: WireFormat) -> DeviceResult<()>;

    /// Schedules a frame for the next vertical interval.
    fn push_frame(&mut self, frame: &WireFrame) -> DeviceResult<()>;

    /// Waits up to `timeout` for the current input frame.
    fn capture_frame(&mut self, timeout: Duration) -> DeviceResult<CapturedFrame>;

    /// Attaches HDR metadata and the matrix to subsequent frames.
    fn set_output_hdr_metadata(&mut self, matrix: ColorMatrix, hdr: &HdrMetadata) -> DeviceResult<()>;

    /// Stops attaching HDR metadata.
    fn clear_output_hdr_metadata(&mut self) -> DeviceResult<()>;

    /// Releases the hardware. Idempotent.
    fn close(&mut self) -> DeviceResult<()>;
}
