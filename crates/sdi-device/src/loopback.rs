//! In-memory loopback device.
//!
//! Models one card with its output cabled to its input: whatever an output
//! session pushes becomes the signal every input session captures, together
//! with the HDR metadata attached at push time. The signal persists until
//! the output session that produced it closes, the same way a card keeps
//! repeating the last scheduled frame.
//!
//! Metadata crosses the cable as an [`HdrFieldSet`] and the pixel format as
//! its vendor code, so captures exercise the same parsing a real input
//! does.
//!
//! To model hardware refusals, 12-bit RGB is not offered in SD modes.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use sdi_convert::policy::default_matrix_for_mode;
use sdi_core::{ColorMatrix, DisplayMode, WireFormat, WireFrame};
use sdi_hdr::{CapturedHdrMetadata, HdrFieldSet, HdrMetadata};
use tracing::{debug, trace};

use crate::error::{DeviceError, DeviceResult, Role};
use crate::fourcc::{format_code, format_from_code};
use crate::session::{CapturedFrame, Connection, Device, DeviceInfo, ModeInfo, Session};

/// Connectors offered by the loopback device.
pub const LOOPBACK_CONNECTIONS: [Connection; 2] = [Connection::Sdi, Connection::Hdmi];

/// What is currently on the cable.
#[derive(Debug, Clone)]
struct Signal {
    source: u64,
    mode: DisplayMode,
    format_code: u32,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
    fields: HdrFieldSet,
}

#[derive(Debug, Default)]
struct State {
    signal: Option<Signal>,
    next_session: u64,
    open_sessions: usize,
    pushed: u64,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<State>,
    frame_ready: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A single loopback card.
#[derive(Debug, Clone)]
pub struct LoopbackDevice {
    name: String,
    shared: Arc<Shared>,
}

impl Default for LoopbackDevice {
    fn default() -> Self {
        Self::new("Loopback")
    }
}

impl LoopbackDevice {
    /// Creates a device listed under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: Arc::default(),
        }
    }

    /// Sessions opened and not yet closed.
    pub fn open_sessions(&self) -> usize {
        self.shared.lock().open_sessions
    }

    /// Frames pushed since creation.
    pub fn frames_pushed(&self) -> u64 {
        self.shared.lock().pushed
    }

    /// True while an output signal is present.
    pub fn has_signal(&self) -> bool {
        self.shared.lock().signal.is_some()
    }

    fn check_index(&self, index: usize) -> DeviceResult<()> {
        if index != 0 {
            return Err(DeviceError::NotFound { index, count: 1 });
        }
        Ok(())
    }

    fn open(&self, role: Role, connection: Connection) -> LoopbackSession {
        let mut state = self.shared.lock();
        state.next_session += 1;
        state.open_sessions += 1;
        debug!(device = %self.name, %role, ?connection, "session opened");
        LoopbackSession {
            id: state.next_session,
            role,
            shared: Arc::clone(&self.shared),
            open: true,
            mode: None,
            format: None,
            hdr: None,
        }
    }
}

impl Device for LoopbackDevice {
    type Session = LoopbackSession;

    fn enumerate_devices(&self) -> Vec<DeviceInfo> {
        vec![DeviceInfo {
            name: self.name.clone(),
            supports_input: true,
            supports_output: true,
        }]
    }

    fn input_connections(&self, index: usize) -> DeviceResult<Vec<Connection>> {
        self.check_index(index)?;
        Ok(LOOPBACK_CONNECTIONS.to_vec())
    }

    fn open_output(&self, index: usize) -> DeviceResult<LoopbackSession> {
        self.check_index(index)?;
        Ok(self.open(Role::Output, Connection::Sdi))
    }

    fn open_input(&self, index: usize, connection: Option<Connection>) -> DeviceResult<LoopbackSession> {
        self.check_index(index)?;
        let connection = connection.unwrap_or(Connection::Sdi);
        if !LOOPBACK_CONNECTIONS.contains(&connection) {
            return Err(DeviceError::rejected(format!("{connection:?} input not present")));
        }
        Ok(self.open(Role::Input, connection))
    }
}

/// A session on a [`LoopbackDevice`].
#[derive(Debug)]
pub struct LoopbackSession {
    id: u64,
    role: Role,
    shared: Arc<Shared>,
    open: bool,
    mode: Option<DisplayMode>,
    format: Option<WireFormat>,
    hdr: Option<HdrFieldSet>,
}

impl LoopbackSession {
    /// Negotiated mode, if any.
    pub fn mode(&self) -> Option<DisplayMode> {
        self.mode
    }

    /// Selected wire format, if any.
    pub fn wire_format(&self) -> Option<WireFormat> {
        self.format
    }

    fn require(&self, operation: &'static str, role: Role) -> DeviceResult<()> {
        if !self.open {
            return Err(DeviceError::Closed);
        }
        if self.role != role {
            return Err(DeviceError::WrongRole {
                operation,
                role: self.role,
            });
        }
        Ok(())
    }
}

fn format_offered(mode: DisplayMode, format: WireFormat) -> bool {
    !(format == WireFormat::Rgb12 && mode.is_sd())
}

impl Session for LoopbackSession {
    fn role(&self) -> Role {
        self.role
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn supports_mode(&self, _mode: DisplayMode) -> bool {
        true
    }

    fn supports_format(&self, mode: DisplayMode, format: WireFormat) -> bool {
        format_offered(mode, format)
    }

    fn negotiate_mode(&mut self, mode: DisplayMode) -> DeviceResult<ModeInfo> {
        if !self.open {
            return Err(DeviceError::Closed);
        }
        if !self.supports_mode(mode) {
            return Err(DeviceError::UnsupportedMode(mode));
        }
        if self.format.is_some_and(|f| !format_offered(mode, f)) {
            self.format = None;
        }
        self.mode = Some(mode);
        trace!(session = self.id, %mode, "negotiate_mode");
        Ok(ModeInfo::from(mode))
    }

    fn set_wire_format(&mut self, format: WireFormat) -> DeviceResult<()> {
        self.require("set_wire_format", Role::Output)?;
        let mode = self.mode.ok_or(DeviceError::NotConfigured("no display mode"))?;
        if !format_offered(mode, format) {
            return Err(DeviceError::format_rejected(format, mode));
        }
        self.format = Some(format);
        trace!(session = self.id, %format, "set_wire_format");
        Ok(())
    }

    fn push_frame(&mut self, frame: &WireFrame) -> DeviceResult<()> {
        self.require("push_frame", Role::Output)?;
        let mode = self.mode.ok_or(DeviceError::NotConfigured("no display mode"))?;
        let format = self.format.ok_or(DeviceError::NotConfigured("no wire format"))?;
        if frame.format() != format {
            return Err(DeviceError::rejected(format!(
                "frame is {}, session expects {format}",
                frame.format()
            )));
        }
        if (frame.width(), frame.height()) != mode.dimensions() {
            return Err(DeviceError::rejected(format!(
                "frame is {}x{}, {mode} is {}x{}",
                frame.width(),
                frame.height(),
                mode.width(),
                mode.height()
            )));
        }

        let signal = Signal {
            source: self.id,
            mode,
            format_code: format_code(format),
            width: frame.width(),
            height: frame.height(),
            bytes: frame.data().to_vec(),
            fields: self.hdr.clone().unwrap_or_default(),
        };
        let mut state = self.shared.lock();
        state.signal = Some(signal);
        state.pushed += 1;
        drop(state);
        self.shared.frame_ready.notify_all();
        trace!(session = self.id, %format, bytes = frame.data().len(), "push_frame");
        Ok(())
    }

    fn capture_frame(&mut self, timeout: Duration) -> DeviceResult<CapturedFrame> {
        self.require("capture_frame", Role::Input)?;
        let state = self.shared.lock();
        let (state, _) = self
            .shared
            .frame_ready
            .wait_timeout_while(state, timeout, |s| s.signal.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        let signal = state.signal.clone().ok_or(DeviceError::Timeout(timeout))?;
        drop(state);

        let format = format_from_code(signal.format_code)?;
        let wire = WireFrame::from_bytes(format, signal.width, signal.height, signal.bytes)?;
        let hdr = CapturedHdrMetadata::from_fields(&signal.fields);
        let matrix = hdr.matrix.unwrap_or_else(|| default_matrix_for_mode(signal.mode));
        trace!(session = self.id, %format, mode = %signal.mode, "capture_frame");
        Ok(CapturedFrame {
            wire,
            mode: signal.mode,
            detected_format: format,
            matrix,
            hdr,
        })
    }

    fn set_output_hdr_metadata(&mut self, matrix: ColorMatrix, hdr: &HdrMetadata) -> DeviceResult<()> {
        self.require("set_output_hdr_metadata", Role::Output)?;
        self.hdr = Some(HdrFieldSet::from_metadata(matrix, hdr));
        debug!(session = self.id, eotf = %hdr.eotf(), %matrix, "output HDR metadata set");
        Ok(())
    }

    fn clear_output_hdr_metadata(&mut self) -> DeviceResult<()> {
        self.require("clear_output_hdr_metadata", Role::Output)?;
        self.hdr = None;
        Ok(())
    }

    fn close(&mut self) -> DeviceResult<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        let mut state = self.shared.lock();
        state.open_sessions -= 1;
        if state.signal.as_ref().is_some_and(|s| s.source == self.id) {
            state.signal = None;
        }
        debug!(session = self.id, role = %self.role, "session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdi_hdr::Eotf;

    fn output(dev: &LoopbackDevice, mode: DisplayMode, format: WireFormat) -> LoopbackSession {
        let mut out = dev.open_output(0).unwrap();
        out.negotiate_mode(mode).unwrap();
        out.set_wire_format(format).unwrap();
        out
    }

    #[test]
    fn test_enumerate_and_open() {
        let dev = LoopbackDevice::new("Card");
        let list = dev.enumerate_devices();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Card");
        assert!(list[0].supports_input && list[0].supports_output);
        assert_eq!(dev.open_output(3).unwrap_err(), DeviceError::NotFound { index: 3, count: 1 });
        assert!(dev.open_input(0, Some(Connection::Composite)).is_err());
        assert_eq!(dev.input_connections(0).unwrap(), LOOPBACK_CONNECTIONS.to_vec());
    }

    #[test]
    fn test_push_then_capture() {
        let dev = LoopbackDevice::default();
        let mode = DisplayMode::Ntsc;
        let mut out = output(&dev, mode, WireFormat::Yuv10);
        let mut input = dev.open_input(0, None).unwrap();

        let mut frame = WireFrame::new(WireFormat::Yuv10, 720, 486).unwrap();
        frame.data_mut()[0] = 0xAB;
        out.push_frame(&frame).unwrap();

        let cap = input.capture_frame(Duration::from_millis(10)).unwrap();
        assert_eq!(cap.wire, frame);
        assert_eq!(cap.mode, mode);
        assert_eq!(cap.detected_format, WireFormat::Yuv10);
        assert_eq!(cap.matrix, ColorMatrix::Rec601);
        assert_eq!(cap.hdr, CapturedHdrMetadata::default());
        assert_eq!(dev.frames_pushed(), 1);
    }

    #[test]
    fn test_capture_times_out() {
        let dev = LoopbackDevice::default();
        let mut input = dev.open_input(0, Some(Connection::Hdmi)).unwrap();
        let t = Duration::from_millis(5);
        assert_eq!(input.capture_frame(t).unwrap_err(), DeviceError::Timeout(t));
    }

    #[test]
    fn test_rejections() {
        let dev = LoopbackDevice::default();
        let mut out = dev.open_output(0).unwrap();
        assert!(matches!(
            out.set_wire_format(WireFormat::Rgb10),
            Err(DeviceError::NotConfigured(_))
        ));
        out.negotiate_mode(DisplayMode::Pal).unwrap();
        assert!(!out.supports_format(DisplayMode::Pal, WireFormat::Rgb12));
        assert!(matches!(
            out.set_wire_format(WireFormat::Rgb12),
            Err(DeviceError::Rejected(_))
        ));
        out.set_wire_format(WireFormat::Rgb10).unwrap();

        let wrong_size = WireFrame::new(WireFormat::Rgb10, 720, 486).unwrap();
        assert!(matches!(out.push_frame(&wrong_size), Err(DeviceError::Rejected(_))));
        let wrong_format = WireFrame::new(WireFormat::Yuv10, 720, 576).unwrap();
        assert!(matches!(out.push_frame(&wrong_format), Err(DeviceError::Rejected(_))));
        assert!(!dev.has_signal());

        assert!(matches!(
            out.capture_frame(Duration::ZERO),
            Err(DeviceError::WrongRole { role: Role::Output, .. })
        ));
    }

    #[test]
    fn test_close_drops_signal() {
        let dev = LoopbackDevice::default();
        let mut out = output(&dev, DisplayMode::Hd720p50, WireFormat::Bgra8);
        out.push_frame(&WireFrame::new(WireFormat::Bgra8, 1280, 720).unwrap()).unwrap();
        assert!(dev.has_signal());
        assert_eq!(dev.open_sessions(), 1);

        out.close().unwrap();
        out.close().unwrap();
        assert!(!dev.has_signal());
        assert_eq!(dev.open_sessions(), 0);
        assert_eq!(
            out.push_frame(&WireFrame::new(WireFormat::Bgra8, 1280, 720).unwrap()),
            Err(DeviceError::Closed)
        );
    }

    #[test]
    fn test_hdr_travels_with_frame() {
        let dev = LoopbackDevice::default();
        let mut out = output(&dev, DisplayMode::Hd1080p25, WireFormat::Rgb12);
        out.set_output_hdr_metadata(ColorMatrix::Rec2020, &HdrMetadata::hlg()).unwrap();
        out.push_frame(&WireFrame::new(WireFormat::Rgb12, 1920, 1080).unwrap()).unwrap();

        let mut input = dev.open_input(0, None).unwrap();
        let cap = input.capture_frame(Duration::from_millis(10)).unwrap();
        assert_eq!(cap.hdr.eotf, Eotf::Hlg);
        assert_eq!(cap.matrix, ColorMatrix::Rec2020);

        out.clear_output_hdr_metadata().unwrap();
        out.push_frame(&WireFrame::new(WireFormat::Rgb12, 1920, 1080).unwrap()).unwrap();
        let cap = input.capture_frame(Duration::from_millis(10)).unwrap();
        assert_eq!(cap.hdr.eotf, Eotf::Sdr);
        assert_eq!(cap.matrix, ColorMatrix::Rec709);
    }

    #[test]
    fn test_capture_wakes_on_push() {
        let dev = LoopbackDevice::default();
        let mut input = dev.open_input(0, None).unwrap();
        let mut out = output(&dev, DisplayMode::Hd720p60, WireFormat::Yuv8);

        std::thread::scope(|s| {
            let waiter = s.spawn(move || input.capture_frame(Duration::from_secs(5)));
            std::thread::sleep(Duration::from_millis(20));
            out.push_frame(&WireFrame::new(WireFormat::Yuv8, 1280, 720).unwrap()).unwrap();
            let cap = waiter.join().unwrap().unwrap();
            assert_eq!(cap.detected_format, WireFormat::Yuv8);
        });
    }
}
