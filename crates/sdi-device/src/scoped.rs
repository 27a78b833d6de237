//! Scoped session ownership.
//!
//! A [`ScopedSession`] closes its session when it goes out of scope, on
//! every exit path including `?` and panics. Use [`ScopedSession::release`]
//! to observe the close result instead of having it logged.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use sdi_core::{ColorMatrix, DisplayMode, WireFormat, WireFrame};
use sdi_hdr::HdrMetadata;
use tracing::{debug, warn};

use crate::error::{DeviceResult, Role};
use crate::session::{CapturedFrame, ModeInfo, Session};

/// Owns a session and closes it on drop.
#[derive(Debug)]
pub struct ScopedSession<S: Session> {
    inner: S,
}

impl<S: Session> ScopedSession<S> {
    /// Takes ownership of an open session.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Closes now and reports the result.
    pub fn release(mut self) -> DeviceResult<()> {
        self.inner.close()
    }
}

impl<S: Session> Deref for ScopedSession<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.inner
    }
}

impl<S: Session> DerefMut for ScopedSession<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}

impl<S: Session> Session for ScopedSession<S> {
    fn role(&self) -> Role {
        self.inner.role()
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    fn supports_mode(&self, mode: DisplayMode) -> bool {
        self.inner.supports_mode(mode)
    }

    fn supports_format(&self, mode: DisplayMode, format: WireFormat) -> bool {
        self.inner.supports_format(mode, format)
    }

    fn negotiate_mode(&mut self, mode: DisplayMode) -> DeviceResult<ModeInfo> {
        self.inner.negotiate_mode(mode)
    }

    fn set_wire_format(&mut self, format: WireFormat) -> DeviceResult<()> {
        self.inner.set_wire_format(format)
    }

    fn push_frame(&mut self, frame: &WireFrame) -> DeviceResult<()> {
        self.inner.push_frame(frame)
    }

    fn capture_frame(&mut self, timeout: Duration) -> DeviceResult<CapturedFrame> {
        self.inner.capture_frame(timeout)
    }

    fn set_output_hdr_metadata(&mut self, matrix: ColorMatrix, hdr: &HdrMetadata) -> DeviceResult<()> {
        self.inner.set_output_hdr_metadata(matrix, hdr)
    }

    fn clear_output_hdr_metadata(&mut self) -> DeviceResult<()> {
        self.inner.clear_output_hdr_metadata()
    }

    fn close(&mut self) -> DeviceResult<()> {
        self.inner.close()
    }
}

impl<S: Session> Drop for ScopedSession<S> {
    fn drop(&mut self) {
        if !self.inner.is_open() {
            return;
        }
        let role = self.inner.role();
        match self.inner.close() {
            Ok(()) => debug!(%role, "session released"),
            Err(e) => warn!(%role, error = %e, "session close failed"),
        }
    }
}
