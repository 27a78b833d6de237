//! Device-layer errors.
//!
//! Kept apart from [`sdi_core::Error`]: conversion errors are caller bugs
//! that must never be retried, while device errors (timeouts, refusals)
//! belong to the session and may be retried by whoever owns it.

use std::time::Duration;

use sdi_core::{DisplayMode, WireFormat};
use thiserror::Error;

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors raised by a device or session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviceError {
    /// No device at this index.
    #[error("no device at index {index} ({count} available)")]
    NotFound {
        /// Requested index
        index: usize,
        /// Number of devices present
        count: usize,
    },

    /// Operation not available for this session's direction.
    #[error("{operation} is not available on an {role} session")]
    WrongRole {
        /// Operation name
        operation: &'static str,
        /// Session direction
        role: Role,
    },

    /// Session used after close.
    #[error("session is closed")]
    Closed,

    /// Operation needs a negotiated mode or format first.
    #[error("session not configured: {0}")]
    NotConfigured(&'static str),

    /// Mode not offered by the hardware.
    #[error("display mode {0} is not supported")]
    UnsupportedMode(DisplayMode),

    /// Hardware refused a request.
    #[error("rejected: {0}")]
    Rejected(String),

    /// No frame arrived within the capture timeout.
    #[error("no frame within {0:?}")]
    Timeout(Duration),

    /// Unrecognised vendor pixel format code.
    #[error("unknown pixel format code {0:#010x}")]
    UnknownFormatCode(u32),

    /// Conversion failed before anything reached the device.
    #[error(transparent)]
    Convert(#[from] sdi_core::Error),
}

impl DeviceError {
    /// Shorthand for [`DeviceError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Refusal of a format in a mode.
    pub fn format_rejected(format: WireFormat, mode: DisplayMode) -> Self {
        Self::Rejected(format!("{format} is not available in {mode}"))
    }

    /// True for failures worth retrying on the same session.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Direction of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Playout
    Output,
    /// Capture
    Input,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Role::Output => "output",
            Role::Input => "input",
        })
    }
}
