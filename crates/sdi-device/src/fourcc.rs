//! Vendor pixel format codes.
//!
//! Hardware identifies pixel formats by a big-endian four-character code.
//! Conversion code never sees these; they are translated here, at the
//! session boundary.

use sdi_core::WireFormat;

use crate::error::{DeviceError, DeviceResult};

/// Packs a four-character code, first character in the high byte.
pub const fn fourcc(code: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*code)
}

/// Vendor code of a wire format.
pub const fn format_code(format: WireFormat) -> u32 {
    match format {
        WireFormat::Bgra8 => fourcc(b"BGRA"),
        WireFormat::Yuv8 => fourcc(b"2vuy"),
        WireFormat::Yuv10 => fourcc(b"v210"),
        WireFormat::Rgb10 => fourcc(b"R10l"),
        WireFormat::Rgb12 => fourcc(b"R12L"),
    }
}

/// Wire format of a vendor code.
pub fn format_from_code(code: u32) -> DeviceResult<WireFormat> {
    WireFormat::ALL
        .into_iter()
        .find(|f| format_code(*f) == code)
        .ok_or(DeviceError::UnknownFormatCode(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_fourcc_names() {
        for f in WireFormat::ALL {
            let bytes: [u8; 4] = f.fourcc().as_bytes().try_into().unwrap();
            assert_eq!(format_code(f), fourcc(&bytes));
            assert_eq!(format_from_code(format_code(f)).unwrap(), f);
        }
        assert_eq!(format_code(WireFormat::Yuv10), 0x7632_3130);
        assert_eq!(
            format_from_code(0x6e76_3132),
            Err(DeviceError::UnknownFormatCode(0x6e76_3132))
        );
    }
}
