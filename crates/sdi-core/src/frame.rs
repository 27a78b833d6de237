//! Frame buffers.
//!
//! Two buffer families exist on either side of the engine:
//!
//! - [`RgbFrame`] / [`RgbView`] / [`RgbViewMut`] - application-side RGB,
//!   W×H×3 samples, contiguous row-major with no padding
//! - [`WireFrame`] / [`WireView`] / [`WireViewMut`] - packed bytes in one
//!   [`WireFormat`], sized by [`WireFormat::frame_bytes`]
//!
//! Views borrow caller storage so the real-time path can run without
//! per-frame allocation. All constructors validate the geometry and
//! report mismatches as [`Error::InvalidShape`] or
//! [`Error::InvalidBufferSize`].
//!
//! # Example
//!
//! ```
//! use sdi_core::{RgbFrame, WireFormat, WireFrame};
//!
//! let frame: RgbFrame<u16> = RgbFrame::new(4, 2).unwrap();
//! assert_eq!(frame.as_slice().len(), 4 * 2 * 3);
//!
//! let wire = WireFrame::new(WireFormat::Yuv10, 4, 2).unwrap();
//! assert_eq!(wire.data().len(), 32);
//! ```

use crate::error::{Error, Result};
use crate::format::WireFormat;
use crate::sample::Sample;

fn check_dims(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_shape(width, height, "width and height must be non-zero"));
    }
    Ok(())
}

fn rgb_len(width: u32, height: u32) -> Result<usize> {
    check_dims(width, height)?;
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| Error::invalid_shape(width, height, "sample count overflows"))
}

fn check_rgb_len(width: u32, height: u32, len: usize) -> Result<()> {
    let expected = rgb_len(width, height)?;
    if len != expected {
        return Err(Error::invalid_shape(
            width,
            height,
            format!("expected {expected} samples (H x W x 3), got {len}"),
        ));
    }
    Ok(())
}

fn wire_len(format: WireFormat, width: u32, height: u32) -> Result<usize> {
    check_dims(width, height)?;
    format
        .checked_frame_bytes(width, height)
        .ok_or_else(|| Error::invalid_shape(width, height, "frame size overflows"))
}

fn check_wire_len(format: WireFormat, width: u32, height: u32, len: usize) -> Result<()> {
    let expected = wire_len(format, width, height)?;
    if len != expected {
        return Err(Error::buffer_size(format, width, height, expected, len));
    }
    Ok(())
}

// ============================================================================
// RGB buffers
// ============================================================================

/// Owned RGB frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbFrame<T: Sample> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Sample> RgbFrame<T> {
    /// Creates a frame filled with `T::default()` (black).
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = rgb_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![T::default(); len],
        })
    }

    /// Wraps existing samples. Length must be `width * height * 3`.
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        check_rgb_len(width, height, data.len())?;
        Ok(Self { width, height, data })
    }

    /// Builds a frame by evaluating `f(x, y)` per pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [T; 3]) -> Result<Self> {
        let len = rgb_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Ok(Self { width, height, data })
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples as a flat slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Samples as a flat mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the frame, returning its samples.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Pixel at (x, y). Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [T; 3] {
        self.view().pixel(x, y)
    }

    /// Borrowed view.
    #[inline]
    pub fn view(&self) -> RgbView<'_, T> {
        RgbView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    /// Mutable borrowed view.
    #[inline]
    pub fn view_mut(&mut self) -> RgbViewMut<'_, T> {
        RgbViewMut {
            width: self.width,
            height: self.height,
            data: &mut self.data,
        }
    }
}

/// Borrowed RGB frame.
#[derive(Debug, Clone, Copy)]
pub struct RgbView<'a, T: Sample> {
    width: u32,
    height: u32,
    data: &'a [T],
}

impl<'a, T: Sample> RgbView<'a, T> {
    /// Wraps a caller slice. Length must be `width * height * 3`.
    pub fn new(width: u32, height: u32, data: &'a [T]) -> Result<Self> {
        check_rgb_len(width, height, data.len())?;
        Ok(Self { width, height, data })
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples as a flat slice.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Samples of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [T] {
        let stride = self.width as usize * 3;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Pixel at (x, y). Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [T; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Mutable borrowed RGB frame.
#[derive(Debug)]
pub struct RgbViewMut<'a, T: Sample> {
    width: u32,
    height: u32,
    data: &'a mut [T],
}

impl<'a, T: Sample> RgbViewMut<'a, T> {
    /// Wraps a caller slice. Length must be `width * height * 3`.
    pub fn new(width: u32, height: u32, data: &'a mut [T]) -> Result<Self> {
        check_rgb_len(width, height, data.len())?;
        Ok(Self { width, height, data })
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples as a flat mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data
    }

    /// Read-only view of the same storage.
    #[inline]
    pub fn as_view(&self) -> RgbView<'_, T> {
        RgbView {
            width: self.width,
            height: self.height,
            data: self.data,
        }
    }
}

// ============================================================================
// Wire buffers
// ============================================================================

/// Owned wire buffer in one [`WireFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireFrame {
    format: WireFormat,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl WireFrame {
    /// Allocates a zeroed buffer of the exact size for the geometry.
    pub fn new(format: WireFormat, width: u32, height: u32) -> Result<Self> {
        let len = wire_len(format, width, height)?;
        Ok(Self {
            format,
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wraps received bytes, checking the size formula.
    pub fn from_bytes(format: WireFormat, width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_wire_len(format, width, height, data.len())?;
        Ok(Self {
            format,
            width,
            height,
            data,
        })
    }

    /// Wire format.
    #[inline]
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Packed bytes, mutable.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the frame, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Bytes per row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.format.row_bytes(self.width)
    }

    /// Borrowed view.
    #[inline]
    pub fn view(&self) -> WireView<'_> {
        WireView {
            format: self.format,
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    /// Mutable borrowed view.
    #[inline]
    pub fn view_mut(&mut self) -> WireViewMut<'_> {
        WireViewMut {
            format: self.format,
            width: self.width,
            height: self.height,
            data: &mut self.data,
        }
    }
}

/// Borrowed wire buffer.
#[derive(Debug, Clone, Copy)]
pub struct WireView<'a> {
    format: WireFormat,
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> WireView<'a> {
    /// Wraps caller bytes, checking the size formula.
    pub fn new(format: WireFormat, width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        check_wire_len(format, width, height, data.len())?;
        Ok(Self {
            format,
            width,
            height,
            data,
        })
    }

    /// Wire format.
    #[inline]
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed bytes.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Copies into an owned [`WireFrame`].
    pub fn to_owned(&self) -> WireFrame {
        WireFrame {
            format: self.format,
            width: self.width,
            height: self.height,
            data: self.data.to_vec(),
        }
    }
}

/// Mutable borrowed wire buffer, the target of `encode_into`.
#[derive(Debug)]
pub struct WireViewMut<'a> {
    format: WireFormat,
    width: u32,
    height: u32,
    data: &'a mut [u8],
}

impl<'a> WireViewMut<'a> {
    /// Wraps caller storage, checking the size formula.
    pub fn new(format: WireFormat, width: u32, height: u32, data: &'a mut [u8]) -> Result<Self> {
        check_wire_len(format, width, height, data.len())?;
        Ok(Self {
            format,
            width,
            height,
            data,
        })
    }

    /// Wire format.
    #[inline]
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed bytes, mutable.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_shape_validation() {
        assert!(RgbFrame::<u8>::from_vec(2, 2, vec![0; 12]).is_ok());

        let err = RgbFrame::<u8>::from_vec(2, 2, vec![0; 11]).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { .. }));

        let err = RgbFrame::<f32>::new(0, 10).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { width: 0, .. }));

        let data = [0u16; 9];
        assert!(RgbView::new(3, 1, &data).is_ok());
        assert!(RgbView::new(1, 3, &data).is_ok());
        assert!(RgbView::new(2, 2, &data).is_err());
    }

    #[test]
    fn test_rgb_access() {
        let frame = RgbFrame::<u16>::from_fn(3, 2, |x, y| [x as u16, y as u16, 7]).unwrap();
        assert_eq!(frame.pixel(2, 1), [2, 1, 7]);
        assert_eq!(frame.view().row(1), &[0, 1, 7, 1, 1, 7, 2, 1, 7]);
    }

    #[test]
    fn test_wire_size_validation() {
        let ok = WireFrame::from_bytes(WireFormat::Rgb12, 9, 1, vec![0; 72]);
        assert!(ok.is_ok());

        let err = WireFrame::from_bytes(WireFormat::Rgb12, 9, 1, vec![0; 36]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBufferSize {
                format: WireFormat::Rgb12,
                width: 9,
                height: 1,
                expected: 72,
                actual: 36,
            }
        );

        let mut buf = vec![0u8; 17];
        assert!(WireViewMut::new(WireFormat::Yuv10, 6, 1, &mut buf).is_err());
        assert!(WireViewMut::new(WireFormat::Yuv10, 6, 1, &mut buf[..16]).is_ok());
    }

    #[test]
    fn test_wire_size_overflow_is_rejected() {
        let err = WireView::new(WireFormat::Rgb12, u32::MAX, u32::MAX, &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { .. }), "{err:?}");
        assert!(WireFrame::new(WireFormat::Bgra8, u32::MAX, u32::MAX).is_err());
        assert!(WireFrame::from_bytes(WireFormat::Yuv10, u32::MAX, u32::MAX, Vec::new()).is_err());
        assert!(WireViewMut::new(WireFormat::Rgb10, u32::MAX, u32::MAX, &mut []).is_err());
    }
}
