//! RGB to wire conversion.
//!
//! | Format | Accepted samples | Path |
//! |--------|------------------|------|
//! | BGRA8 | u8 | 8-bit full range, no matrix |
//! | 2vuy | u8, u16, f32 | matrix, 8-bit Y'CbCr |
//! | v210 | u16, f32 | matrix, 10-bit Y'CbCr |
//! | R10l, R12L | u16, f32 | range mapping only |
//!
//! u16 input to the 4:4:4 formats with matching range flags is truncated
//! by a bit shift (`>> 6` for 10-bit, `>> 4` for 12-bit). Every other path
//! goes through normalized floats.

use sdi_color::range::check_unit;
use sdi_color::{ChannelKind, CodeRange, LumaCoefficients, RangePolicy, YcbcrRange};
use sdi_core::{
    Direction, Error, Result, RgbView, Sample, SampleType, WireFormat, WireFrame, WireViewMut,
};
use tracing::debug;

use crate::options::EncodeOptions;

const CHANNELS: [&str; 3] = ["R", "G", "B"];

/// True when `sample` input can be encoded to `format`.
pub const fn supports_encode(sample: SampleType, format: WireFormat) -> bool {
    match format {
        WireFormat::Bgra8 => matches!(sample, SampleType::U8),
        WireFormat::Yuv8 => true,
        WireFormat::Yuv10 | WireFormat::Rgb10 | WireFormat::Rgb12 => {
            !matches!(sample, SampleType::U8)
        }
    }
}

/// Encodes an RGB frame into a newly allocated wire buffer.
pub fn encode<T: Sample>(src: RgbView<'_, T>, format: WireFormat, opts: &EncodeOptions) -> Result<WireFrame> {
    check_supported::<T>(format)?;
    let mut frame = WireFrame::new(format, src.width(), src.height())?;
    encode_into(src, &mut frame.view_mut(), opts)?;
    Ok(frame)
}

/// Encodes an RGB frame into caller storage.
///
/// The destination's format selects the wire layout; its geometry must
/// match the source.
pub fn encode_into<T: Sample>(
    src: RgbView<'_, T>,
    dst: &mut WireViewMut<'_>,
    opts: &EncodeOptions,
) -> Result<()> {
    let format = dst.format();
    check_supported::<T>(format)?;
    let (width, height) = (src.width(), src.height());
    if (width, height) != (dst.width(), dst.height()) {
        return Err(Error::invalid_shape(
            width,
            height,
            format!("destination is {}x{}", dst.width(), dst.height()),
        ));
    }
    if opts.policy == RangePolicy::Strict {
        // BGRA8 input is always full range
        let narrow = opts.input_narrow && format != WireFormat::Bgra8;
        check_samples(src, narrow)?;
    }
    debug!(
        %format,
        sample = %T::KIND,
        width,
        height,
        matrix = %opts.matrix,
        output_narrow = opts.output_narrow,
        "encode"
    );

    let bits = format.bit_depth();
    let data = dst.data_mut();
    let pixel = |x: usize, y: usize| src.pixel(x as u32, y as u32);

    match format {
        WireFormat::Yuv8 | WireFormat::Yuv10 => {
            let k = LumaCoefficients::for_matrix(opts.matrix);
            let range = YcbcrRange::new(bits, opts.output_narrow);
            sdi_pack::pack_frame(format, width, height, data, |x, y| {
                let rgb = unit_rgb(pixel(x, y), opts.input_narrow);
                range.quantize(k.rgb_to_ycbcr(rgb))
            })
        }
        WireFormat::Bgra8 => {
            let range = CodeRange::new(8, ChannelKind::Rgb, false);
            sdi_pack::pack_frame(format, width, height, data, |x, y| {
                pixel(x, y).map(|v| range.quantize(v.to_unit(false)))
            })
        }
        WireFormat::Rgb10 | WireFormat::Rgb12 => {
            let range = CodeRange::new(bits, ChannelKind::Rgb, opts.output_narrow);
            let shift = (opts.input_narrow == opts.output_narrow).then_some(16 - bits);
            sdi_pack::pack_frame(format, width, height, data, |x, y| {
                pixel(x, y).map(|v| match (shift, v.exact_u16()) {
                    (Some(s), Some(raw)) => raw >> s,
                    _ => range.quantize(v.to_unit(opts.input_narrow)),
                })
            })
        }
    }
}

fn check_supported<T: Sample>(format: WireFormat) -> Result<()> {
    if supports_encode(T::KIND, format) {
        Ok(())
    } else {
        Err(Error::unsupported(T::KIND, format, Direction::Encode))
    }
}

/// Strict mode pre-pass. Nothing is written when any sample fails.
fn check_samples<T: Sample>(src: RgbView<'_, T>, narrow: bool) -> Result<()> {
    for px in src.as_slice().chunks_exact(3) {
        for (v, channel) in px.iter().zip(CHANNELS) {
            check_unit(v.to_unit(narrow), RangePolicy::Strict, channel)?;
        }
    }
    Ok(())
}

#[inline]
fn unit_rgb<T: Sample>(px: [T; 3], narrow: bool) -> [f32; 3] {
    px.map(|v| {
        let u = v.to_unit(narrow);
        if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) }
    })
}
