//! Wire to RGB conversion.
//!
//! 4:2:2 formats are upsampled by repeating each pair's chroma. BGRA8 is
//! scaled by 1/255 with no matrix and no range mapping; the other formats
//! honour [`DecodeOptions`].

use sdi_color::{ChannelKind, CodeRange, LumaCoefficients, YcbcrRange};
use sdi_core::{Direction, Error, Result, RgbFrame, RgbViewMut, Sample, SampleType, WireFormat, WireView};
use tracing::debug;

use crate::options::DecodeOptions;

/// True when `format` can be decoded into `sample` output.
pub const fn supports_decode(sample: SampleType, format: WireFormat) -> bool {
    match format {
        WireFormat::Bgra8 => matches!(sample, SampleType::U8 | SampleType::F32),
        WireFormat::Yuv8 | WireFormat::Yuv10 | WireFormat::Rgb10 | WireFormat::Rgb12 => {
            matches!(sample, SampleType::U16 | SampleType::F32)
        }
    }
}

/// Decodes a wire buffer into a newly allocated RGB frame.
pub fn decode<T: Sample>(wire: WireView<'_>, opts: &DecodeOptions) -> Result<RgbFrame<T>> {
    check_supported::<T>(wire.format())?;
    let mut frame = RgbFrame::new(wire.width(), wire.height())?;
    decode_into(wire, &mut frame.view_mut(), opts)?;
    Ok(frame)
}

/// Decodes a wire buffer into caller storage of the same geometry.
pub fn decode_into<T: Sample>(
    wire: WireView<'_>,
    dst: &mut RgbViewMut<'_, T>,
    opts: &DecodeOptions,
) -> Result<()> {
    let format = wire.format();
    check_supported::<T>(format)?;
    let (width, height) = (wire.width(), wire.height());
    if (width, height) != (dst.width(), dst.height()) {
        return Err(Error::invalid_shape(
            dst.width(),
            dst.height(),
            format!("source is {width}x{height}"),
        ));
    }
    debug!(
        %format,
        sample = %T::KIND,
        width,
        height,
        matrix = %opts.matrix,
        input_narrow = opts.input_narrow,
        "decode"
    );

    let bits = format.bit_depth();
    let narrow = opts.output_narrow;
    let out = dst.as_mut_slice();

    match format {
        WireFormat::Yuv8 | WireFormat::Yuv10 => {
            let k = LumaCoefficients::for_matrix(opts.matrix);
            let range = YcbcrRange::new(bits, opts.input_narrow);
            sdi_pack::unpack_frame::<T, _, 3>(format, width, height, wire.data(), out, |codes| {
                k.ycbcr_to_rgb(range.normalize(codes)).map(|v| T::from_unit(v, narrow))
            })
        }
        WireFormat::Bgra8 => {
            sdi_pack::unpack_frame::<T, _, 3>(format, width, height, wire.data(), out, |codes| {
                codes.map(|c| T::from_unit(c as f32 / 255.0, false))
            })
        }
        WireFormat::Rgb10 | WireFormat::Rgb12 => {
            let range = CodeRange::new(bits, ChannelKind::Rgb, opts.input_narrow);
            sdi_pack::unpack_frame::<T, _, 3>(format, width, height, wire.data(), out, |codes| {
                codes.map(|c| T::from_unit(range.normalize(c).clamp(0.0, 1.0), narrow))
            })
        }
    }
}

fn check_supported<T: Sample>(format: WireFormat) -> Result<()> {
    if supports_decode(T::KIND, format) {
        Ok(())
    } else {
        Err(Error::unsupported(T::KIND, format, Direction::Decode))
    }
}
