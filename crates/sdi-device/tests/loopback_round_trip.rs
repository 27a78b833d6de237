//! Output to input through the loopback card.

use std::time::Duration;

use approx::assert_abs_diff_eq;
use sdi_convert::Pattern;
use sdi_core::{ColorMatrix, DisplayMode, RgbFrame, WireFormat};
use sdi_device::{Device, DeviceError, DeviceResult, FrameRequest, LoopbackDevice, OutputPipeline, Session};
use sdi_hdr::{Chromaticity, D65, Eotf, HdrMetadata, REC2020_PRIMARIES};

const WAIT: Duration = Duration::from_millis(200);

#[test]
fn pq_metadata_survives_the_cable() {
    let card = LoopbackDevice::default();
    let mode = DisplayMode::Hd1080p25;
    let mut out = OutputPipeline::new(card.open_output_scoped(0).unwrap());
    let request = FrameRequest::new(WireFormat::Yuv10)
        .with_matrix(ColorMatrix::Rec2020)
        .with_hdr(HdrMetadata::sdr().with_eotf(Eotf::Pq));
    out.display_pattern(&Pattern::Bars75, mode, &request).unwrap();

    let mut input = card.open_input_scoped(0, None).unwrap();
    let cap = input.capture_frame(WAIT).unwrap();
    assert_eq!(cap.matrix, ColorMatrix::Rec2020);
    assert_eq!(cap.hdr.eotf, Eotf::Pq);
    assert!(cap.hdr.has_display_primaries());
    assert!(cap.hdr.has_white_point());

    let p = cap.hdr.full_primaries().unwrap();
    let expected = [
        (p.red, REC2020_PRIMARIES.red),
        (p.green, REC2020_PRIMARIES.green),
        (p.blue, REC2020_PRIMARIES.blue),
        (p.white, D65),
    ];
    for (got, want) in expected {
        assert_abs_diff_eq!(got.x, want.x, epsilon = 1e-4);
        assert_abs_diff_eq!(got.y, want.y, epsilon = 1e-4);
    }
    let lum = cap.hdr.mastering_luminance.unwrap();
    assert_abs_diff_eq!(lum.max, 1000.0, epsilon = 1e-4);
    assert_abs_diff_eq!(lum.min, 0.0001, epsilon = 1e-8);
    assert_eq!(cap.hdr.to_metadata().unwrap(), HdrMetadata::pq());
}

#[test]
fn custom_metadata_round_trip() {
    let hdr = HdrMetadata::builder(Eotf::Hlg)
        .primaries(
            Chromaticity::new(0.68, 0.32),
            Chromaticity::new(0.265, 0.69),
            Chromaticity::new(0.15, 0.06),
        )
        .white_point(D65)
        .max_mastering_luminance(4000.0)
        .min_mastering_luminance(0.005)
        .max_cll(2500.0)
        .build()
        .unwrap();

    let card = LoopbackDevice::default();
    let mut out = OutputPipeline::new(card.open_output_scoped(0).unwrap());
    let request = FrameRequest::new(WireFormat::Rgb12).with_hdr(hdr.clone());
    out.display_pattern(&Pattern::Solid([0.5; 3]), DisplayMode::Uhd2160p25, &request)
        .unwrap();

    let cap = card.open_input_scoped(0, None).unwrap().capture_frame(WAIT).unwrap();
    assert_eq!(cap.hdr.max_cll, Some(2500.0));
    assert!(!cap.hdr.has_max_fall());
    assert_eq!(cap.hdr.to_metadata().unwrap(), hdr);
}

#[test]
fn picture_survives_the_cable() {
    let card = LoopbackDevice::default();
    let mode = DisplayMode::Hd720p50;
    let src: RgbFrame<f32> = Pattern::Bars75.render(mode.width(), mode.height()).unwrap();

    for format in [WireFormat::Yuv8, WireFormat::Yuv10, WireFormat::Rgb10, WireFormat::Rgb12] {
        let mut out = OutputPipeline::new(card.open_output_scoped(0).unwrap());
        out.display_frame(src.view(), mode, &FrameRequest::new(format)).unwrap();

        let mut input = card.open_input_scoped(0, None).unwrap();
        let cap = input.capture_frame(WAIT).unwrap();
        assert_eq!(cap.detected_format, format);
        assert_eq!(cap.matrix, ColorMatrix::Rec709);

        let back: RgbFrame<f32> = cap.to_rgb().unwrap();
        let tol = 4.0 / (1u32 << format.bit_depth()) as f32;
        let worst = src
            .as_slice()
            .iter()
            .zip(back.as_slice())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(worst <= tol, "{format}: {worst}");
    }
    assert_eq!(card.open_sessions(), 0);
}

fn failing_playout(card: &LoopbackDevice) -> DeviceResult<()> {
    let mut out = card.open_output_scoped(0)?;
    out.negotiate_mode(DisplayMode::Pal)?;
    out.set_wire_format(WireFormat::Rgb12)?;
    Ok(())
}

#[test]
fn scoped_sessions_release_on_error() {
    let card = LoopbackDevice::default();
    let err = failing_playout(&card).unwrap_err();
    assert!(matches!(err, DeviceError::Rejected(_)));
    assert_eq!(card.open_sessions(), 0);

    let scoped = card.open_input_scoped(0, None).unwrap();
    assert_eq!(card.open_sessions(), 1);
    scoped.release().unwrap();
    assert_eq!(card.open_sessions(), 0);
}

#[test]
fn signal_disappears_with_its_output() {
    let card = LoopbackDevice::default();
    let mut input = card.open_input_scoped(0, None).unwrap();
    {
        let mut out = OutputPipeline::new(card.open_output_scoped(0).unwrap());
        out.display_pattern(&Pattern::Bars, DisplayMode::Pal, &FrameRequest::new(WireFormat::Yuv8))
            .unwrap();
        assert!(input.capture_frame(WAIT).is_ok());
    }
    let short = Duration::from_millis(10);
    assert_eq!(input.capture_frame(short).unwrap_err(), DeviceError::Timeout(short));
}
