//! Encode then decode through every wire format.

use sdi_convert::{DecodeOptions, EncodeOptions, Pattern, decode, decode_into, encode, encode_into};
use sdi_core::{ColorMatrix, Error, RgbFrame, RgbViewMut, WireFormat, WireFrame};

fn max_error(a: &RgbFrame<f32>, b: &RgbFrame<f32>) -> f32 {
    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

#[test]
fn bars75_round_trip_every_format() {
    // bar width 6 keeps each chroma pair inside one bar
    let (w, h) = (48, 4);
    let src: RgbFrame<f32> = Pattern::Bars75.render(w, h).unwrap();

    for matrix in ColorMatrix::ALL {
        let enc = EncodeOptions::default().matrix(matrix);
        let dec = DecodeOptions::from(enc);
        for format in [WireFormat::Yuv8, WireFormat::Yuv10, WireFormat::Rgb10, WireFormat::Rgb12] {
            let wire = encode(src.view(), format, &enc).unwrap();
            assert_eq!(wire.data().len(), format.frame_bytes(w, h));
            let back: RgbFrame<f32> = decode(wire.view(), &dec).unwrap();
            let tol = 4.0 / (1u32 << format.bit_depth()) as f32;
            let err = max_error(&src, &back);
            assert!(err <= tol, "{matrix} {format}: error {err} > {tol}");
        }
    }

    let src8: RgbFrame<u8> = Pattern::Bars75.render(w, h).unwrap();
    let wire = encode(src8.view(), WireFormat::Bgra8, &EncodeOptions::default()).unwrap();
    let back: RgbFrame<u8> = decode(wire.view(), &DecodeOptions::default()).unwrap();
    assert_eq!(back, src8);
}

#[test]
fn u16_narrow_round_trip_is_exact_on_rgb() {
    let src = RgbFrame::<u16>::from_fn(7, 3, |x, y| {
        let v = (64 + x * 100 + y * 37) as u16;
        [v << 6, (940 - v + 64) << 6, 512 << 6]
    })
    .unwrap();
    let enc = EncodeOptions::default().ranges(true, true);
    let wire = encode(src.view(), WireFormat::Rgb10, &enc).unwrap();
    let back: RgbFrame<u16> = decode(wire.view(), &DecodeOptions::from(enc)).unwrap();
    assert_eq!(back, src);
}

#[test]
fn into_variants_use_caller_storage() {
    let src: RgbFrame<f32> = Pattern::Checkerboard { size: 4 }.render(20, 6).unwrap();
    let format = WireFormat::Rgb12;
    let mut wire = WireFrame::new(format, 20, 6).unwrap();
    encode_into(src.view(), &mut wire.view_mut(), &EncodeOptions::default()).unwrap();
    assert_eq!(wire, encode(src.view(), format, &EncodeOptions::default()).unwrap());

    let mut out = vec![0.5f32; 20 * 6 * 3];
    let mut dst = RgbViewMut::new(20, 6, &mut out).unwrap();
    decode_into(wire.view(), &mut dst, &DecodeOptions::default()).unwrap();
    assert_eq!(out, src.as_slice());
}

#[test]
fn unsupported_combinations_fail_before_work() {
    let u8_frame: RgbFrame<u8> = Pattern::Bars.render(12, 2).unwrap();
    for format in [WireFormat::Yuv10, WireFormat::Rgb10, WireFormat::Rgb12] {
        let err = encode(u8_frame.view(), format, &EncodeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedSampleType { .. }), "{format}");
    }

    let f: RgbFrame<f32> = Pattern::Bars.render(12, 2).unwrap();
    assert!(encode(f.view(), WireFormat::Bgra8, &EncodeOptions::default()).is_err());

    let wire = encode(f.view(), WireFormat::Yuv8, &EncodeOptions::default()).unwrap();
    assert!(decode::<u8>(wire.view(), &DecodeOptions::default()).is_err());
}

#[test]
fn concurrent_calls_agree() {
    let src: RgbFrame<f32> = Pattern::default().render(64, 16).unwrap();
    let reference = encode(src.view(), WireFormat::Yuv10, &EncodeOptions::default()).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| encode(src.view(), WireFormat::Yuv10, &EncodeOptions::default())))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().unwrap(), reference);
        }
    });
}
