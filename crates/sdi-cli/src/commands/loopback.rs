//! Playout and capture through the in-memory loopback card.

use crate::LoopbackArgs;
use anyhow::{Context, Result};
use sdi_convert::{ConvertConfig, Pattern};
use sdi_core::{DisplayMode, RgbFrame, Sample, WireFormat};
use sdi_device::{CapturedFrame, Device, FrameRequest, LoopbackDevice, OutputPipeline, Session};
use sdi_hdr::{HdrMetadata, HdrSidecar};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tracing::{info, trace};

/// Runs the loopback command.
pub fn run(args: LoopbackArgs, config: &ConvertConfig, verbose: u8) -> Result<()> {
    trace!(mode = %args.mode, pattern = %args.pattern, "loopback::run");

    let config = super::merge(&args.conv, config);
    let pattern = Pattern::from_name(&args.pattern)?;
    let mut request = FrameRequest::from(&config);
    request.hdr = match (&args.hdr, args.eotf) {
        (Some(path), _) => Some(load_sidecar(path)?),
        (None, Some(eotf)) => Some(HdrMetadata::reference(eotf)),
        (None, None) => None,
    };

    let card = LoopbackDevice::default();
    let timeout = Duration::from_millis(args.timeout_ms);
    let (captured, max_error) = if config.format == WireFormat::Bgra8 {
        play_and_capture::<u8>(&card, &pattern, args.mode, &request, timeout)?
    } else {
        play_and_capture::<f32>(&card, &pattern, args.mode, &request, timeout)?
    };
    info!(
        mode = %captured.mode,
        format = %captured.detected_format,
        matrix = %captured.matrix,
        max_error,
        "Captured"
    );

    if args.json {
        let report = json!({
            "mode": captured.mode.name(),
            "format": captured.detected_format.fourcc(),
            "matrix": captured.matrix.name(),
            "width": captured.wire.width(),
            "height": captured.wire.height(),
            "bytes": captured.wire.data().len(),
            "max_error": max_error,
            "hdr": captured.hdr,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} {} ({}x{}, {})",
        captured.mode,
        captured.detected_format,
        captured.matrix,
        captured.wire.width(),
        captured.wire.height(),
        super::format_size(captured.wire.data().len())
    );
    println!("max error: {max_error:.6}");
    println!("hdr: {}", serde_json::to_string_pretty(&captured.hdr)?);
    if verbose > 0 {
        match captured.hdr.to_metadata() {
            Ok(m) => println!("reconstructed: {m:?}"),
            Err(e) => println!("reconstructed: incomplete ({e})"),
        }
    }
    Ok(())
}

/// Reads an HDR sidecar; partial groups are rejected.
pub fn load_sidecar(path: &Path) -> Result<HdrMetadata> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read: {}", path.display()))?;
    let sidecar: HdrSidecar =
        serde_json::from_str(&text).with_context(|| format!("Invalid HDR sidecar: {}", path.display()))?;
    HdrMetadata::try_from(sidecar).with_context(|| format!("Invalid HDR metadata in {}", path.display()))
}

/// Displays `pattern`, captures it back and measures the worst error.
///
/// The error is taken over normalized full-range samples.
pub fn play_and_capture<T: Sample>(
    card: &LoopbackDevice,
    pattern: &Pattern,
    mode: DisplayMode,
    request: &FrameRequest,
    timeout: Duration,
) -> Result<(CapturedFrame, f32)> {
    let source: RgbFrame<T> = pattern.render(mode.width(), mode.height())?;

    let mut output = OutputPipeline::new(card.open_output_scoped(0)?);
    let plan = output.display_frame(source.view(), mode, request)?;
    trace!(format = %plan.format, substituted = plan.substituted, "playout");

    let mut input = card.open_input_scoped(0, None)?;
    let captured = input
        .capture_frame(timeout)
        .context("No signal on the loopback input")?;
    input.release()?;

    let back: RgbFrame<f32> = captured.to_rgb()?;
    let max_error = source
        .as_slice()
        .iter()
        .zip(back.as_slice())
        .map(|(s, b)| (s.to_unit(false) - b).abs())
        .fold(0.0f32, f32::max);
    Ok((captured, max_error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdi_hdr::Eotf;

    const WAIT: Duration = Duration::from_millis(200);

    #[test]
    fn test_pq_round_trip() {
        let card = LoopbackDevice::default();
        let request = FrameRequest::new(WireFormat::Yuv10).with_hdr(HdrMetadata::pq());
        let (cap, err) =
            play_and_capture::<f32>(&card, &Pattern::Bars75, DisplayMode::Hd720p50, &request, WAIT).unwrap();
        assert_eq!(cap.hdr.eotf, Eotf::Pq);
        assert!(err < 4.0 / 1024.0, "{err}");
        assert_eq!(card.open_sessions(), 0);
    }

    #[test]
    fn test_bgra_round_trip_is_exact() {
        let card = LoopbackDevice::default();
        let request = FrameRequest::new(WireFormat::Bgra8);
        let (cap, err) = play_and_capture::<u8>(&card, &Pattern::Bars, DisplayMode::Pal, &request, WAIT).unwrap();
        assert_eq!(cap.detected_format, WireFormat::Bgra8);
        assert!(err < 1e-6, "{err}");
    }

    #[test]
    fn test_sidecar_validation() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"eotf": "pq", "max_cll": 800.0}"#).unwrap();
        let hdr = load_sidecar(&good).unwrap();
        assert_eq!(hdr.eotf(), Eotf::Pq);
        assert_eq!(hdr.max_cll(), Some(800.0));

        let partial = dir.path().join("partial.json");
        std::fs::write(&partial, r#"{"eotf": "pq", "white_point": {"x": 0.3127, "y": 0.329}}"#).unwrap();
        assert!(load_sidecar(&partial).is_err());
    }
}
