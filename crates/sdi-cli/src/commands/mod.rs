//! CLI command implementations

pub mod decode;
pub mod encode;
pub mod formats;
pub mod loopback;
pub mod modes;
pub mod pattern;

use crate::ConversionArgs;
use anyhow::{Context, Result, bail};
use sdi_convert::policy::default_matrix_for;
use sdi_convert::{ConvertConfig, EncodeOptions};
use sdi_core::{RgbFrame, Sample};
use std::path::Path;
use tracing::debug;

/// Loads the config file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<ConvertConfig> {
    match path {
        Some(p) => {
            debug!(path = %p.display(), "loading config");
            ConvertConfig::load(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
        None => Ok(ConvertConfig::default()),
    }
}

/// Prints the effective config as YAML.
pub fn print_config(config: &ConvertConfig) -> Result<()> {
    let yaml = config.to_yaml().context("Failed to serialize config")?;
    print!("{yaml}");
    Ok(())
}

/// Applies command-line overrides on top of the config file.
pub fn merge(conv: &ConversionArgs, config: &ConvertConfig) -> ConvertConfig {
    ConvertConfig {
        format: conv.format.unwrap_or(config.format),
        matrix: conv.matrix.or(config.matrix),
        input_narrow: conv.rgb_range.map_or(config.input_narrow, |r| r.is_narrow()),
        output_narrow: conv.wire_range.map_or(config.output_narrow, |r| r.is_narrow()),
        strict: conv.strict || config.strict,
    }
}

/// Encode options for a raw frame of the given geometry.
///
/// Without an explicit matrix the geometry decides, as it does for modes.
pub fn encode_options(config: &ConvertConfig, width: u32, height: u32) -> EncodeOptions {
    let matrix = config.matrix.unwrap_or_else(|| default_matrix_for(width, height));
    let opts = EncodeOptions::default()
        .matrix(matrix)
        .ranges(config.input_narrow, config.output_narrow);
    if config.strict { opts.strict() } else { opts }
}

// ============================================================================
// Raw sample files
// ============================================================================

/// Little-endian serialization of one sample.
pub trait RawSample: Sample {
    /// Bytes per sample on disk.
    const BYTES: usize;

    /// Reads one sample from exactly [`BYTES`](Self::BYTES) bytes.
    fn read_le(b: &[u8]) -> Self;

    /// Appends one sample.
    fn write_le(self, out: &mut Vec<u8>);
}

impl RawSample for u8 {
    const BYTES: usize = 1;

    fn read_le(b: &[u8]) -> Self {
        b[0]
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.push(self);
    }
}

impl RawSample for u16 {
    const BYTES: usize = 2;

    fn read_le(b: &[u8]) -> Self {
        u16::from_le_bytes([b[0], b[1]])
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl RawSample for f32 {
    const BYTES: usize = 4;

    fn read_le(b: &[u8]) -> Self {
        f32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

/// Reads an interleaved RGB raw file.
pub fn read_rgb<T: RawSample>(path: &Path, width: u32, height: u32) -> Result<RgbFrame<T>> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read: {}", path.display()))?;
    let expected = width as usize * height as usize * 3 * T::BYTES;
    if bytes.len() != expected {
        bail!(
            "{}: expected {} bytes for {}x{} {} RGB, found {}",
            path.display(),
            expected,
            width,
            height,
            T::KIND,
            bytes.len()
        );
    }
    let data = bytes.chunks_exact(T::BYTES).map(T::read_le).collect();
    Ok(RgbFrame::from_vec(width, height, data)?)
}

/// Writes samples as a raw little-endian file.
pub fn write_samples<T: RawSample>(path: &Path, samples: &[T]) -> Result<()> {
    let mut out = Vec::with_capacity(samples.len() * T::BYTES);
    for &s in samples {
        s.write_le(&mut out);
    }
    std::fs::write(path, out).with_context(|| format!("Failed to write: {}", path.display()))
}

/// Writes a byte buffer.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write: {}", path.display()))
}

// ============================================================================
// Argument parsing
// ============================================================================

fn parse_numbers<const N: usize>(s: &str, what: &str) -> Result<[f32; N]> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        bail!("{what} needs {N} comma-separated values, got '{s}'");
    }
    let mut out = [0.0f32; N];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .with_context(|| format!("Invalid number '{part}' in {what}"))?;
    }
    Ok(out)
}

/// Parses an "r,g,b" colour.
///
/// Three integers with any value above 1 are read as 10-bit codes
/// (0-1023), everything else as normalized floats.
pub fn parse_color(s: &str) -> Result<[f32; 3]> {
    let v = parse_numbers::<3>(s, "colour")?;
    let integral = v.iter().all(|c| c.fract() == 0.0 && *c >= 0.0);
    if integral && v.iter().any(|&c| c > 1.0) {
        if v.iter().any(|&c| c > 1023.0) {
            bail!("10-bit colour codes must be 0-1023, got '{s}'");
        }
        return Ok(v.map(|c| sdi_convert::pattern::ten_bit_to_unit(c as u16)));
    }
    Ok(v)
}

/// Parses a "cx,cy,w,h" patch rectangle in normalized coordinates.
pub fn parse_rect(s: &str) -> Result<((f32, f32), (f32, f32))> {
    let [cx, cy, w, h] = parse_numbers::<4>(s, "patch")?;
    if [cx, cy, w, h].iter().any(|v| !(0.0..=1.0).contains(v)) {
        bail!("patch values must be within 0-1, got '{s}'");
    }
    Ok(((cx, cy), (w, h)))
}

/// Format byte size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RangeArg;
    use sdi_core::{ColorMatrix, WireFormat};

    fn no_overrides() -> ConversionArgs {
        ConversionArgs {
            format: None,
            matrix: None,
            rgb_range: None,
            wire_range: None,
            strict: false,
        }
    }

    #[test]
    fn test_merge_prefers_command_line() {
        let config = ConvertConfig {
            format: WireFormat::Rgb12,
            matrix: Some(ColorMatrix::Rec2020),
            ..ConvertConfig::default()
        };
        assert_eq!(merge(&no_overrides(), &config), config);

        let conv = ConversionArgs {
            format: Some(WireFormat::Yuv8),
            wire_range: Some(RangeArg::Full),
            strict: true,
            ..no_overrides()
        };
        let merged = merge(&conv, &config);
        assert_eq!(merged.format, WireFormat::Yuv8);
        assert_eq!(merged.matrix, Some(ColorMatrix::Rec2020));
        assert!(!merged.output_narrow);
        assert!(merged.strict);
    }

    #[test]
    fn test_encode_options_follow_geometry() {
        let config = ConvertConfig::default();
        assert_eq!(encode_options(&config, 720, 576).matrix, ColorMatrix::Rec601);
        assert_eq!(encode_options(&config, 1920, 1080).matrix, ColorMatrix::Rec709);
        assert_eq!(encode_options(&config, 3840, 2160).matrix, ColorMatrix::Rec709);
        let strict = ConvertConfig { strict: true, ..config };
        assert_eq!(encode_options(&strict, 8, 8), EncodeOptions::default().strict());
    }

    #[test]
    fn test_raw_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.rgb");
        let samples: Vec<u16> = (0..12).map(|i| i * 5000).collect();
        write_samples(&path, &samples).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 24);

        let frame: RgbFrame<u16> = read_rgb(&path, 2, 2).unwrap();
        assert_eq!(frame.as_slice(), samples.as_slice());
    }

    #[test]
    fn test_raw_file_wrong_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.rgb");
        write_samples(&path, &[0.5f32; 5]).unwrap();
        let err = read_rgb::<f32>(&path, 2, 1).unwrap_err();
        assert!(err.to_string().contains("expected 24 bytes"), "{err}");
    }

    #[test]
    fn test_missing_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(load_config(Some(&missing)).is_err());
        assert_eq!(load_config(None).unwrap(), ConvertConfig::default());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("0.5, 0.25, 1").unwrap(), [0.5, 0.25, 1.0]);
        assert_eq!(parse_color("1,1,1").unwrap(), [1.0; 3]);

        let ten = parse_color("1023,0,512").unwrap();
        assert_eq!(u16::from_unit(ten[0], false), 1023 << 6);
        assert_eq!(ten[1], 0.0);
        assert_eq!(u16::from_unit(ten[2], false), 512 << 6);

        assert!(parse_color("1,2").is_err());
        assert!(parse_color("2000,0,0").is_err());
        assert!(parse_color("a,b,c").is_err());
    }

    #[test]
    fn test_parse_rect() {
        assert_eq!(parse_rect("0.5,0.5,0.25,0.1").unwrap(), ((0.5, 0.5), (0.25, 0.1)));
        assert!(parse_rect("0.5,0.5,2,0.1").is_err());
    }
}
