//! Test pattern rendering.

use crate::PatternArgs;
use anyhow::{Context, Result};
use sdi_convert::{ConvertConfig, EncodeOptions, OutputPlan, Pattern};
use sdi_core::{DisplayMode, SampleType, WireFrame};
use tracing::{info, trace};

/// Runs the pattern command.
pub fn run(args: PatternArgs, config: &ConvertConfig, verbose: u8) -> Result<()> {
    trace!(output = %args.output.display(), mode = %args.mode, "pattern::run");

    let pattern = build_pattern(&args)?;
    let config = super::merge(&args.conv, config);
    let wire = render(&pattern, args.mode, &config)?;

    info!(mode = %args.mode, format = %wire.format(), "Rendered pattern");
    if verbose > 0 {
        println!(
            "{:?} at {} ({}x{}) as {} -> {}",
            pattern,
            args.mode,
            wire.width(),
            wire.height(),
            wire.format(),
            args.output.display()
        );
    }

    super::write_bytes(&args.output, wire.data())?;
    if verbose > 0 {
        println!("Wrote {}", super::format_size(wire.data().len()));
    }
    Ok(())
}

/// Pattern named by the arguments.
pub fn build_pattern(args: &PatternArgs) -> Result<Pattern> {
    let Some(color) = args.color.as_deref() else {
        return Ok(Pattern::from_name(&args.pattern)?);
    };
    let color = super::parse_color(color)?;
    let Some(patch) = args.patch.as_deref() else {
        return Ok(Pattern::Solid(color));
    };
    let (center, size) = super::parse_rect(patch)?;
    let background = match args.background.as_deref() {
        Some(bg) => super::parse_color(bg)?,
        None => [0.0; 3],
    };
    Ok(Pattern::Patch {
        color,
        background,
        center,
        size,
    })
}

/// Renders `pattern` at the mode's size and encodes it.
///
/// Patterns render as f32, or u8 when the format is BGRA8.
pub fn render(pattern: &Pattern, mode: DisplayMode, config: &ConvertConfig) -> Result<WireFrame> {
    let (width, height) = mode.dimensions();
    let sample = if config.format == sdi_core::WireFormat::Bgra8 {
        SampleType::U8
    } else {
        SampleType::F32
    };
    let plan = OutputPlan::resolve(mode, config.format, sample, config.matrix);
    let mut opts = EncodeOptions::default()
        .matrix(plan.matrix)
        .ranges(config.input_narrow, config.output_narrow);
    if config.strict {
        opts = opts.strict();
    }

    let wire = match sample {
        SampleType::U8 => {
            let frame = pattern.render::<u8>(width, height)?;
            sdi_convert::encode(frame.view(), plan.format, &opts)
        }
        _ => {
            let frame = pattern.render::<f32>(width, height)?;
            sdi_convert::encode(frame.view(), plan.format, &opts)
        }
    };
    wire.with_context(|| format!("Failed to encode pattern as {}", plan.format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConversionArgs;
    use sdi_core::{ColorMatrix, WireFormat};
    use std::path::PathBuf;

    fn args() -> PatternArgs {
        PatternArgs {
            output: PathBuf::from("out.raw"),
            mode: DisplayMode::Pal,
            pattern: "bars75".into(),
            color: None,
            patch: None,
            background: None,
            conv: ConversionArgs {
                format: None,
                matrix: None,
                rgb_range: None,
                wire_range: None,
                strict: false,
            },
        }
    }

    #[test]
    fn test_named_pattern() {
        assert_eq!(build_pattern(&args()).unwrap(), Pattern::Bars75);
        let bad = PatternArgs {
            pattern: "zebra".into(),
            ..args()
        };
        assert!(build_pattern(&bad).is_err());
    }

    #[test]
    fn test_patch_from_ten_bit_colour() {
        let a = PatternArgs {
            color: Some("1023,0,0".into()),
            patch: Some("0.5,0.5,0.25,0.25".into()),
            ..args()
        };
        match build_pattern(&a).unwrap() {
            Pattern::Patch {
                background,
                center,
                size,
                ..
            } => {
                assert_eq!(background, [0.0; 3]);
                assert_eq!(center, (0.5, 0.5));
                assert_eq!(size, (0.25, 0.25));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_render_sizes() {
        let config = ConvertConfig::default();
        let wire = render(&Pattern::Bars, DisplayMode::Hd1080p25, &config).unwrap();
        assert_eq!(wire.format(), WireFormat::Yuv10);
        assert_eq!(wire.data().len(), WireFormat::Yuv10.frame_bytes(1920, 1080));

        let bgra = ConvertConfig {
            format: WireFormat::Bgra8,
            matrix: Some(ColorMatrix::Rec2020),
            ..ConvertConfig::default()
        };
        let wire = render(&Pattern::Solid([1.0; 3]), DisplayMode::Pal, &bgra).unwrap();
        assert_eq!(wire.format(), WireFormat::Bgra8);
        assert_eq!(&wire.data()[..4], &[255, 255, 255, 255]);
    }
}
