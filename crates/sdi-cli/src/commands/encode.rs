//! Raw RGB to wire buffer.

use super::RawSample;
use crate::EncodeArgs;
use anyhow::{Context, Result};
use sdi_convert::policy::resolve_format;
use sdi_convert::{ConvertConfig, EncodeOptions};
use sdi_core::{SampleType, WireFormat};
use tracing::{info, trace, warn};

/// Runs the encode command.
pub fn run(args: EncodeArgs, config: &ConvertConfig, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "encode::run");

    let config = super::merge(&args.conv, config);
    let format = resolve_format(config.format, args.sample);
    if format != config.format {
        warn!(requested = %config.format, %format, sample = %args.sample, "substituting wire format");
    }
    let opts = super::encode_options(&config, args.width, args.height);

    info!(
        input = %args.input.display(),
        sample = %args.sample,
        %format,
        matrix = %opts.matrix,
        "Encoding"
    );
    if verbose > 0 {
        println!(
            "Encoding {} ({}x{} {}) -> {} ({}, {})",
            args.input.display(),
            args.width,
            args.height,
            args.sample,
            args.output.display(),
            format,
            opts.matrix
        );
    }

    let bytes = match args.sample {
        SampleType::U8 => encode_file::<u8>(&args, format, &opts),
        SampleType::U16 => encode_file::<u16>(&args, format, &opts),
        SampleType::F32 => encode_file::<f32>(&args, format, &opts),
    }?;
    super::write_bytes(&args.output, &bytes)?;

    if verbose > 0 {
        println!("Wrote {}", super::format_size(bytes.len()));
    }
    Ok(())
}

fn encode_file<T: RawSample>(args: &EncodeArgs, format: WireFormat, opts: &EncodeOptions) -> Result<Vec<u8>> {
    let frame = super::read_rgb::<T>(&args.input, args.width, args.height)?;
    let wire = sdi_convert::encode(frame.view(), format, opts)
        .with_context(|| format!("Failed to encode {} as {}", args.input.display(), format))?;
    Ok(wire.into_bytes())
}
