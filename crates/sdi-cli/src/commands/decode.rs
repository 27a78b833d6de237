//! Wire buffer to raw RGB or raw code planes.

use super::RawSample;
use crate::DecodeArgs;
use anyhow::{Context, Result};
use sdi_convert::{ConvertConfig, DecodeOptions};
use sdi_core::{SampleType, WireView};
use tracing::{debug, info, trace};

/// Runs the decode command.
pub fn run(args: DecodeArgs, config: &ConvertConfig, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "decode::run");

    let config = super::merge(&args.conv, config);
    let format = config.format;
    let bytes = std::fs::read(&args.input).with_context(|| format!("Failed to read: {}", args.input.display()))?;
    let wire = WireView::new(format, args.width, args.height, &bytes)
        .with_context(|| format!("{} is not a {}x{} {} frame", args.input.display(), args.width, args.height, format))?;

    if args.planes {
        let planes = sdi_pack::unpack_planes(format, &bytes, args.width, args.height)?;
        debug!(chroma_width = planes.chroma_width, "unpacked planes");
        let mut all = planes.c0;
        all.extend_from_slice(&planes.c1);
        all.extend_from_slice(&planes.c2);
        super::write_samples(&args.output, &all)?;
        if verbose > 0 {
            println!(
                "Planes {}x{} + 2 x {}x{} (u16 codes) -> {}",
                planes.width,
                planes.height,
                planes.chroma_width,
                planes.height,
                args.output.display()
            );
        }
        return Ok(());
    }

    let opts = DecodeOptions::from(super::encode_options(&config, args.width, args.height));
    info!(input = %args.input.display(), %format, sample = %args.sample, matrix = %opts.matrix, "Decoding");
    if verbose > 0 {
        println!(
            "Decoding {} ({}, {}) -> {} ({})",
            args.input.display(),
            format,
            opts.matrix,
            args.output.display(),
            args.sample
        );
    }

    match args.sample {
        SampleType::U8 => decode_file::<u8>(&args, wire, &opts),
        SampleType::U16 => decode_file::<u16>(&args, wire, &opts),
        SampleType::F32 => decode_file::<f32>(&args, wire, &opts),
    }
}

fn decode_file<T: RawSample>(args: &DecodeArgs, wire: WireView<'_>, opts: &DecodeOptions) -> Result<()> {
    let frame = sdi_convert::decode::<T>(wire, opts)
        .with_context(|| format!("Failed to decode {} to {}", args.input.display(), T::KIND))?;
    super::write_samples(&args.output, frame.as_slice())
}
