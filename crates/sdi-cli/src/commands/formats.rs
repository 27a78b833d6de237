//! Wire format listing.

use crate::FormatsArgs;
use anyhow::Result;
use sdi_convert::{supports_decode, supports_encode};
use sdi_core::{SampleType, WireFormat};
use serde_json::json;
use tracing::trace;

/// Runs the formats command.
pub fn run(args: FormatsArgs, verbose: u8) -> Result<()> {
    trace!(json = args.json, "formats::run");

    if args.json {
        let list: Vec<_> = WireFormat::ALL.iter().map(|&f| describe(f)).collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!(
        "{:<6} {:<6} {:>4} {:>7} {:>7}  {:<6} {:<20} {:<20}",
        "FOURCC", "NAME", "BITS", "GROUP", "BYTES", "CHROMA", "ENCODE FROM", "DECODE TO"
    );
    for format in WireFormat::ALL {
        println!(
            "{:<6} {:<6} {:>4} {:>5}px {:>6}B  {:<6} {:<20} {:<20}",
            format.fourcc(),
            format.name(),
            format.bit_depth(),
            format.group_pixels(),
            format.group_bytes(),
            if format.is_subsampled() { "4:2:2" } else { "4:4:4" },
            samples(|s| supports_encode(s, format)).join(","),
            samples(|s| supports_decode(s, format)).join(","),
        );
        if verbose > 0 {
            println!(
                "       1920x1080 frame: {} bytes ({} per row)",
                format.frame_bytes(1920, 1080),
                format.row_bytes(1920)
            );
        }
    }
    Ok(())
}

fn samples(accepts: impl Fn(SampleType) -> bool) -> Vec<&'static str> {
    SampleType::ALL.into_iter().filter(|&s| accepts(s)).map(SampleType::name).collect()
}

fn describe(format: WireFormat) -> serde_json::Value {
    json!({
        "fourcc": format.fourcc(),
        "name": format.name(),
        "bit_depth": format.bit_depth(),
        "group_pixels": format.group_pixels(),
        "group_bytes": format.group_bytes(),
        "subsampled": format.is_subsampled(),
        "encode_from": samples(|s| supports_encode(s, format)),
        "decode_to": samples(|s| supports_decode(s, format)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_v210() {
        let v = describe(WireFormat::Yuv10);
        assert_eq!(v["fourcc"], "v210");
        assert_eq!(v["group_bytes"], 16);
        assert_eq!(v["encode_from"], json!(["uint16", "float32"]));
        assert_eq!(v["decode_to"], json!(["uint16", "float32"]));
    }

    #[test]
    fn test_bgra_takes_only_bytes() {
        assert_eq!(samples(|s| supports_encode(s, WireFormat::Bgra8)), ["uint8"]);
    }
}
