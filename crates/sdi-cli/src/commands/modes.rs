//! Display mode listing.

use crate::ModesArgs;
use anyhow::{Result, bail};
use sdi_convert::policy::default_matrix_for_mode;
use sdi_core::DisplayMode;
use serde_json::json;
use tracing::trace;

/// Runs the modes command.
pub fn run(args: ModesArgs, verbose: u8) -> Result<()> {
    trace!(filter = ?args.filter, json = args.json, "modes::run");

    let modes = select(args.filter.as_deref());
    if modes.is_empty() {
        bail!("No display mode matches '{}'", args.filter.unwrap_or_default());
    }

    if args.json {
        let list: Vec<_> = modes
            .iter()
            .map(|m| {
                json!({
                    "name": m.name(),
                    "width": m.width(),
                    "height": m.height(),
                    "frame_rate": { "num": m.frame_rate().num, "den": m.frame_rate().den },
                    "interlaced": m.is_interlaced(),
                    "matrix": default_matrix_for_mode(*m).name(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for mode in &modes {
        let scan = if mode.is_interlaced() { "i" } else { "p" };
        print!(
            "{:<16} {:>4}x{:<4} {:>8}{}",
            mode.name(),
            mode.width(),
            mode.height(),
            mode.frame_rate().to_string(),
            scan
        );
        if verbose > 0 {
            print!("  {}", default_matrix_for_mode(*mode));
        }
        println!();
    }
    if verbose > 0 {
        println!("{} modes", modes.len());
    }
    Ok(())
}

fn select(filter: Option<&str>) -> Vec<DisplayMode> {
    let needle = filter.map(str::to_ascii_lowercase);
    DisplayMode::ALL
        .iter()
        .copied()
        .filter(|m| match &needle {
            Some(n) => m.name().to_ascii_lowercase().contains(n.as_str()),
            None => true,
        })
        .collect()
}
