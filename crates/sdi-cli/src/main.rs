//! sdi - broadcast wire format conversion tool
//!
//! Converts raw RGB files to and from SDI wire layouts, renders line-up
//! patterns and exercises the loopback device.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use sdi_core::{ColorMatrix, DisplayMode, SampleType, WireFormat};
use sdi_hdr::Eotf;
use std::path::PathBuf;

mod commands;
mod logger;

#[derive(Parser)]
#[command(name = "sdi")]
#[command(author, version, about = "Broadcast wire format conversion tool")]
#[command(long_about = "
Converts between application RGB frames and the packed pixel formats
carried over SDI: BGRA, 2vuy, v210, R10l and R12L.

Raw RGB files are interleaved R, G, B samples, little-endian, row-major
with no padding.

Examples:
  sdi formats                                   # List wire formats
  sdi modes --filter 1080                       # List display modes
  sdi encode in.rgb out.v210 -W 1920 -H 1080 -s uint16 -f v210
  sdi decode in.v210 out.rgb -W 1920 -H 1080 -f v210 -s float32
  sdi decode in.v210 planes.raw -W 1920 -H 1080 -f v210 --planes
  sdi pattern bars.v210 -M HD1080p25 -p bars75 -f v210
  sdi loopback -M 4K2160p25 -f R12L --eotf pq
  sdi -c convert.yaml config                    # Show effective config
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// YAML file with conversion defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List wire formats and their packing
    Formats(FormatsArgs),

    /// List display mode presets
    Modes(ModesArgs),

    /// Encode raw RGB into a wire buffer
    #[command(visible_alias = "e")]
    Encode(EncodeArgs),

    /// Decode a wire buffer into raw RGB
    #[command(visible_alias = "d")]
    Decode(DecodeArgs),

    /// Render a test pattern into a wire buffer
    #[command(visible_alias = "p")]
    Pattern(PatternArgs),

    /// Play out and capture through the loopback device
    Loopback(LoopbackArgs),

    /// Print the effective conversion config
    Config,
}

/// Range convention of integer samples or wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RangeArg {
    /// Legal range (64-940 at 10 bits)
    Narrow,
    /// Full range (0-1023 at 10 bits)
    Full,
}

impl RangeArg {
    fn is_narrow(self) -> bool {
        self == RangeArg::Narrow
    }
}

/// Conversion settings shared by encode, decode, pattern and loopback.
///
/// Unset values come from the config file, then from built-in defaults.
#[derive(Args, Debug, Clone)]
struct ConversionArgs {
    /// Wire format: bgra, 2vuy, v210, r10l, r12l
    #[arg(short, long)]
    format: Option<WireFormat>,

    /// Matrix: rec601, rec709, rec2020 (default by geometry)
    #[arg(short, long)]
    matrix: Option<ColorMatrix>,

    /// Range of integer RGB samples
    #[arg(long, value_enum)]
    rgb_range: Option<RangeArg>,

    /// Range of wire codes
    #[arg(long, value_enum)]
    wire_range: Option<RangeArg>,

    /// Fail on out-of-range input instead of clamping
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct FormatsArgs {
    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ModesArgs {
    /// Only modes whose name contains this text
    #[arg(long)]
    filter: Option<String>,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct EncodeArgs {
    /// Raw RGB input
    input: PathBuf,

    /// Wire buffer output
    output: PathBuf,

    /// Width in pixels
    #[arg(short = 'W', long)]
    width: u32,

    /// Height in lines
    #[arg(short = 'H', long)]
    height: u32,

    /// Input sample type: uint8, uint16, float32
    #[arg(short, long, default_value = "uint16")]
    sample: SampleType,

    #[command(flatten)]
    conv: ConversionArgs,
}

#[derive(Args)]
struct DecodeArgs {
    /// Wire buffer input
    input: PathBuf,

    /// Raw RGB output
    output: PathBuf,

    /// Width in pixels
    #[arg(short = 'W', long)]
    width: u32,

    /// Height in lines
    #[arg(short = 'H', long)]
    height: u32,

    /// Output sample type: uint8, uint16, float32
    #[arg(short, long, default_value = "float32")]
    sample: SampleType,

    /// Write raw code planes (u16, component-major) instead of RGB
    #[arg(long)]
    planes: bool,

    #[command(flatten)]
    conv: ConversionArgs,
}

#[derive(Args)]
struct PatternArgs {
    /// Wire buffer output
    output: PathBuf,

    /// Display mode preset
    #[arg(short = 'M', long, default_value = "HD1080p25")]
    mode: DisplayMode,

    /// Pattern: gradient, bars, bars75, checkerboard
    #[arg(short, long, default_value = "bars75")]
    pattern: String,

    /// Solid colour "r,g,b" (floats 0-1 or 10-bit integers)
    #[arg(long, conflicts_with = "pattern")]
    color: Option<String>,

    /// Patch "cx,cy,w,h" in normalized coordinates, drawn in --color
    #[arg(long, requires = "color")]
    patch: Option<String>,

    /// Background colour around --patch
    #[arg(long, requires = "patch")]
    background: Option<String>,

    #[command(flatten)]
    conv: ConversionArgs,
}

#[derive(Args)]
struct LoopbackArgs {
    /// Display mode preset
    #[arg(short = 'M', long, default_value = "HD1080p25")]
    mode: DisplayMode,

    /// Pattern: gradient, bars, bars75, checkerboard
    #[arg(short, long, default_value = "bars75")]
    pattern: String,

    /// Transfer function to signal with reference metadata: sdr, pq, hlg
    #[arg(long)]
    eotf: Option<Eotf>,

    /// HDR metadata JSON sidecar (overrides --eotf)
    #[arg(long)]
    hdr: Option<PathBuf>,

    /// Capture timeout in milliseconds
    #[arg(long, default_value = "1000")]
    timeout_ms: u64,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    conv: ConversionArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Formats(args) => commands::formats::run(args, cli.verbose),
        Commands::Modes(args) => commands::modes::run(args, cli.verbose),
        Commands::Encode(args) => commands::encode::run(args, &config, cli.verbose),
        Commands::Decode(args) => commands::decode::run(args, &config, cli.verbose),
        Commands::Pattern(args) => commands::pattern::run(args, &config, cli.verbose),
        Commands::Loopback(args) => commands::loopback::run(args, &config, cli.verbose),
        Commands::Config => commands::print_config(&config),
    }
}
