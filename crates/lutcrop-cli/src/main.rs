//! lutcrop - Grade and square-crop videos with `.cube` LUTs
//!
//! Entry point: argument parsing and logging setup.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lutcrop_color::PackingMode;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;

#[derive(Parser)]
#[command(name = "lutcrop")]
#[command(author, version, about = "Grade and square-crop videos with .cube LUTs")]
#[command(long_about = "
Parses .cube LUTs into sampler tables, computes centered square crops and
drives FFmpeg to render graded, cropped videos.

Examples:
  lutcrop inspect look.cube                 # Size and corner samples
  lutcrop pack look.cube -i 0.5 -m float    # Blend and pack for a sampler
  lutcrop geometry 1920 1080 --flip         # Crop geometry as JSON
  lutcrop transform in.mp4 -l look.cube --crop 720 -o out.mp4
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show LUT resolution and lattice corners
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),

    /// Blend and pack a LUT into a sampler buffer
    #[command(visible_alias = "p")]
    Pack(PackArgs),

    /// Compute square-crop geometry for a frame size
    #[command(visible_alias = "g")]
    Geometry(GeometryArgs),

    /// Grade, crop and optionally mirror a video
    #[command(visible_alias = "t")]
    Transform(TransformArgs),
}

#[derive(Args)]
pub struct InspectArgs {
    /// .cube file
    pub lut: PathBuf,
}

/// Sampler buffer encoding.
#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// One 0xAARRGGBB word per sample
    Argb,
    /// Four f32 per sample
    Float,
}

impl From<ModeArg> for PackingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Argb => PackingMode::IntegerArgb,
            ModeArg::Float => PackingMode::FloatRgba,
        }
    }
}

#[derive(Args)]
pub struct PackArgs {
    /// .cube file
    pub lut: PathBuf,

    /// LUT strength in [0, 1]
    #[arg(short, long)]
    pub intensity: Option<f32>,

    /// Output encoding
    #[arg(short, long, value_enum, default_value = "argb")]
    pub mode: ModeArg,

    /// Write the raw sampler buffer (native endian) to this file
    #[arg(long)]
    pub raw: Option<PathBuf>,

    /// Number of leading samples to print
    #[arg(long, default_value = "8")]
    pub show: usize,
}

#[derive(Args)]
pub struct GeometryArgs {
    /// Source width in pixels
    pub width: f64,

    /// Source height in pixels
    pub height: f64,

    /// Output square side (default: smaller source dimension)
    #[arg(short, long)]
    pub side: Option<u32>,

    /// Mirror horizontally
    #[arg(short, long)]
    pub flip: bool,
}

#[derive(Args)]
pub struct TransformArgs {
    /// Source video
    pub input: PathBuf,

    /// .cube file to grade with
    #[arg(short, long)]
    pub lut: Option<PathBuf>,

    /// LUT strength in [0, 1]
    #[arg(short, long)]
    pub intensity: Option<f64>,

    /// Mirror horizontally
    #[arg(short, long)]
    pub flip: bool,

    /// Output square side (default: smaller source dimension)
    #[arg(long)]
    pub crop: Option<i64>,

    /// Output file (default: generated name in the configured output dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON transformer config
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Pack(args) => commands::pack::run(args),
        Commands::Geometry(args) => commands::geometry::run(args),
        Commands::Transform(args) => commands::transform::run(args),
    }
}
