use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "placemap",
    version,
    about = "A command line tool for processing the r/Place 2022 dataset."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trim and sort the raw dataset.
    Trim(TrimArgs),
    /// Generate age and color maps from the sorted event file.
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
struct TrimArgs {
    /// The path to the r/Place 2022 CSV dataset.
    infile: PathBuf,

    /// The path to the trimmed dataset (must end in `.pxl`).
    outfile: PathBuf,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 2000)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 2000)]
    height: u32,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// The path to the trimmed event file.
    infile: PathBuf,

    /// The directory to save the color map PNG images to.
    colorpath: PathBuf,

    /// The directory to save the age map PNG images to.
    agepath: PathBuf,

    /// JSON file with engine settings; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// The start timestamp in milliseconds. [default: 0]
    #[arg(long = "start_ms", allow_negative_numbers = true)]
    start_ms: Option<i64>,

    /// The time multiplication factor. [default: 1000]
    #[arg(long, allow_negative_numbers = true)]
    timescale: Option<i64>,

    /// The number of frames to generate. [default: 600]
    #[arg(long, allow_negative_numbers = true)]
    frames: Option<i64>,

    /// The number of frames per second. [default: 60]
    #[arg(long, allow_negative_numbers = true)]
    fps: Option<i64>,

    /// The half life of the heat map, in milliseconds. [default: 600000]
    #[arg(long = "half_life", allow_negative_numbers = true)]
    half_life: Option<f64>,

    /// The change in height at which the height increase for changed pixels is reduced by a
    /// factor of e. [default: 0.3]
    #[arg(long = "scale_height", allow_negative_numbers = true)]
    scale_height: Option<f64>,

    /// Heat value rendered as full white in the age map.
    #[arg(long = "heat_ceiling", default_value_t = 1.0)]
    heat_ceiling: f64,

    /// Render frames in parallel (simulation stays sequential).
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per render chunk.
    #[arg(long = "chunk_size", default_value_t = 16)]
    chunk_size: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.cmd {
        Command::Trim(args) => cmd_trim(args),
        Command::Generate(args) => cmd_generate(args),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn cmd_trim(args: TrimArgs) -> anyhow::Result<ExitCode> {
    let opts = placemap::TrimOpts {
        canvas: placemap::Canvas::new(args.width, args.height)?,
    };
    match placemap::trim(&args.infile, &args.outfile, &opts) {
        Ok(report) => {
            eprintln!(
                "wrote {} ({} events, {} rejected, {} duplicates)",
                args.outfile.display(),
                report.accepted,
                report.rejected,
                report.duplicates
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(placemap::IngestError::WrongExtension { .. }) => {
            println!(
                "The outfile must have a .{} extension.",
                placemap::EVENT_FILE_EXTENSION
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Err(e).with_context(|| format!("trim '{}'", args.infile.display())),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<ExitCode> {
    for dir in [&args.colorpath, &args.agepath] {
        if !dir.is_dir() {
            println!("The directory '{}' does not exist.", dir.display());
            return Ok(ExitCode::FAILURE);
        }
    }

    let cfg = resolve_config(&args)?;
    let opts = placemap::RenderOpts {
        heat_scale: placemap::HeatScale::new(args.heat_ceiling)?,
        threading: placemap::RenderThreading {
            parallel: args.parallel,
            chunk_size: args.chunk_size,
            threads: args.threads,
        },
    };

    let source = placemap::EventFileReader::open(&args.infile)
        .with_context(|| format!("open event file '{}'", args.infile.display()))?;
    let mut sink = placemap::PngSequenceSink::new(&args.colorpath, &args.agepath);
    let stats = placemap::generate(source, &cfg, &opts, &mut sink)?;

    eprintln!(
        "wrote {} frames to {} and {}",
        stats.frames,
        args.colorpath.display(),
        args.agepath.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Start from `--config` (or defaults) and apply any flags given on the command line.
fn resolve_config(args: &GenerateArgs) -> anyhow::Result<placemap::GenerateConfig> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => placemap::GenerateConfig::default(),
    };
    if let Some(v) = args.start_ms {
        cfg.start_ms = v;
    }
    if let Some(v) = args.timescale {
        cfg.timescale = v;
    }
    if let Some(v) = args.frames {
        cfg.frames = v;
    }
    if let Some(v) = args.fps {
        cfg.fps = v;
    }
    if let Some(v) = args.half_life {
        cfg.heat_half_life = v;
    }
    if let Some(v) = args.scale_height {
        cfg.scale_height = v;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_config(path: &Path) -> anyhow::Result<placemap::GenerateConfig> {
    placemap::GenerateConfig::from_path(path)
        .with_context(|| format!("load config '{}'", path.display()))
}
