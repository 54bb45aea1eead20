//! imrand CLI
//!
//! Seeds a generator from a camera image (`--ibr`) or from cursor motion
//! (`--cpr`) and prints bit strings or bounded integers. The historical
//! single-dash spellings (`-IBR -nbits 64`) are still accepted.

use clap::{ArgGroup, Parser};
use imrand::{
    analysis::QualityThresholds,
    capture::{CaptureConfig, CaptureError, CapturePipeline, ConfigError, FileConfig, ImageSource},
    generator::{BitStreamGenerator, GeneratorError, Seed, MAX_BITS_PER_CALL},
    range::{HashRangeMapper, RangeError, RangeRequest, StreamRangeMapper},
    sampling::{
        CancellationToken, CursorSeedSampler, ImageSeedSampler, PositionError, SampledBits,
        SamplerError,
    },
    terminal::TerminalPointer,
};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Flags that keep working with a single dash and any letter case.
const LEGACY_FLAGS: [&str; 8] = [
    "ibr", "cpr", "nbits", "bin", "range", "hrange", "nrange", "config",
];

/// Width of the cursor progress bar, in columns.
const PROGRESS_COLUMNS: usize = 50;

#[derive(Parser, Debug)]
#[command(name = "imrand", version, about = "Physically seeded pseudorandom integers")]
#[command(group(ArgGroup::new("mode").required(true).args(["ibr", "cpr"])))]
#[command(group(ArgGroup::new("action").args(["nbits", "range", "hrange", "nrange"])))]
struct Cli {
    /// Seed from a camera image
    #[arg(long)]
    ibr: bool,

    /// Seed from cursor motion
    #[arg(long)]
    cpr: bool,

    /// Print one integer with exactly N bits
    #[arg(long, value_name = "N")]
    nbits: Option<usize>,

    /// Print --nbits output in binary
    #[arg(long, requires = "nbits")]
    bin: bool,

    /// Print one integer in [A, B]
    #[arg(long, num_args = 2, value_names = ["A", "B"], allow_negative_numbers = true)]
    range: Option<Vec<i64>>,

    /// Print one integer in [A, B] from an image digest (deprecated)
    #[arg(long, num_args = 2, value_names = ["A", "B"], allow_negative_numbers = true)]
    hrange: Option<Vec<i64>>,

    /// Print N integers in [A, B], one per line
    #[arg(long, num_args = 3, value_names = ["A", "B", "N"], allow_negative_numbers = true)]
    nrange: Option<Vec<i64>>,

    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Sampler(#[from] SamplerError),
    #[error(transparent)]
    Position(#[from] PositionError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[error("n: invalid count {0} (expected n >= 0)")]
    InvalidCount(i64),
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args())) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                clap::error::ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    // stdout carries results only
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    info!("imrand v{}", imrand::VERSION);

    match run(cli) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Output requested on the command line, validated before any seeding.
#[derive(Debug)]
enum Action {
    Bits { n: usize, binary: bool },
    Range { mapper: StreamRangeMapper, count: usize },
    HashRange(RangeRequest),
    SeedOnly,
}

impl Action {
    /// Checks bit counts, bounds and batch sizes without touching any
    /// entropy source.
    fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if let Some(n) = cli.nbits {
            if !(1..=MAX_BITS_PER_CALL).contains(&n) {
                return Err(GeneratorError::InvalidBitCount {
                    requested: n,
                    max: MAX_BITS_PER_CALL,
                }
                .into());
            }
            return Ok(Action::Bits {
                n,
                binary: cli.bin,
            });
        }
        if let Some(bounds) = cli.range.as_deref() {
            return Ok(Action::Range {
                mapper: StreamRangeMapper::for_bounds(bounds[0], bounds[1])?,
                count: 1,
            });
        }
        if let Some(args) = cli.nrange.as_deref() {
            let mapper = StreamRangeMapper::for_bounds(args[0], args[1])?;
            let count = usize::try_from(args[2]).map_err(|_| CliError::InvalidCount(args[2]))?;
            return Ok(Action::Range { mapper, count });
        }
        if let Some(bounds) = cli.hrange.as_deref() {
            return Ok(Action::HashRange(RangeRequest::new(bounds[0], bounds[1])?));
        }
        Ok(Action::SeedOnly)
    }
}

/// Seeds a generator and computes the requested output.
///
/// Output is returned rather than printed so that a late failure leaves
/// stdout empty.
fn run(cli: Cli) -> Result<Vec<String>, CliError> {
    let action = Action::from_cli(&cli)?;
    let config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let mut lines = Vec::new();
    match action {
        Action::HashRange(request) => {
            // Digests a fresh capture; no seed is collected.
            let mut source = open_image_source(&config.capture)?;
            #[allow(deprecated)]
            let result = HashRangeMapper::new(config.generator.digest).ranged_int(
                source.as_mut(),
                request.low(),
                request.high(),
            )?;
            eprintln!("warning: {}", result.notice());
            lines.push(result.into_inner().to_string());
        }
        Action::Bits { n, binary } => {
            let value = seed_generator(&cli, &config)?.next_bits(n, true)?;
            lines.push(if binary {
                format!("{value:b}")
            } else {
                value.to_string()
            });
        }
        Action::Range { mapper, count } => {
            let mut generator = seed_generator(&cli, &config)?;
            lines.extend(
                mapper
                    .draw_many(&mut generator, count)?
                    .into_iter()
                    .map(|v| v.to_string()),
            );
        }
        Action::SeedOnly => {
            seed_generator(&cli, &config)?;
            debug!("No action requested; generator seeded only");
        }
    }

    Ok(lines)
}

/// Collects a seed in the selected mode and builds the generator.
fn seed_generator(cli: &Cli, config: &FileConfig) -> Result<BitStreamGenerator, CliError> {
    let thresholds = QualityThresholds::default();

    let sample = if cli.ibr {
        let matrix = open_image_source(&config.capture)?.capture_matrix()?;
        for advisory in thresholds.check_matrix(&matrix) {
            warn!("Captured image: {}", advisory);
        }
        ImageSeedSampler::new().sample(&matrix, config.generator.image_seed_bits)?
    } else {
        sample_cursor(config)?
    };

    let seed = Seed::from_sample(&sample);
    for advisory in thresholds.check_seed(&seed) {
        warn!("Seed: {}", advisory);
    }
    Ok(BitStreamGenerator::new(seed))
}

/// Opens the camera capture pipeline.
#[cfg(feature = "camera")]
fn open_image_source(config: &CaptureConfig) -> Result<Box<dyn ImageSource>, CaptureError> {
    let camera = imrand::capture::NokhwaCamera::new();
    Ok(Box::new(CapturePipeline::open(camera, config)?))
}

/// Opens a mock capture pipeline keyed from OS randomness.
#[cfg(not(feature = "camera"))]
fn open_image_source(config: &CaptureConfig) -> Result<Box<dyn ImageSource>, CaptureError> {
    use rand_core::{OsRng, RngCore};

    info!("Built without the `camera` feature; using a mock camera");
    let camera = imrand::capture::MockCamera::with_seed(OsRng.next_u64());
    Ok(Box::new(CapturePipeline::open(camera, config)?))
}

/// Collects a cursor seed from terminal mouse motion.
fn sample_cursor(config: &FileConfig) -> Result<SampledBits, CliError> {
    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel())?;

    let sampler = CursorSeedSampler::from_config(&config.cursor).with_cancellation(token);
    eprintln!("Move the mouse over this terminal window (Ctrl+C aborts)");

    let result = {
        let mut pointer = TerminalPointer::open()?;
        let mut progress = |collected: usize, total: usize| {
            eprint!("\r{}", progress_line(collected, total));
        };
        sampler.sample(&mut pointer, config.cursor.nbytes, &mut progress)
    };
    eprintln!();
    Ok(result?)
}

/// Renders `Completed NN% [###   ]`.
fn progress_line(collected: usize, total: usize) -> String {
    let total = total.max(1);
    let filled = collected.min(total) * PROGRESS_COLUMNS / total;
    format!(
        "Completed {:>3}% [{}{}]",
        collected.min(total) * 100 / total,
        "#".repeat(filled),
        " ".repeat(PROGRESS_COLUMNS - filled)
    )
}

/// Rewrites legacy flags such as `-IBR` or `-nRange` into the long
/// options clap understands. Negative numbers and unknown tokens pass
/// through untouched.
fn normalize_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 {
                return arg;
            }
            let name = arg.trim_start_matches('-');
            let dashes = arg.len() - name.len();
            let lower = name.to_ascii_lowercase();
            if (dashes == 1 || dashes == 2) && LEGACY_FLAGS.contains(&lower.as_str()) {
                format!("--{lower}")
            } else if dashes == 1 && lower == "help" {
                "--help".to_string()
            } else {
                arg
            }
        })
        .collect()
}
