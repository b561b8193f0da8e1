//! speechaug - command-line entry point
//!
//! Exits non-zero only when the run cannot start or the corpus cannot be
//! walked. Per-recording failures are logged and counted.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use speechaug::config::parse_resample_quality;
use speechaug::{
    Augmenter, ConfigFile, ConfigOverrides, FftSize, PipelineConfig, ResampleQuality, SpeedMode,
};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for speechaug
#[derive(Parser, Debug)]
#[command(name = "speechaug")]
#[command(about = "Expand a subject-keyed speech corpus with speed and pitch variants")]
#[command(version)]
struct Args {
    /// Input corpus root (`<root>/<subject>/<file>.wav`) [default: segments]
    #[arg(short, long, env = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Output root mirroring the input subjects [default: segments_augmented]
    #[arg(short, long, env = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    /// Comma-separated speed factors [default: 0.9,1.1]
    #[arg(long, env = "SPEECHAUG_SPEEDS", value_delimiter = ',')]
    speeds: Option<Vec<f64>>,

    /// Comma-separated pitch shifts in cents [default: -100,100]
    #[arg(
        long,
        env = "SPEECHAUG_PITCHES",
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    pitches: Option<Vec<i32>>,

    /// TOML configuration file; command-line values win over it
    #[arg(short, long, env = "SPEECHAUG_CONFIG")]
    config: Option<PathBuf>,

    /// Worker threads (1 = sequential, 0 = one per core)
    #[arg(short, long, env = "SPEECHAUG_JOBS")]
    jobs: Option<usize>,

    /// How speed variants are made: reinterpret (default) or resample
    #[arg(long)]
    speed_mode: Option<SpeedMode>,

    /// Pitch shifter FFT size: 1024, 2048, 4096 or 8192
    #[arg(long)]
    fft_size: Option<FftSize>,

    /// Resampler quality: fast, medium, high or best
    #[arg(long, value_parser = parse_resample_quality)]
    quality: Option<ResampleQuality>,

    /// Print the artifact paths a run would write and exit
    #[arg(long)]
    dry_run: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_dir: self.input.clone(),
            output_dir: self.output.clone(),
            speeds: self.speeds.clone(),
            pitches: self.pitches.clone(),
            jobs: self.jobs,
            speed_mode: self.speed_mode,
            fft_size: self.fft_size,
            resample_quality: self.quality,
            dry_run: self.dry_run,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> speechaug::Result<()> {
    let file = args.config.as_deref().map(ConfigFile::load).transpose()?;
    let config = PipelineConfig::resolve(file, args.overrides())?;
    let augmenter = Augmenter::new(config)?;

    if augmenter.config().dry_run {
        let paths = augmenter.dry_run()?;
        for path in &paths {
            println!("{}", path.display());
        }
        tracing::info!("{} artifacts planned", paths.len());
        return Ok(());
    }

    let summary = augmenter.run()?;
    if summary.has_failures() {
        tracing::warn!(
            "{} of {} recordings failed, {} speed branches and {} pitch variants skipped",
            summary.recordings_failed,
            summary.recordings,
            summary.branches_failed,
            summary.variants_failed
        );
    }
    Ok(())
}
