//! Batch driver for the noise fingerprint pipeline
//!
//! Feeds raw rig recordings (or previously exported curves) through the
//! core and writes the per-recording spectra plus the combined fingerprint
//! table. One bad recording is logged and skipped; the batch continues.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use noise_fingerprint::{
    default_band_catalogue, Pipeline, PipelineConfig, WindowKind,
};

mod io;

/// Noise fingerprinting for bearing/motor test rig recordings.
#[derive(Parser)]
#[command(name = "noise-fingerprint")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Frame length in samples
    #[arg(long, default_value_t = 512, global = true)]
    frame_length: usize,

    /// Fraction of each frame shared with its predecessor
    #[arg(long, default_value_t = 0.5, global = true)]
    overlap_fraction: f64,

    /// Taper window for spectral frames
    #[arg(long, value_enum, default_value = "hamming", global = true)]
    window: WindowArg,

    /// dB reference level
    #[arg(long, default_value_t = 0.5, global = true)]
    db_reference: f64,

    /// Minimum peak prominence in dB
    #[arg(long, default_value_t = 1.0, global = true)]
    prominence: f64,

    /// Minimum index distance between detected peaks
    #[arg(long, default_value_t = 10, global = true)]
    min_distance: usize,

    /// Half-width of the nulled window around each peak
    #[arg(long, default_value_t = 5, global = true)]
    buffer_width: usize,

    /// Skip peak suppression entirely
    #[arg(long, global = true)]
    no_suppress: bool,

    /// Band catalogue file (start_hz,end_hz per line); defaults to the
    /// rig's twelve bands
    #[arg(long, global = true)]
    bands: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Process a directory of raw .bin recordings into spectra and the
    /// combined fingerprint table
    Analyze {
        /// Directory containing raw little-endian i16 recordings
        input_dir: PathBuf,

        /// Output directory
        #[arg(long, short, default_value = "fingerprint_output")]
        output_dir: PathBuf,

        /// Recording sample rate in Hz
        #[arg(long, default_value_t = 96_000.0)]
        sample_rate: f64,
    },

    /// Suppress peaks on an already-exported curve CSV and write its
    /// band medians
    Suppress {
        /// Curve CSV with frequency and value columns
        input: PathBuf,

        /// Output directory
        #[arg(long, short, default_value = "fingerprint_output")]
        output_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WindowArg {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl From<WindowArg> for WindowKind {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::Hann => WindowKind::Hann,
            WindowArg::Hamming => WindowKind::Hamming,
            WindowArg::Blackman => WindowKind::Blackman,
            WindowArg::Rectangular => WindowKind::Rectangular,
        }
    }
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let catalogue = match &self.bands {
            Some(path) => io::read_bands_file(path)?,
            None => default_band_catalogue(),
        };

        let mut config = PipelineConfig::with_catalogue(catalogue);
        config.frame_length = self.frame_length;
        config.overlap_fraction = self.overlap_fraction;
        config.window_kind = self.window.into();
        config.db_reference = self.db_reference;
        config.peak_prominence = self.prominence;
        config.peak_min_distance = self.min_distance;
        config.peak_buffer_width = self.buffer_width;
        config.suppress_peaks = !self.no_suppress;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noise_fingerprint=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut pipeline = Pipeline::new(cli.pipeline_config()?)?;

    match &cli.command {
        Command::Analyze {
            input_dir,
            output_dir,
            sample_rate,
        } => analyze(&mut pipeline, input_dir, output_dir, *sample_rate),
        Command::Suppress { input, output_dir } => suppress(&mut pipeline, input, output_dir),
    }
}

fn analyze(
    pipeline: &mut Pipeline,
    input_dir: &Path,
    output_dir: &Path,
    sample_rate: f64,
) -> Result<()> {
    let spectra_dir = output_dir.join("spectra");
    fs::create_dir_all(&spectra_dir)
        .with_context(|| format!("creating {}", spectra_dir.display()))?;

    let mut paths: Vec<PathBuf> = fs::read_dir(input_dir)
        .with_context(|| format!("reading {}", input_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "bin"))
        .collect();
    // The capture box names files by timestamp, so name order is
    // chronological order
    paths.sort();
    info!(count = paths.len(), dir = %input_dir.display(), "found recordings");

    let mut builder = pipeline.table_builder();
    for path in &paths {
        let identity = match path.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => continue,
        };

        let fingerprint = io::load_raw_samples(path)
            .and_then(|samples| Ok(pipeline.process_recording(&samples, sample_rate)?));
        let fingerprint = match fingerprint {
            Ok(fp) => fp,
            Err(error) => {
                warn!(recording = %identity, %error, "skipping recording");
                continue;
            }
        };

        io::write_curve_csv(
            &spectra_dir.join(format!("{identity}.csv")),
            "Power spectrum (dB)",
            &fingerprint.curve.frequencies_hz,
            &fingerprint.curve.power_db,
        )?;

        if let Err(error) = builder.append(identity.as_str(), fingerprint.band_medians) {
            warn!(recording = %identity, %error, "skipping recording");
        }
    }

    let table = builder.finish();
    let table_path = output_dir.join("fingerprint_table.csv");
    io::write_table_csv(&table_path, &table)?;
    info!(
        recordings = table.num_recordings(),
        bands = table.num_bands(),
        path = %table_path.display(),
        "wrote fingerprint table"
    );
    Ok(())
}

fn suppress(pipeline: &mut Pipeline, input: &Path, output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "curve".into());

    let (frequencies, values) = io::read_curve_csv(input)?;
    let fingerprint = pipeline.process_curve(frequencies, values)?;
    info!(
        peaks = fingerprint.peak_regions.len(),
        "suppressed peak regions"
    );

    io::write_curve_csv(
        &output_dir.join(format!("{stem}_suppressed.csv")),
        "Power spectrum (dB)",
        &fingerprint.curve.frequencies_hz,
        &fingerprint.suppressed,
    )?;
    io::write_medians_csv(
        &output_dir.join(format!("{stem}_medians.csv")),
        &pipeline.config().band_catalogue,
        &fingerprint.band_medians,
    )?;
    Ok(())
}
