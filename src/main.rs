//! Command-line front end: filters gray images in the frequency domain and renders their spectra.

use clap::{Args, Parser, Subcommand};
use fourier_image_explorer::io::{open_gray_image, output_path, save_gray_image};
use fourier_image_explorer::{
    BaseShape, FilterKind, FilterOperation, FilterSettings, FrequencyFilter, LaplacianOutput,
    PassMode, SpectrumVisualizer,
};
use preferences::{AppInfo, Preferences};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

const APP_INFO: AppInfo = AppInfo {
    name: "Fourier Image Explorer",
    author: "Linus Leo Stöckli",
};

const PREFS_KEY: &str = "config/filter";

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " on ",
    env!("GIT_BRANCH"),
    ")"
);

#[derive(Parser)]
#[command(name = "fourier-image-explorer")]
#[command(about = "Frequency-domain filtering of gray-scale images")]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter images and write `<stem>_<filter>.png` for each of them.
    Filter {
        #[command(flatten)]
        files: FileArgs,
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Write the log-magnitude spectrum `<stem>_spectrum.png` of each image.
    Spectrum {
        #[command(flatten)]
        files: FileArgs,
        /// Also write the transfer function of the configured filter as `<stem>_transfer.png`.
        #[arg(long)]
        with_transfer: bool,
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Print the parameters of the configured filter.
    Params {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

#[derive(Debug, Clone, Args)]
struct FileArgs {
    /// Input images. Color images are converted to gray.
    #[arg(long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Directory the results are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

/// Overrides for the stored filter settings.
#[derive(Debug, Clone, Args)]
struct SettingsArgs {
    /// Filter to apply.
    #[arg(long, value_enum)]
    kind: Option<FilterKind>,

    /// Base shape of the high-boost and homomorphic filters.
    #[arg(long, value_enum)]
    base: Option<BaseShape>,

    #[arg(long, value_enum)]
    mode: Option<PassMode>,

    /// Cutoff distance from the spectrum center, in frequency cells.
    #[arg(long)]
    cutoff: Option<f64>,

    /// Butterworth order.
    #[arg(long)]
    order: Option<f64>,

    /// Width of the coefficient Gaussian.
    #[arg(long)]
    sigma: Option<f64>,

    /// Peak gain of the coefficient Gaussian.
    #[arg(long)]
    coefficient: Option<f64>,

    /// Constant term of the high-boost filter.
    #[arg(long, allow_hyphen_values = true)]
    boost_offset: Option<f64>,

    /// Gain of the base shape in the high-boost filter.
    #[arg(long)]
    boost_gain: Option<f64>,

    /// Homomorphic gain for low frequencies (illumination).
    #[arg(long)]
    gamma_low: Option<f64>,

    /// Homomorphic gain for high frequencies (reflectance).
    #[arg(long)]
    gamma_high: Option<f64>,

    /// Output of the Laplacian filter.
    #[arg(long, value_enum)]
    laplacian: Option<LaplacianOutput>,

    /// Store the resulting settings as the new defaults.
    #[arg(long)]
    save_defaults: bool,
}

impl SettingsArgs {
    fn apply(&self, settings: &mut FilterSettings) {
        if let Some(kind) = self.kind {
            settings.kind = kind;
        }
        if let Some(base) = self.base {
            settings.base = base;
        }
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if let Some(laplacian) = self.laplacian {
            settings.laplacian = laplacian;
        }
        let values = [
            (self.cutoff, &mut settings.cutoff),
            (self.order, &mut settings.order),
            (self.sigma, &mut settings.sigma),
            (self.coefficient, &mut settings.coefficient),
            (self.boost_offset, &mut settings.boost_offset),
            (self.boost_gain, &mut settings.boost_gain),
            (self.gamma_low, &mut settings.gamma_low),
            (self.gamma_high, &mut settings.gamma_high),
        ];
        for (value, target) in values {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}

/// Stored settings, or the defaults (which are then stored) on the first run.
fn load_settings() -> FilterSettings {
    match FilterSettings::load(&APP_INFO, PREFS_KEY) {
        Ok(settings) => settings,
        Err(err) => {
            log::debug!("no stored settings ({err}), using defaults");
            let settings = FilterSettings::default();
            // save default settings
            if let Err(err) = settings.save(&APP_INFO, PREFS_KEY) {
                log::error!("error in saving filter settings: {err:?}");
            }
            settings
        }
    }
}

/// Stored settings with the command-line overrides applied, validated into an operation.
fn resolve_settings(args: &SettingsArgs) -> CliResult<(FilterSettings, FilterOperation)> {
    let mut settings = load_settings();
    args.apply(&mut settings);
    let operation = settings.build()?;
    if args.save_defaults {
        settings.save(&APP_INFO, PREFS_KEY)?;
        log::info!("stored settings for {} as defaults", operation.name());
    }
    Ok((settings, operation))
}

/// Runs `job` on every input in parallel, logging each failure. Fails if any input failed.
fn for_each_input<F>(files: &FileArgs, job: F) -> CliResult<()>
where
    F: Fn(&Path) -> CliResult<Vec<PathBuf>> + Sync,
{
    std::fs::create_dir_all(&files.out_dir)?;
    let failures: usize = files
        .input
        .par_iter()
        .map(|input| match job(input.as_path()) {
            Ok(written) => {
                for path in written {
                    log::info!("{} -> {}", input.display(), path.display());
                }
                0
            }
            Err(err) => {
                log::error!("{}: {err}", input.display());
                1
            }
        })
        .sum();
    if failures > 0 {
        return Err(format!("{failures} of {} file(s) failed", files.input.len()).into());
    }
    Ok(())
}

fn run_filter(files: &FileArgs, settings: &SettingsArgs) -> CliResult<()> {
    let (settings, operation) = resolve_settings(settings)?;
    let filter = FrequencyFilter::new();
    log::info!("applying {} to {} file(s)", operation.name(), files.input.len());
    for_each_input(files, |input| {
        let image = open_gray_image(input)?;
        let filtered = operation.apply(&filter, &image)?;
        let path = output_path(&files.out_dir, input, settings.kind.file_suffix());
        save_gray_image(&filtered, &path)?;
        Ok(vec![path])
    })
}

fn run_spectrum(files: &FileArgs, with_transfer: bool, settings: &SettingsArgs) -> CliResult<()> {
    let operation = if with_transfer {
        Some(resolve_settings(settings)?.1)
    } else {
        None
    };
    let filter = FrequencyFilter::new();
    let visualizer = SpectrumVisualizer::new();
    for_each_input(files, |input| {
        let image = open_gray_image(input)?;
        let spectrum = filter.transform().forward(&image)?;
        let path = output_path(&files.out_dir, input, "spectrum");
        save_gray_image(&visualizer.magnitude_image(&spectrum), &path)?;
        let mut written = vec![path];
        if let Some(operation) = &operation {
            let (width, height) = image.dimensions();
            let mask = operation.mask(width, height)?;
            let path = output_path(&files.out_dir, input, "transfer");
            save_gray_image(&visualizer.transfer_image(&mask), &path)?;
            written.push(path);
        }
        Ok(written)
    })
}

fn run_params(settings: &SettingsArgs) -> CliResult<()> {
    let (_, operation) = resolve_settings(settings)?;
    println!("{}", operation.name());
    for parameter in operation.parameters() {
        println!(
            "  {:<14} {:>12}  [{}, {}]",
            parameter.name, parameter.value, parameter.min, parameter.max
        );
    }
    Ok(())
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Filter { files, settings } => run_filter(&files, &settings),
        Commands::Spectrum {
            files,
            with_transfer,
            settings,
        } => run_spectrum(&files, with_transfer, &settings),
        Commands::Params { settings } => run_params(&settings),
    }
}
