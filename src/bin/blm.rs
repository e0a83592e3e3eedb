//! Command line tool running the boundary-layer analyses and writing their charts.

use anyhow::Context;
use blm_analysis::{
    profiles::ProfileAnalysis,
    spectra::{SpectralAnalysis, SpectralData},
    surface::{load_surface_record, SurfaceAnalysis},
    turbulence::{load_sonic_series, TurbulenceAnalysis},
    utility::ensure_dir,
    AnalysisConfig, PlotStyle, WindComponent,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use metfor::Quantity;
use optional::Optioned;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Boundary-layer meteorology analyses
#[derive(Parser)]
#[command(name = "blm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Analyze boundary-layer observations and plot the results", long_about = None)]
struct Cli {
    /// JSON configuration file, defaults are used for anything it leaves out
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the charts, overrides the configuration
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(short, long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Surface record time series, Obukhov length and energy balance
    Surface(InputArgs),
    /// Potential temperature and humidity profiles
    Profiles(InputArgs),
    /// Reynolds decomposition, fluxes and histograms of a sonic series
    Turbulence(InputArgs),
    /// Normalized spectra and dissipation rate
    Spectra(InputArgs),
    /// Run every analysis with the configured inputs
    All,
}

#[derive(Args)]
struct InputArgs {
    /// Input file (or directory for profiles), overrides the configuration
    #[arg(short, long)]
    input: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(output) = cli.output {
        config.output_dir = output;
    }

    ensure_dir(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;
    let style = PlotStyle::default();

    match cli.command {
        Commands::Surface(args) => {
            override_input(&mut config.surface_file, args);
            run_surface(&config, &style)
        }
        Commands::Profiles(args) => {
            override_input(&mut config.profile_dir, args);
            run_profiles(&config, &style)
        }
        Commands::Turbulence(args) => {
            override_input(&mut config.sonic_file, args);
            run_turbulence(&config, &style)
        }
        Commands::Spectra(args) => {
            override_input(&mut config.spectra_file, args);
            run_spectra(&config, &style)
        }
        Commands::All => {
            run_surface(&config, &style)?;
            run_profiles(&config, &style)?;
            run_turbulence(&config, &style)?;
            run_spectra(&config, &style)
        }
    }
}

fn override_input(target: &mut PathBuf, args: InputArgs) {
    if let Some(input) = args.input {
        *target = input;
    }
}

fn report_written(paths: &[PathBuf]) {
    for path in paths {
        println!("  wrote {}", path.display());
    }
}

fn fmt_opt(val: Option<f64>) -> String {
    val.map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "missing".to_owned())
}

fn run_surface(config: &AnalysisConfig, style: &PlotStyle) -> anyhow::Result<()> {
    let path: &Path = &config.surface_file;
    info!(path = %path.display(), "surface analysis");

    let record =
        load_surface_record(path).with_context(|| format!("loading {}", path.display()))?;
    let anal = SurfaceAnalysis::analyze(record, config.window_start, config.window_end)?;

    println!(
        "Surface: {} records, {} in the window, {} non-finite Obukhov lengths",
        anal.record().len(),
        anal.window().len(),
        anal.non_finite_count()
    );
    println!("  hour  mean L [m]  count");
    for h in anal.diurnal() {
        println!("  {:>4}  {:>10.2}  {:>5}", h.hour, h.mean, h.count);
    }

    report_written(&anal.render_charts(&config.output_dir, style)?);
    Ok(())
}

fn run_profiles(config: &AnalysisConfig, style: &PlotStyle) -> anyhow::Result<()> {
    let dir: &Path = &config.profile_dir;
    info!(dir = %dir.display(), "profile analysis");

    let anal = ProfileAnalysis::from_dir(dir).with_context(|| format!("loading {}", dir.display()))?;

    println!("Profiles: {} snapshots", anal.snapshots().len());
    for (snap, summary) in anal.snapshots().iter().zip(anal.summaries()) {
        println!(
            "  {}: {} levels, theta lapse rate {} K/km",
            summary.name,
            summary.levels,
            fmt_opt(summary.lapse_rate.into_option())
        );
        for &z in &config.report_heights {
            println!(
                "    {:>7.1} m  theta {} K  q {} kg/kg",
                z,
                fmt_opt(snap.theta_at(z).into_option()),
                fmt_opt(snap.specific_humidity_at(z).into_option())
            );
        }
    }

    report_written(&anal.render_charts(&config.output_dir, style)?);
    Ok(())
}

fn run_turbulence(config: &AnalysisConfig, style: &PlotStyle) -> anyhow::Result<()> {
    let path: &Path = &config.sonic_file;
    info!(path = %path.display(), "turbulence analysis");

    let series = load_sonic_series(path).with_context(|| format!("loading {}", path.display()))?;
    let anal = TurbulenceAnalysis::analyze(&series, &config.turbulence_settings()?)?;

    println!("Turbulence: {} samples", anal.series().len());
    println!("  block start          u* [m/s]  w'T' [K m/s]  L [m]  TKE [m2/s2]");
    for b in anal.blocks() {
        println!(
            "  {}  {}  {}  {}  {}",
            b.start,
            fmt_opt(b.friction_velocity.into_option().map(|u| u.unpack())),
            fmt_opt(b.heat_flux.into_option()),
            fmt_opt(b.obukhov_length.into_option().map(|l| l.unpack())),
            fmt_opt(b.tke.into_option()),
        );
    }

    report_written(&anal.render_charts(&config.output_dir, style)?);
    Ok(())
}

fn run_spectra(config: &AnalysisConfig, style: &PlotStyle) -> anyhow::Result<()> {
    let path: &Path = &config.spectra_file;
    info!(path = %path.display(), "spectral analysis");

    let data = SpectralData::from_file(path).with_context(|| format!("loading {}", path.display()))?;
    let anal = SpectralAnalysis::analyze(&data, &config.spectral)?;

    println!("Spectra: {} frequencies", data.len());
    for c in WindComponent::iter() {
        let spec = anal.component(c);
        println!("  {} variance {:.4} m2/s2", c.label(), spec.variance);
    }
    let show = |val: Optioned<f64>| fmt_opt(val.into_option());
    println!(
        "  dissipation rate {} m2/s3 (band {})",
        show(anal.overall_dissipation()),
        show(anal.band_dissipation)
    );
    println!(
        "  inertial points within the isotropy band: Sv/Su {}, Sw/Su {}",
        show(anal.isotropy_fraction_v),
        show(anal.isotropy_fraction_w)
    );

    report_written(&anal.render_charts(&config.output_dir, style)?);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_log_level() {
        let cli = Cli::try_parse_from(["blm", "all"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Info);

        let cli = Cli::try_parse_from(["blm", "surface", "-l", "debug"]).unwrap();
        assert_eq!(Level::from(cli.log_level), Level::DEBUG);

        // Typos are reported rather than ignored
        assert!(Cli::try_parse_from(["blm", "-l", "verbose", "all"]).is_err());
    }
}
