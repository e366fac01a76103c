//! Offline replay of a recorded sample log through the rate estimator.
//!
//! Usage:
//!   breath-replay session.csv --profile optical-flow --json

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use respiration_monitor::config::MonitorConfig;
use respiration_monitor::estimator::{analyze, Analysis};
use respiration_monitor::series::Series;
use respiration_monitor::logging::init_logging;
use respiration_monitor::source::read_sample_log;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Profile {
    /// Centre-region brightness at 5 Hz
    Brightness,
    /// Vertical motion magnitude at 10 Hz
    OpticalFlow,
}

/// Estimate the breathing rate of a recorded `seconds,value` log.
#[derive(Parser)]
#[command(name = "breath-replay", version, about)]
struct Cli {
    /// Sample log written during a monitoring session
    log: PathBuf,

    /// Threshold preset matching how the log was recorded
    #[arg(long, value_enum, default_value = "brightness")]
    profile: Profile,

    /// JSON configuration overriding the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full analysis as JSON
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Profile {
    fn preset(self) -> MonitorConfig {
        match self {
            Profile::Brightness => MonitorConfig::brightness(),
            Profile::OpticalFlow => MonitorConfig::optical_flow(),
        }
    }
}

fn load_config(profile: Profile, path: Option<&Path>) -> respiration_monitor::Result<MonitorConfig> {
    let preset = profile.preset();
    match path {
        Some(path) => preset.with_json_file_overrides(path),
        None => Ok(preset),
    }
}

fn load_series(path: &Path) -> respiration_monitor::Result<Series> {
    read_sample_log(File::open(path)?)
}

fn print_summary(analysis: &Analysis) {
    println!("samples:   {} ({} after warm-up)", analysis.total_samples, analysis.retained_samples);
    if let Some(rate) = analysis.sample_rate_hz {
        println!("rate:      {rate:.2} Hz");
    }
    if !analysis.peak_indices.is_empty() {
        let search = if analysis.relaxed { " (relaxed search)" } else { "" };
        println!("peaks:     {}{search}", analysis.peak_indices.len());
    }
    if let Some(cv) = analysis.interval_cv {
        println!("interval:  CV {cv:.3}, {} outliers", analysis.outliers);
    }
    println!("result:    {}", analysis.result);
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = match load_config(cli.profile, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            match cli.config.as_deref() {
                Some(path) => eprintln!("Error: {}: {e}", path.display()),
                None => eprintln!("Error: {e}"),
            }
            process::exit(1);
        },
    };

    let series = match load_series(&cli.log) {
        Ok(series) => series,
        Err(e) => {
            eprintln!("Error: {}: {e}", cli.log.display());
            process::exit(1);
        },
    };
    let analysis = analyze(&series, &config.estimator);

    if cli.json {
        match serde_json::to_string_pretty(&analysis) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: cannot encode analysis: {e}");
                process::exit(1);
            },
        }
    } else {
        print_summary(&analysis);
    }
}
