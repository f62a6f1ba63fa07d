// Canis CLI - Command-line front end
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Canis CLI
//!
//! Classifies a day of collar readings and prints a per-sample report and a
//! 24-hour condition chart.
//!
//! ## Usage
//!
//! ```bash
//! # Classify a dataset with the reference rule base
//! canis run --csv data/sick_day.csv
//!
//! # Half-hour slots, JSON output
//! canis run --csv data/sick_day.csv --slots 48 --json
//!
//! # Membership curves for plotting
//! canis curves --variable heart_rate --points 50
//!
//! # Synthetic dataset
//! canis generate --profile critical --seed 42 --out critical.csv
//! ```

mod chart;
mod ingest;

use canis::{
    CanisError, Classifier, ConfigurationError, DailySummary, FuzzyConfig, ReportTally, Reporter,
    RuleBase, SampleOutcome,
};
use canis_testdata::{DatasetError, GeneratorConfig, Profile};
use clap::{Parser, Subcommand, ValueEnum};
use ingest::IngestError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Canis condition classifier
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify every sample of a CSV dataset
    Run {
        /// CSV file to classify
        #[arg(short, long)]
        csv: PathBuf,

        /// JSON configuration (defaults to the reference system)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Daily summary slots, overriding the configuration
        #[arg(long)]
        slots: Option<usize>,

        /// Print results and summary as JSON
        #[arg(long)]
        json: bool,

        /// Skip the text chart
        #[arg(long)]
        no_chart: bool,
    },

    /// Print membership curves as CSV
    Curves {
        /// JSON configuration (defaults to the reference system)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only this variable
        #[arg(short, long)]
        variable: Option<String>,

        /// Maximum rows per variable
        #[arg(short, long)]
        points: Option<usize>,
    },

    /// Write a synthetic day of readings
    Generate {
        /// Health profile
        #[arg(short, long, value_enum, default_value = "fine")]
        profile: ProfileArg,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Minutes between readings
        #[arg(short, long, default_value = "60")]
        interval_mins: u32,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the reference configuration as JSON
    Config,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ProfileArg {
    Fine,
    Sick,
    Critical,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Fine => Profile::Fine,
            ProfileArg::Sick => Profile::Sick,
            ProfileArg::Critical => Profile::Critical,
        }
    }
}

/// CLI errors.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigFile(#[from] serde_json::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Canis(#[from] CanisError),

    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("Dataset output failed: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),
}

/// JSON output of `run`.
#[derive(Serialize)]
struct RunReport<'a> {
    outcomes: &'a [SampleOutcome],
    summary: &'a DailySummary,
    tally: &'a ReportTally,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute(args.command) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn execute(command: Command) -> Result<(), CliError> {
    match command {
        Command::Run {
            csv,
            config,
            slots,
            json,
            no_chart,
        } => run(&csv, config.as_deref(), slots, json, no_chart),
        Command::Curves {
            config,
            variable,
            points,
        } => curves(config.as_deref(), variable.as_deref(), points),
        Command::Generate {
            profile,
            seed,
            interval_mins,
            out,
        } => generate(profile.into(), seed, interval_mins, out.as_deref()),
        Command::Config => {
            println!("{}", FuzzyConfig::default().to_json_pretty()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<FuzzyConfig, CliError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let config = FuzzyConfig::from_json(&text)?;
            info!("Configuration loaded from {}", path.display());
            Ok(config)
        }
        None => Ok(FuzzyConfig::default()),
    }
}

fn run(
    csv: &Path,
    config_path: Option<&Path>,
    slots: Option<usize>,
    json: bool,
    no_chart: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let rule_base = config.build()?;
    let slot_count = slots.unwrap_or(config.report.slot_count);

    let samples = ingest::load_samples(csv)?;
    info!("Dataset loaded: {} samples", samples.len());

    let classifier = Classifier::new(&rule_base).with_label_terms(config.report.label_terms);
    let mut reporter = Reporter::new(classifier);
    reporter.record_all(&samples)?;

    let summary = reporter.daily_summary(slot_count)?;
    let tally = reporter.tally();

    if json {
        let report = RunReport {
            outcomes: reporter.outcomes(),
            summary: &summary,
            tally: &tally,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let output_name = rule_base.consequent().name();
    for outcome in reporter.outcomes() {
        println!("{}", outcome.report_line(output_name));
    }
    if !no_chart {
        println!();
        print!("{}", chart::render_summary(&summary));
    }
    println!();
    print!("{}", chart::render_tally(&tally));
    Ok(())
}

fn curves(
    config_path: Option<&Path>,
    variable: Option<&str>,
    points: Option<usize>,
) -> Result<(), CliError> {
    let rule_base: RuleBase = load_config(config_path)?.build()?;

    let selected: Vec<_> = match variable {
        Some(name) => {
            let found = rule_base
                .variables()
                .find(|v| v.name() == name)
                .ok_or_else(|| CliError::UnknownVariable(name.to_string()))?;
            vec![found]
        }
        None => rule_base.variables().collect(),
    };

    for (i, v) in selected.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", chart::render_curves(v, points));
    }
    Ok(())
}

fn generate(
    profile: Profile,
    seed: Option<u64>,
    interval_mins: u32,
    out: Option<&Path>,
) -> Result<(), CliError> {
    let mut config = GeneratorConfig::new().with_interval_minutes(interval_mins);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let samples = canis_testdata::generate(profile, &config);

    match out {
        Some(path) => {
            canis_testdata::to_csv_file(&samples, path)?;
            info!(
                "Wrote {} {} samples to {}",
                samples.len(),
                profile,
                path.display()
            );
        }
        None => canis_testdata::write_csv(&samples, std::io::stdout().lock())?,
    }
    Ok(())
}
