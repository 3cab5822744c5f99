//! GEOZONE - Well-Log Zone Detection
//!
//! Batch command-line front end over the `geozone` library.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a JSON / JSON Lines file and print a summary table
//! geozone analyze logs.jsonl
//!
//! # Force an application and write the full report as JSON
//! geozone analyze logs.json --application groundwater --format json -o report.json
//!
//! # Export flagged zones as CSV
//! geozone analyze logs.json --format csv --csv-target zones
//!
//! # Print or write the default configuration
//! geozone config --write geozone.toml
//! ```
//!
//! # Environment Variables
//!
//! - `GEOZONE_CONFIG`: Path to a TOML config file (default: ./geozone.toml)
//! - `RUST_LOG`: Logging level (default: info)

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use geozone::export::{render_table, write_csv, write_json};
use geozone::{read_records, Application, DatasetAnalyzer, GeozoneConfig};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "geozone")]
#[command(about = "GEOZONE Well-Log Zone Detection")]
#[command(version)]
struct CliArgs {
    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a batch of well-log records and report zones and predictions
    Analyze {
        /// JSON array or JSON Lines file of records (metric units)
        input: PathBuf,

        /// Application override ("auto" to infer from the record fields)
        #[arg(short, long)]
        application: Option<String>,

        /// Config file (default: $GEOZONE_CONFIG, then ./geozone.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Which record set to write when --format csv
        #[arg(long, value_enum, default_value_t = CsvTarget::Zones)]
        csv_target: CsvTarget,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the isolation forest seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the application inferred from the record fields
    DetectApplication {
        /// JSON array or JSON Lines file of records
        input: PathBuf,
    },

    /// Print the default configuration as TOML
    Config {
        /// Write the defaults to this path instead of stdout
        #[arg(long, value_name = "PATH")]
        write: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CsvTarget {
    Zones,
    Predictions,
    Samples,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    match args.command {
        Command::Analyze {
            input,
            application,
            config,
            format,
            csv_target,
            output,
            seed,
        } => {
            let mut config = match config {
                Some(path) => GeozoneConfig::load_from_file(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => GeozoneConfig::load(),
            };
            if let Some(app) = application {
                config.analysis.application = app;
            }
            if let Some(seed) = seed {
                config.detector.seed = seed;
            }
            run_analyze(&input, config, format, csv_target, output.as_deref())
        }
        Command::DetectApplication { input } => {
            let records = read_records(&input)
                .with_context(|| format!("Failed to read records from {}", input.display()))?;
            let application = Application::detect(&records);
            info!(records = records.len(), %application, "Application detected");
            println!("{application}");
            Ok(())
        }
        Command::Config { write } => {
            let config = GeozoneConfig::default();
            match write {
                Some(path) => {
                    config
                        .save_to_file(&path)
                        .with_context(|| format!("Failed to write config {}", path.display()))?;
                    info!(path = %path.display(), "Default configuration written");
                }
                None => print!("{}", config.to_toml().context("Failed to render config")?),
            }
            Ok(())
        }
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Logs go to stderr so stdout stays clean for report output
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }
}

// ============================================================================
// Analyze
// ============================================================================

fn run_analyze(
    input: &Path,
    config: GeozoneConfig,
    format: OutputFormat,
    csv_target: CsvTarget,
    output: Option<&Path>,
) -> Result<()> {
    let records = read_records(input)
        .with_context(|| format!("Failed to read records from {}", input.display()))?;
    debug!(path = %input.display(), records = records.len(), "Records loaded");

    let report = DatasetAnalyzer::new(config)
        .analyze(&records)
        .context("Analysis failed")?;

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match format {
        OutputFormat::Json => write_json(&report, writer).context("Failed to write JSON")?,
        OutputFormat::Csv => {
            let written = match csv_target {
                CsvTarget::Zones => write_csv(&report.zones.zones, writer),
                CsvTarget::Predictions => write_csv(&report.predictions, writer),
                CsvTarget::Samples => write_csv(&report.data_points, writer),
            };
            written.context("Failed to write CSV")?;
        }
        OutputFormat::Table => {
            writer
                .write_all(render_table(&report).as_bytes())
                .context("Failed to write table")?;
            writer.flush().context("Failed to write table")?;
        }
    }

    if let Some(path) = output {
        info!(path = %path.display(), "Output written");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_analyze() {
        let args = CliArgs::parse_from([
            "geozone",
            "analyze",
            "logs.json",
            "--application",
            "auto",
            "--format",
            "csv",
            "--csv-target",
            "predictions",
            "--seed",
            "7",
        ]);
        match args.command {
            Command::Analyze {
                input,
                application,
                format,
                csv_target,
                seed,
                ..
            } => {
                assert_eq!(input, PathBuf::from("logs.json"));
                assert_eq!(application.as_deref(), Some("auto"));
                assert_eq!(format, OutputFormat::Csv);
                assert_eq!(csv_target, CsvTarget::Predictions);
                assert_eq!(seed, Some(7));
            }
            other => panic!("Expected analyze, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_defaults_to_table() {
        let args = CliArgs::parse_from(["geozone", "analyze", "x.jsonl"]);
        assert!(matches!(
            args.command,
            Command::Analyze {
                format: OutputFormat::Table,
                csv_target: CsvTarget::Zones,
                ..
            }
        ));
    }

    #[test]
    fn test_cli_parses_config_write() {
        let args = CliArgs::parse_from(["geozone", "config", "--write", "out.toml"]);
        assert!(matches!(args.command, Command::Config { write: Some(_) }));
    }
}
