//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::{Path, PathBuf};

/// locmetrics - location performance analytics for field-service jobs
///
/// Groups exported jobs by service location, ranks locations by revenue,
/// and writes a Markdown or JSON report with insights.
///
/// Examples:
///   locmetrics --jobs jobs.json
///   locmetrics --jobs jobs.json --locations locations.json --top 10
///   locmetrics --jobs jobs.json --zip 90210,90402 --format json -o report.json
///   locmetrics --jobs jobs.json --dry-run
///   locmetrics --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// JSON export of job rows to analyze
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present = "init_config",
        env = "LOCMETRICS_JOBS"
    )]
    pub jobs: Option<PathBuf>,

    /// JSON listing of service areas (zip, city, state, area, active flag)
    #[arg(short, long, value_name = "FILE")]
    pub locations: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Defaults to the config file value, or location_report.md
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .locmetrics.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only include jobs in these zip codes (comma-separated)
    ///
    /// Example: --zip 90210,90402
    #[arg(long, value_name = "CODES", value_delimiter = ',')]
    pub zip: Option<Vec<String>>,

    /// Show only the top N locations in the table
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Leave the insights section out of the report
    #[arg(long)]
    pub no_insights: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: load and aggregate, print the table, write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .locmetrics.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.top == Some(0) {
            return Err("--top must be at least 1".to_string());
        }

        if let Some(ref zips) = self.zip {
            if zips.iter().any(|z| z.trim().is_empty()) {
                return Err("Zip codes in --zip must not be empty".to_string());
            }
        }

        match self.jobs {
            Some(ref path) => check_input_file(path, "Jobs")?,
            None => return Err("--jobs is required".to_string()),
        }

        if let Some(ref path) = self.locations {
            check_input_file(path, "Locations")?;
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

fn check_input_file(path: &Path, what: &str) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("{} file does not exist: {}", what, path.display()));
    }
    if !path.is_file() {
        return Err(format!("{} path is not a file: {}", what, path.display()));
    }
    Ok(())
}
