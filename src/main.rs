//! locmetrics - location performance analytics
//!
//! A CLI tool that groups exported field-service jobs by service
//! location, ranks locations by revenue, and writes a report with
//! per-location metrics and insights.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, unreadable or malformed input, write failure)

mod analysis;
mod cli;
mod config;
mod format;
mod models;
mod report;
mod source;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use format::{format_currency, format_whole};
use models::{LocationMetric, Report, ReportMetadata};
use source::JobFilter;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging so it can turn on verbose output
    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("locmetrics v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Config: {:?}", config);

    match run_report(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .locmetrics.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the output path, zip-code filter, and report sections.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load, aggregate, and write the report. Returns the exit code.
async fn run_report(args: Args, config: Config) -> Result<i32> {
    let jobs_path = args.jobs.clone().context("No job export given")?;
    let filter = JobFilter {
        zip_codes: config.input.zip_codes.clone(),
    };
    if !filter.zip_codes.is_empty() {
        info!("Restricting to zip codes: {}", filter.zip_codes.join(", "));
    }

    // Step 1: Load the job export
    println!("📥 Loading jobs: {}", jobs_path.display());
    let loaded = source::load_jobs(&jobs_path, &filter).await?;
    if loaded.skipped > 0 {
        warn!("Skipped {} jobs without revenue", loaded.skipped);
    }

    let service_areas = match args.locations {
        Some(ref path) => {
            println!("📥 Loading service areas: {}", path.display());
            source::load_service_areas(path).await?
        }
        None => Vec::new(),
    };

    // Step 2: Aggregate
    println!("\n🔬 Aggregating {} jobs by location...", loaded.jobs.len());
    let metrics = analysis::aggregate_locations(&loaded.jobs);
    let summary = analysis::summarize_locations(&metrics, &service_areas);
    let insights = analysis::generate_insights(&metrics);
    info!(
        "Computed metrics for {} locations, {} insights",
        metrics.len(),
        insights.len()
    );

    if args.dry_run {
        return handle_dry_run(&metrics, config.report.max_rows);
    }

    // Step 3: Build the report
    println!("\n📝 Generating report...");

    let report = Report {
        metadata: ReportMetadata {
            title: config.report.title.clone(),
            source: jobs_path.display().to_string(),
            generated_at: Utc::now(),
            jobs_loaded: loaded.jobs.len(),
            jobs_skipped: loaded.skipped,
            locations: metrics.len(),
        },
        summary: summary.clone(),
        metrics,
        insights,
        service_areas,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    let output_path = resolve_output_path(&args, &config);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Location Summary:");
    println!("   Locations with jobs: {}", report.metrics.len());
    println!("   Jobs: {}", summary.total_jobs);
    println!("   Revenue: ${}", format_currency(summary.total_revenue));
    if let (Some(zip), Some(revenue)) = (&summary.top_zip_code, summary.top_revenue) {
        println!("   Top ZIP: {} (${})", zip, format_currency(revenue));
    }
    println!(
        "\n✅ Report complete! Saved to: {}",
        output_path.display()
    );

    Ok(0)
}

/// Handle --dry-run: print the ranked locations and exit without writing.
fn handle_dry_run(metrics: &[LocationMetric], max_rows: Option<usize>) -> Result<i32> {
    println!("\n🔍 Dry run: no report will be written.\n");

    if metrics.is_empty() {
        println!("   No jobs with revenue found.");
    } else {
        let shown = analysis::top_locations(metrics, max_rows.unwrap_or(metrics.len()));
        for (rank, metric) in shown.iter().enumerate() {
            println!(
                "   {:>2}. {} {:<20} {:>5} jobs  ${:>12}  avg ${}",
                rank + 1,
                metric.zip_code,
                metric.display_name(),
                metric.job_count,
                format_currency(metric.total_revenue),
                format_whole(metric.avg_ticket)
            );
        }
        println!("\n   Total: {} locations", metrics.len());
    }

    println!("\n✅ Dry run complete.");
    Ok(0)
}

/// Pick the report path, switching the default extension for JSON output.
fn resolve_output_path(args: &Args, config: &Config) -> PathBuf {
    let path = PathBuf::from(&config.general.output);

    if args.output.is_none() && args.format == OutputFormat::Json {
        path.with_extension("json")
    } else {
        path
    }
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}
