//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.locmetrics.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".locmetrics.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input scoping.
    #[serde(default)]
    pub input: InputConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "location_report.md".to_string()
}

/// Which jobs enter the aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Restrict the report to these zip codes (empty means all).
    #[serde(default)]
    pub zip_codes: Vec<String>,
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report heading.
    #[serde(default = "default_title")]
    pub title: String,

    /// Maximum rows in the location table (all when unset).
    #[serde(default)]
    pub max_rows: Option<usize>,

    /// Include the insights section.
    #[serde(default = "default_true")]
    pub include_insights: bool,

    /// Include the service-area directory when one is loaded.
    #[serde(default = "default_true")]
    pub include_service_areas: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            max_rows: None,
            include_insights: true,
            include_service_areas: true,
        }
    }
}

fn default_title() -> String {
    "Location Performance Report".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(ref zip_codes) = args.zip {
            self.input.zip_codes = zip_codes.clone();
        }

        if let Some(top) = args.top {
            self.report.max_rows = Some(top);
        }

        if args.no_insights {
            self.report.include_insights = false;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, "location_report.md");
        assert!(config.input.zip_codes.is_empty());
        assert_eq!(config.report.max_rows, None);
        assert!(config.report.include_insights);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.md"
verbose = true

[input]
zip_codes = ["90210", "90402"]

[report]
title = "Westside Locations"
max_rows = 5
include_service_areas = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.md");
        assert!(config.general.verbose);
        assert_eq!(config.input.zip_codes, vec!["90210", "90402"]);
        assert_eq!(config.report.title, "Westside Locations");
        assert_eq!(config.report.max_rows, Some(5));
        assert!(config.report.include_insights);
        assert!(!config.report.include_service_areas);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.report.title, "Location Performance Report");
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join(CONFIG_FILE), "[report]\nmax_rows = 3\n").unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.report.max_rows, Some(3));
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.input.zip_codes = vec!["91604".to_string()];

        let args = Args::parse_from([
            "locmetrics",
            "--jobs",
            "jobs.json",
            "--top",
            "10",
            "--no-insights",
            "-o",
            "out.md",
        ]);
        config.merge_with_args(&args);

        assert_eq!(config.general.output, "out.md");
        assert_eq!(config.report.max_rows, Some(10));
        assert!(!config.report.include_insights);
        // Not given on the command line, so the file value stays.
        assert_eq!(config.input.zip_codes, vec!["91604"]);
    }
}
