//! Job export loading.
//!
//! This module reads exported job rows and service-area listings from
//! JSON, drops rows without revenue, validates the rest, and hands the
//! analysis layer plain `JobRecord`s.

use crate::models::{JobRecord, ServiceArea};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading an export.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Row {row}: missing zip code")]
    MissingZipCode { row: usize },

    #[error("Row {row}: invalid revenue {value}")]
    InvalidRevenue { row: usize, value: f64 },
}

/// Scoping applied to jobs before aggregation.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Keep only these zip codes (all when empty).
    pub zip_codes: Vec<String>,
}

impl JobFilter {
    /// Check whether a job in `zip_code` passes the filter.
    pub fn matches(&self, zip_code: &str) -> bool {
        self.zip_codes.is_empty() || self.zip_codes.iter().any(|z| z.trim() == zip_code)
    }
}

/// Jobs accepted from an export, with counts of what was left out.
#[derive(Debug, Clone, Default)]
pub struct LoadedJobs {
    /// Jobs ready for aggregation, in export order.
    pub jobs: Vec<JobRecord>,
    /// Rows dropped because their revenue was null.
    pub skipped: usize,
    /// Rows dropped by the zip-code filter.
    pub filtered_out: usize,
}

/// Location columns of a job row.
#[derive(Debug, Deserialize)]
struct LocationColumns {
    zip_code: String,
    city: String,
    #[serde(default)]
    area_name: Option<String>,
}

/// A job row as exported: either with the joined `locations` object or flattened.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JobRow {
    Joined {
        locations: LocationColumns,
        #[serde(default)]
        revenue: Option<f64>,
    },
    Flat {
        #[serde(flatten)]
        location: LocationColumns,
        #[serde(default)]
        revenue: Option<f64>,
    },
}

impl JobRow {
    fn into_parts(self) -> (LocationColumns, Option<f64>) {
        match self {
            JobRow::Joined { locations, revenue } => (locations, revenue),
            JobRow::Flat { location, revenue } => (location, revenue),
        }
    }
}

/// Load jobs from a JSON export file.
pub async fn load_jobs(path: &Path, filter: &JobFilter) -> Result<LoadedJobs, LoadError> {
    let label = path.display().to_string();
    info!("Loading jobs from: {}", label);

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Read {
            path: label.clone(),
            source,
        })?;

    let loaded = parse_jobs(&content, &label, filter)?;
    info!(
        "Loaded {} jobs ({} without revenue, {} filtered out)",
        loaded.jobs.len(),
        loaded.skipped,
        loaded.filtered_out
    );

    Ok(loaded)
}

/// Parse the content of a job export.
pub fn parse_jobs(content: &str, label: &str, filter: &JobFilter) -> Result<LoadedJobs, LoadError> {
    let rows: Vec<JobRow> = serde_json::from_str(content).map_err(|source| LoadError::Parse {
        path: label.to_string(),
        source,
    })?;

    let mut loaded = LoadedJobs::default();

    for (i, row) in rows.into_iter().enumerate() {
        let row_number = i + 1;
        let (location, revenue) = row.into_parts();

        let Some(revenue) = revenue else {
            loaded.skipped += 1;
            continue;
        };

        let zip_code = location.zip_code.trim();
        if zip_code.is_empty() {
            return Err(LoadError::MissingZipCode { row: row_number });
        }
        if !revenue.is_finite() || revenue < 0.0 {
            return Err(LoadError::InvalidRevenue {
                row: row_number,
                value: revenue,
            });
        }

        if !filter.matches(zip_code) {
            loaded.filtered_out += 1;
            continue;
        }

        loaded.jobs.push(JobRecord {
            zip_code: zip_code.to_string(),
            area_name: location.area_name,
            city: location.city,
            revenue,
        });
    }

    debug!(
        "Parsed {} rows from {}",
        loaded.jobs.len() + loaded.skipped + loaded.filtered_out,
        label
    );
    Ok(loaded)
}

/// Load the service-area directory, ordered by city.
pub async fn load_service_areas(path: &Path) -> Result<Vec<ServiceArea>, LoadError> {
    let label = path.display().to_string();
    info!("Loading service areas from: {}", label);

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Read {
            path: label.clone(),
            source,
        })?;

    let mut areas: Vec<ServiceArea> =
        serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: label.clone(),
            source,
        })?;

    areas.sort_by(|a, b| a.city.cmp(&b.city));
    debug!("Loaded {} service areas", areas.len());

    Ok(areas)
}
