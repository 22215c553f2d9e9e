//! Data models for location analytics.
//!
//! This module contains the core data structures used throughout
//! the application for representing jobs, per-location metrics,
//! insights, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display priority of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Informational
    Low,
    /// Worth a look
    Medium,
    /// Act on it
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

impl Priority {
    /// Returns an emoji representation of the priority.
    pub fn emoji(&self) -> &'static str {
        match self {
            Priority::Low => "🔵",
            Priority::Medium => "🟡",
            Priority::High => "🔴",
        }
    }
}

/// Picks the human-readable label for a location: area name when set, city otherwise.
fn display_label<'a>(area_name: &'a Option<String>, city: &'a str) -> &'a str {
    match area_name.as_deref() {
        Some(area) if !area.is_empty() => area,
        _ => city,
    }
}

/// A single completed job with a known revenue figure.
///
/// Rows without revenue never become a `JobRecord`; they are dropped
/// when the export is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Postal code of the service location (grouping key).
    pub zip_code: String,
    /// Neighborhood label, preferred over the city when present.
    pub area_name: Option<String>,
    /// City of the service location.
    pub city: String,
    /// Revenue billed for the job.
    pub revenue: f64,
}

/// Aggregated performance of one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMetric {
    /// Postal code identifying the location.
    pub zip_code: String,
    /// Area label copied from the first job seen for this zip code.
    pub area_name: Option<String>,
    /// City copied from the first job seen for this zip code.
    pub city: String,
    /// Number of jobs performed here.
    pub job_count: u64,
    /// Sum of job revenue.
    pub total_revenue: f64,
    /// Revenue per job.
    pub avg_ticket: f64,
    /// Estimated number of customers (see `approximate_customer_count`).
    pub customer_count: u64,
}

impl LocationMetric {
    /// Creates an empty accumulator seeded from the first job of a location.
    pub fn seed(job: &JobRecord) -> Self {
        Self {
            zip_code: job.zip_code.clone(),
            area_name: job.area_name.clone(),
            city: job.city.clone(),
            job_count: 0,
            total_revenue: 0.0,
            avg_ticket: 0.0,
            customer_count: 0,
        }
    }

    /// Returns the label used when presenting this location.
    pub fn display_name(&self) -> &str {
        display_label(&self.area_name, &self.city)
    }
}

/// A short textual observation derived from ranked metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Headline of the insight.
    pub title: String,
    /// Body text.
    pub insight: String,
    /// Display priority.
    pub priority: Priority,
}

/// An entry of the service-area directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceArea {
    /// Postal code.
    pub zip_code: String,
    /// City name.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Optional neighborhood label.
    #[serde(default)]
    pub area_name: Option<String>,
    /// Whether the company currently serves this area.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ServiceArea {
    /// Returns the label used when presenting this area.
    pub fn display_name(&self) -> &str {
        display_label(&self.area_name, &self.city)
    }
}

/// Headline figures shown above the location table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    /// Number of service areas.
    pub service_areas: usize,
    /// Number of active service areas (directory only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_service_areas: Option<usize>,
    /// Number of distinct cities covered.
    pub cities: usize,
    /// Zip code with the most revenue.
    pub top_zip_code: Option<String>,
    /// Revenue of the top zip code.
    pub top_revenue: Option<f64>,
    /// Mean of total revenue across locations with jobs.
    pub average_revenue_per_area: Option<f64>,
    /// Jobs across all locations.
    pub total_jobs: u64,
    /// Revenue across all locations.
    pub total_revenue: f64,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report title.
    pub title: String,
    /// Path of the job export the report was built from.
    pub source: String,
    /// Date and time of generation.
    pub generated_at: DateTime<Utc>,
    /// Number of jobs that entered the aggregation.
    pub jobs_loaded: usize,
    /// Number of rows skipped for missing revenue.
    pub jobs_skipped: usize,
    /// Number of distinct locations.
    pub locations: usize,
}

/// The complete location performance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Overview figures.
    pub summary: LocationSummary,
    /// Per-location metrics, highest revenue first.
    pub metrics: Vec<LocationMetric>,
    /// Derived insights.
    pub insights: Vec<Insight>,
    /// Service-area directory, when one was supplied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_areas: Vec<ServiceArea>,
}
