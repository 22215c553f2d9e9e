//! Markdown report generation.
//!
//! This module generates Markdown and JSON location performance
//! reports from the analysis results.

use crate::analysis::top_locations;
use crate::config::ReportConfig;
use crate::format::{format_currency, format_whole};
use crate::models::{Insight, LocationMetric, LocationSummary, Report, ReportMetadata, ServiceArea};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", report.metadata.title));

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report, options));
    output.push_str(&generate_overview_section(&report.summary));
    output.push_str(&generate_locations_section(&report.metrics, options.max_rows));

    if options.include_insights {
        output.push_str(&generate_insights_section(&report.insights));
    }

    if options.include_service_areas && !report.service_areas.is_empty() {
        output.push_str(&generate_service_areas_section(&report.service_areas));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Jobs Analyzed:** {}\n", metadata.jobs_loaded));
    if metadata.jobs_skipped > 0 {
        section.push_str(&format!(
            "- **Jobs Without Revenue:** {}\n",
            metadata.jobs_skipped
        ));
    }
    section.push_str(&format!("- **Locations:** {}\n", metadata.locations));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report, options: &ReportConfig) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Overview](#overview)\n");
    toc.push_str("- [Top Performing Locations](#top-performing-locations)\n");

    if options.include_insights {
        toc.push_str("- [Insights](#insights)\n");
    }
    if options.include_service_areas && !report.service_areas.is_empty() {
        toc.push_str("- [Service Areas](#service-areas)\n");
    }

    toc.push('\n');

    toc
}

/// Generate the overview section.
fn generate_overview_section(summary: &LocationSummary) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str("| Metric | Value |\n");
    section.push_str("|:---|:---|\n");

    let areas = match summary.active_service_areas {
        Some(active) => format!(
            "{} ({} active) across {} cities",
            summary.service_areas, active, summary.cities
        ),
        None => format!("{} across {} cities", summary.service_areas, summary.cities),
    };
    section.push_str(&format!("| Total Service Areas | {} |\n", areas));

    match (&summary.top_zip_code, summary.top_revenue) {
        (Some(zip), Some(revenue)) => section.push_str(&format!(
            "| Top Performing ZIP | {} (${} revenue) |\n",
            zip,
            format_currency(revenue)
        )),
        _ => section.push_str("| Top Performing ZIP | N/A |\n"),
    }

    let average = summary
        .average_revenue_per_area
        .map(|avg| format!("${}", format_whole(avg)))
        .unwrap_or_else(|| "N/A".to_string());
    section.push_str(&format!("| Average Revenue per Area | {} |\n", average));

    section.push_str(&format!("| Total Jobs | {} |\n", summary.total_jobs));
    section.push_str(&format!(
        "| Total Revenue | ${} |\n\n",
        format_currency(summary.total_revenue)
    ));

    section
}

/// Generate the per-location table.
fn generate_locations_section(metrics: &[LocationMetric], max_rows: Option<usize>) -> String {
    let mut section = String::new();

    section.push_str("## Top Performing Locations\n\n");

    if metrics.is_empty() {
        section.push_str("No job data with revenue was found.\n\n");
        return section;
    }

    let rows = match max_rows {
        Some(n) if n < metrics.len() => {
            section.push_str(&format!(
                "*Showing top {} of {} locations by revenue.*\n\n",
                n,
                metrics.len()
            ));
            top_locations(metrics, n)
        }
        _ => metrics.to_vec(),
    };

    section.push_str("| Zip Code | Area | Jobs | Revenue | Avg. Ticket | Est. Customers |\n");
    section.push_str("|:---|:---|---:|---:|---:|---:|\n");

    for metric in &rows {
        section.push_str(&format!(
            "| {} | {} | {} | ${} | ${} | {} |\n",
            metric.zip_code,
            metric.display_name(),
            metric.job_count,
            format_currency(metric.total_revenue),
            format_whole(metric.avg_ticket),
            metric.customer_count
        ));
    }
    section.push('\n');

    section
}

/// Generate the insights section.
fn generate_insights_section(insights: &[Insight]) -> String {
    let mut section = String::new();

    section.push_str("## Insights\n\n");

    if insights.is_empty() {
        section.push_str("No insights available.\n\n");
        return section;
    }

    for insight in insights {
        section.push_str(&generate_insight_block(insight));
    }

    section
}

/// Generate a single insight block.
fn generate_insight_block(insight: &Insight) -> String {
    let mut block = String::new();

    block.push_str(&format!(
        "### {} {} **{}**\n\n",
        insight.priority.emoji(),
        insight.title,
        insight.priority.to_string().to_uppercase()
    ));
    block.push_str(&format!("> 💡 {}\n\n", insight.insight));

    block
}

/// Generate the service-area directory.
fn generate_service_areas_section(areas: &[ServiceArea]) -> String {
    let mut section = String::new();

    section.push_str("## Service Areas\n\n");
    section.push_str("| ZIP Code | Area | City | State | Status |\n");
    section.push_str("|:---|:---|:---|:---|:---|\n");

    for area in areas {
        let status = if area.is_active { "Active" } else { "Inactive" };
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            area.zip_code,
            area.display_name(),
            area.city,
            area.state,
            status
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by locmetrics v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
