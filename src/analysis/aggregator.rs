//! Location aggregation and statistics.
//!
//! This module groups job records by location and computes the
//! per-location metrics and overview figures shown in reports.

use crate::models::{JobRecord, LocationMetric, LocationSummary, ServiceArea};
use std::collections::{HashMap, HashSet};

/// Average number of jobs a single customer books.
pub const JOBS_PER_CUSTOMER: f64 = 1.5;

/// Estimate the number of customers behind a job count.
///
/// Job exports carry no customer identity, so this is a placeholder
/// heuristic; swap it for a distinct-customer count once that data exists.
pub fn approximate_customer_count(job_count: u64) -> u64 {
    round_half_up(job_count as f64 / JOBS_PER_CUSTOMER) as u64
}

/// Round to the nearest integer, with halves going toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Group jobs by zip code into metrics, highest total revenue first.
///
/// Locations with equal revenue keep the order in which their zip code
/// first appeared in `jobs`.
pub fn aggregate_locations(jobs: &[JobRecord]) -> Vec<LocationMetric> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut metrics: Vec<LocationMetric> = Vec::new();

    for job in jobs {
        let slot = *index.entry(job.zip_code.as_str()).or_insert_with(|| {
            metrics.push(LocationMetric::seed(job));
            metrics.len() - 1
        });

        let metric = &mut metrics[slot];
        metric.job_count += 1;
        metric.total_revenue += job.revenue;
    }

    for metric in &mut metrics {
        // Every accumulator was created by a job, so job_count >= 1.
        metric.avg_ticket = metric.total_revenue / metric.job_count as f64;
        metric.customer_count = approximate_customer_count(metric.job_count);
    }

    sort_by_revenue(&mut metrics);
    metrics
}

/// Sort metrics by total revenue (highest first), preserving the order of ties.
pub fn sort_by_revenue(metrics: &mut [LocationMetric]) {
    metrics.sort_by(|a, b| {
        b.total_revenue
            .partial_cmp(&a.total_revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Get the top N locations by revenue.
pub fn top_locations(metrics: &[LocationMetric], n: usize) -> Vec<LocationMetric> {
    let mut sorted = metrics.to_vec();
    sort_by_revenue(&mut sorted);
    sorted.truncate(n);
    sorted
}

/// Compute the overview figures for a set of metrics.
///
/// When a service-area directory is supplied, area and city counts come
/// from it; otherwise they are derived from the locations that had jobs.
pub fn summarize_locations(
    metrics: &[LocationMetric],
    service_areas: &[ServiceArea],
) -> LocationSummary {
    let total_revenue: f64 = metrics.iter().map(|m| m.total_revenue).sum();
    let total_jobs: u64 = metrics.iter().map(|m| m.job_count).sum();

    let (area_count, active, cities) = if service_areas.is_empty() {
        let cities: HashSet<&str> = metrics.iter().map(|m| m.city.as_str()).collect();
        (metrics.len(), None, cities.len())
    } else {
        let cities: HashSet<&str> = service_areas.iter().map(|a| a.city.as_str()).collect();
        let active = service_areas.iter().filter(|a| a.is_active).count();
        (service_areas.len(), Some(active), cities.len())
    };

    let top = metrics.first();
    let average_revenue_per_area = if metrics.is_empty() {
        None
    } else {
        Some(total_revenue / metrics.len() as f64)
    };

    LocationSummary {
        service_areas: area_count,
        active_service_areas: active,
        cities,
        top_zip_code: top.map(|m| m.zip_code.clone()),
        top_revenue: top.map(|m| m.total_revenue),
        average_revenue_per_area,
        total_jobs,
        total_revenue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(zip: &str, revenue: f64) -> JobRecord {
        JobRecord {
            zip_code: zip.to_string(),
            area_name: None,
            city: "Los Angeles".to_string(),
            revenue,
        }
    }

    fn named_job(zip: &str, area: &str, city: &str, revenue: f64) -> JobRecord {
        JobRecord {
            zip_code: zip.to_string(),
            area_name: Some(area.to_string()),
            city: city.to_string(),
            revenue,
        }
    }

    fn area(zip: &str, city: &str, is_active: bool) -> ServiceArea {
        ServiceArea {
            zip_code: zip.to_string(),
            city: city.to_string(),
            state: "CA".to_string(),
            area_name: None,
            is_active,
        }
    }

    #[test]
    fn test_aggregate_scenario() {
        let jobs = vec![job("90210", 100.0), job("90210", 200.0), job("90402", 50.0)];

        let metrics = aggregate_locations(&jobs);

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].zip_code, "90210");
        assert_eq!(metrics[0].job_count, 2);
        assert_eq!(metrics[0].total_revenue, 300.0);
        assert_eq!(metrics[0].avg_ticket, 150.0);
        assert_eq!(metrics[1].zip_code, "90402");
        assert_eq!(metrics[1].job_count, 1);
        assert_eq!(metrics[1].total_revenue, 50.0);
        assert_eq!(metrics[1].avg_ticket, 50.0);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate_locations(&[]).is_empty());
    }

    #[test]
    fn test_aggregate_keeps_first_seen_labels() {
        let jobs = vec![
            named_job("90077", "Bel Air", "Los Angeles", 400.0),
            named_job("90077", "Upper Bel Air", "LA", 100.0),
        ];

        let metrics = aggregate_locations(&jobs);

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].area_name.as_deref(), Some("Bel Air"));
        assert_eq!(metrics[0].city, "Los Angeles");
    }

    #[test]
    fn test_aggregate_preserves_totals_and_zip_set() {
        let jobs = vec![
            job("91604", 125.5),
            job("90210", 980.0),
            job("91436", 310.25),
            job("91604", 74.5),
            job("90402", 0.0),
            job("90210", 20.0),
        ];

        let metrics = aggregate_locations(&jobs);

        let input_total: f64 = jobs.iter().map(|j| j.revenue).sum();
        let output_total: f64 = metrics.iter().map(|m| m.total_revenue).sum();
        assert!((input_total - output_total).abs() < 1e-9);

        let input_zips: HashSet<&str> = jobs.iter().map(|j| j.zip_code.as_str()).collect();
        let output_zips: HashSet<&str> = metrics.iter().map(|m| m.zip_code.as_str()).collect();
        assert_eq!(input_zips, output_zips);
        assert_eq!(metrics.len(), output_zips.len());

        for metric in &metrics {
            let expected = metric.total_revenue / metric.job_count as f64;
            assert!((metric.avg_ticket - expected).abs() < 1e-9);
        }

        assert!(metrics
            .windows(2)
            .all(|pair| pair[0].total_revenue >= pair[1].total_revenue));
    }

    #[test]
    fn test_aggregate_ties_follow_first_appearance() {
        let jobs = vec![
            job("91436", 100.0),
            job("90210", 300.0),
            job("90402", 100.0),
            job("91604", 100.0),
        ];

        let metrics = aggregate_locations(&jobs);
        let order: Vec<&str> = metrics.iter().map(|m| m.zip_code.as_str()).collect();

        assert_eq!(order, vec!["90210", "91436", "90402", "91604"]);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let jobs = vec![job("90402", 75.0), job("90210", 75.0), job("90402", 10.0)];

        assert_eq!(aggregate_locations(&jobs), aggregate_locations(&jobs));
    }

    #[test]
    fn test_approximate_customer_count() {
        assert_eq!(approximate_customer_count(1), 1);
        assert_eq!(approximate_customer_count(2), 1);
        assert_eq!(approximate_customer_count(3), 2);
        assert_eq!(approximate_customer_count(4), 3);
        assert_eq!(approximate_customer_count(48), 32);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
    }

    #[test]
    fn test_top_locations() {
        let jobs = vec![job("a", 10.0), job("b", 30.0), job("c", 20.0)];
        let metrics = aggregate_locations(&jobs);

        let top = top_locations(&metrics, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].zip_code, "b");
        assert_eq!(top[1].zip_code, "c");
    }

    #[test]
    fn test_summarize_without_directory() {
        let jobs = vec![
            named_job("90210", "Beverly Hills", "Beverly Hills", 600.0),
            named_job("90402", "Santa Monica", "Santa Monica", 300.0),
            named_job("91604", "Studio City", "Los Angeles", 100.0),
            named_job("91436", "Encino", "Los Angeles", 200.0),
        ];
        let metrics = aggregate_locations(&jobs);

        let summary = summarize_locations(&metrics, &[]);

        assert_eq!(summary.service_areas, 4);
        assert_eq!(summary.active_service_areas, None);
        assert_eq!(summary.cities, 3);
        assert_eq!(summary.top_zip_code.as_deref(), Some("90210"));
        assert_eq!(summary.top_revenue, Some(600.0));
        assert_eq!(summary.average_revenue_per_area, Some(300.0));
        assert_eq!(summary.total_jobs, 4);
        assert_eq!(summary.total_revenue, 1200.0);
    }

    #[test]
    fn test_summarize_with_directory() {
        let metrics = aggregate_locations(&[job("90210", 50.0)]);
        let areas = vec![
            area("90210", "Beverly Hills", true),
            area("91604", "Los Angeles", true),
            area("91436", "Los Angeles", false),
        ];

        let summary = summarize_locations(&metrics, &areas);

        assert_eq!(summary.service_areas, 3);
        assert_eq!(summary.active_service_areas, Some(2));
        assert_eq!(summary.cities, 2);
        assert_eq!(summary.top_zip_code.as_deref(), Some("90210"));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize_locations(&[], &[]);

        assert_eq!(summary.service_areas, 0);
        assert_eq!(summary.top_zip_code, None);
        assert_eq!(summary.average_revenue_per_area, None);
        assert_eq!(summary.total_revenue, 0.0);
    }
}
