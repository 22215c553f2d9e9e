//! Textual insights over ranked location metrics.

use super::aggregator::round_half_up;
use crate::format::{format_currency, format_whole};
use crate::models::{Insight, LocationMetric, Priority};
use tracing::debug;

/// Generate the fixed set of location insights.
///
/// `metrics` must be ordered by total revenue, highest first, as returned
/// by `aggregate_locations`. The revenue-lead insight needs a runner-up
/// and is left out when only one location exists.
pub fn generate_insights(metrics: &[LocationMetric]) -> Vec<Insight> {
    let Some(top) = metrics.first() else {
        return Vec::new();
    };

    let mut insights = Vec::with_capacity(3);

    match metrics.get(1) {
        Some(second) => insights.push(highest_revenue_insight(top, second)),
        None => debug!("Single location, skipping revenue comparison"),
    }

    if let Some(best_ticket) = highest_avg_ticket(metrics) {
        insights.push(Insight {
            title: "Highest Average Ticket".to_string(),
            insight: format!(
                "Jobs in {} have the highest average ticket at ${}, suggesting premium services or affluent customers in this area.",
                best_ticket.display_name(),
                format_whole(best_ticket.avg_ticket)
            ),
            priority: Priority::Medium,
        });
    }

    if let Some(quietest) = fewest_jobs(metrics) {
        insights.push(Insight {
            title: "Market Expansion Opportunity".to_string(),
            insight: format!(
                "{} has the lowest job count but decent average ticket. Consider targeted marketing to increase presence in this area.",
                quietest.display_name()
            ),
            priority: Priority::Medium,
        });
    }

    insights
}

/// Percentage by which `top` out-earns `second`, or `None` when `second` earned nothing.
pub fn revenue_lead_percent(top: &LocationMetric, second: &LocationMetric) -> Option<i64> {
    if second.total_revenue <= 0.0 {
        return None;
    }
    let lead = (top.total_revenue / second.total_revenue - 1.0) * 100.0;
    Some(round_half_up(lead) as i64)
}

fn highest_revenue_insight(top: &LocationMetric, second: &LocationMetric) -> Insight {
    let mut text = format!(
        "{} ({}) generates the most revenue at ${}",
        top.display_name(),
        top.zip_code,
        format_currency(top.total_revenue)
    );

    match revenue_lead_percent(top, second) {
        Some(lead) => text.push_str(&format!(
            ", which is {}% higher than the second highest area.",
            lead
        )),
        None => text.push('.'),
    }

    Insight {
        title: "Highest Revenue Area".to_string(),
        insight: text,
        priority: Priority::High,
    }
}

/// First location (in the given order) with the greatest average ticket.
fn highest_avg_ticket(metrics: &[LocationMetric]) -> Option<&LocationMetric> {
    metrics
        .iter()
        .reduce(|best, m| if m.avg_ticket > best.avg_ticket { m } else { best })
}

/// Location with the fewest jobs; on ties, the last one in the given order.
fn fewest_jobs(metrics: &[LocationMetric]) -> Option<&LocationMetric> {
    metrics.iter().rev().min_by_key(|m| m.job_count)
}
