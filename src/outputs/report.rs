//! End-of-run report written to the log.

use crate::models::CollectionSummary;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use tracing::{info, warn};

/// How many trends per source the report shows.
pub const REPORT_TOP: usize = 3;

/// One line per shown trend, e.g. `1. Markets rally [Business | BBC News]`.
pub fn headline_lines(summary: &CollectionSummary) -> Vec<String> {
    summary
        .trends
        .iter()
        .take(REPORT_TOP)
        .map(|t| {
            format!(
                "{}. {} [{} | {}]",
                t.rank,
                truncate_for_log(&t.title, 60),
                t.category,
                t.source
            )
        })
        .collect()
}

/// Log the outcome of one source: its top trends, or that it produced
/// nothing.
pub fn log_source(label: &str, outcome: Option<&CollectionSummary>) {
    match outcome {
        Some(summary) => {
            let breakdown = summary
                .category_breakdown
                .iter()
                .map(|(category, count)| format!("{category}={count}"))
                .join(", ");
            info!(
                source = %label,
                trends = summary.trends.len(),
                articles = summary.total_articles,
                %breakdown,
                "Source collected"
            );
            for line in headline_lines(summary) {
                info!(source = %label, "  {}", line);
            }
        }
        None => warn!(source = %label, "Source not configured or produced no data"),
    }
}
