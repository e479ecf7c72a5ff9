//! Full collection run: every configured source in turn, then the combined
//! snapshot.

use crate::config::Config;
use crate::models::{CollectionSummary, CombinedSnapshot};
use crate::outputs::{json, report};
use crate::sources::{self, FeedSource, NewsApiSource, TrendSource};
use crate::trends::{self, summary};
use chrono::Local;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

/// Fetch one source and run its items through the trend pipeline.
///
/// Returns `None` when the source produced no items at all.
#[instrument(level = "info", skip_all, fields(source = source.label()))]
pub async fn collect_source<S: TrendSource>(source: &S) -> Option<CollectionSummary> {
    let items = source.fetch().await;
    if items.is_empty() {
        warn!("No items collected");
        return None;
    }

    let summary = trends::collect_trends(
        &source.strategy(),
        source.label(),
        &items,
        source.top_n(),
        source.metadata(),
        Local::now(),
    );
    info!(
        total_articles = summary.total_articles,
        trending = summary.total_trending_topics,
        kept = summary.trends.len(),
        "Collected trending topics"
    );
    Some(summary)
}

/// Collect one source, write its summary file, and log the outcome.
///
/// A failed write is logged; the summary is still returned for the
/// combined snapshot.
pub async fn run_source<S: TrendSource>(source: &S, data_dir: &Path) -> Option<CollectionSummary> {
    let outcome = collect_source(source).await;
    if let Some(summary) = &outcome {
        if let Err(e) = json::write_summary(summary, source.key(), data_dir, None).await {
            error!(source = source.label(), error = %e, "Failed to write source summary");
        }
    }
    report::log_source(source.label(), outcome.as_ref());
    outcome
}

/// Combine and persist the outcomes of a run.
///
/// Returns the snapshot and its path, or `None` when no source succeeded.
pub async fn finish_run(
    collections: Vec<(String, Option<CollectionSummary>)>,
    data_dir: &Path,
) -> Result<Option<(CombinedSnapshot, PathBuf)>, Box<dyn Error>> {
    let Some(snapshot) = summary::combine(collections, Local::now()) else {
        error!("No data collected from any source");
        return Ok(None);
    };
    let path = json::write_snapshot(&snapshot, data_dir, None).await?;
    info!(path = %path.display(), sources = %snapshot.sources.join(", "), "Combined data saved");
    Ok(Some((snapshot, path)))
}

/// Run every configured source, in order, and write the combined snapshot.
///
/// The headline API source is skipped when no API key is configured.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built or the combined
/// snapshot cannot be written.
#[instrument(level = "info", skip_all, fields(data_dir = %config.data_dir))]
pub async fn run(config: &Config) -> Result<Option<(CombinedSnapshot, PathBuf)>, Box<dyn Error>> {
    let client = sources::http_client(config)?;
    let data_dir = Path::new(&config.data_dir);
    let mut collections = Vec::new();

    match &config.news_api_key {
        Some(key) => {
            let api = NewsApiSource::new(client.clone(), key.clone(), config.news.clone());
            let outcome = run_source(&api, data_dir).await;
            collections.push((api.key().to_string(), outcome));
        }
        None => {
            warn!("NEWS_API_KEY not configured; skipping the headline API source");
            report::log_source("NewsAPI", None);
        }
    }

    let feeds = FeedSource::new(client, config.feeds.clone());
    let outcome = run_source(&feeds, data_dir).await;
    collections.push((feeds.key().to_string(), outcome));

    finish_run(collections, data_dir).await
}
