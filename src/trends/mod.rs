//! The trend pipeline: categorize and score every fetched item, rank, and
//! summarize.
//!
//! Each source picks one [`TrendStrategy`]; everything after that is shared.
//!
//! ```text
//! Vec<RawItem> ── strategy.categorize / strategy.score ──▶ Vec<ScoredItem>
//!              ── rank(top_n) ──▶ Vec<Topic> ── summarize ──▶ CollectionSummary
//! ```
//!
//! # Submodules
//!
//! - [`categorize`]: ordered keyword rule tables
//! - [`score`]: recency and engagement heuristics
//! - [`rank`]: stable sort, dense ranks, truncation
//! - [`summary`]: per-source summaries and the combined snapshot

pub mod categorize;
pub mod rank;
pub mod score;
pub mod summary;

use crate::models::{Category, CollectionSummary, RawItem, RunMetadata};
use categorize::{FEED_RULES, HEADLINE_RULES};
use chrono::{DateTime, Local, Utc};
use rank::ScoredItem;
use summary::RunInfo;

/// How a source's items are categorized and scored.
pub trait TrendStrategy {
    fn categorize(&self, item: &RawItem) -> Category;

    /// Relevance score; higher ranks first.
    fn score(&self, item: &RawItem, now: DateTime<Utc>) -> u32;
}

/// Headline API articles: headline keyword table plus engagement score.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngagementStrategy;

impl TrendStrategy for EngagementStrategy {
    fn categorize(&self, item: &RawItem) -> Category {
        HEADLINE_RULES.categorize(item)
    }

    fn score(&self, item: &RawItem, now: DateTime<Utc>) -> u32 {
        score::engagement_score(item, now)
    }
}

/// Feed items: feed keyword table plus recency score.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecencyStrategy;

impl TrendStrategy for RecencyStrategy {
    fn categorize(&self, item: &RawItem) -> Category {
        FEED_RULES.categorize(item)
    }

    fn score(&self, item: &RawItem, now: DateTime<Utc>) -> u32 {
        score::recency_score(item, now)
    }
}

/// Categorize and score every item that has a usable title.
///
/// Untitled items are dropped here rather than at fetch time.
pub fn score_items<S: TrendStrategy + ?Sized>(
    strategy: &S,
    items: &[RawItem],
    now: DateTime<Utc>,
) -> Vec<ScoredItem> {
    items
        .iter()
        .filter(|item| !item.title.trim().is_empty())
        .map(|item| ScoredItem {
            category: strategy.categorize(item),
            score: strategy.score(item, now),
            item: item.clone(),
        })
        .collect()
}

/// Run the whole pipeline for one source's fetched items.
pub fn collect_trends<S: TrendStrategy + ?Sized>(
    strategy: &S,
    label: &str,
    items: &[RawItem],
    top_n: usize,
    metadata: RunMetadata,
    collection_time: DateTime<Local>,
) -> CollectionSummary {
    let scored = score_items(strategy, items, collection_time.with_timezone(&Utc));
    let total_trending_topics = scored.len();
    let trends = rank::rank(scored, top_n);

    summary::summarize(
        trends,
        RunInfo {
            label: label.to_string(),
            collection_time,
            total_articles: items.len(),
            total_trending_topics,
            metadata,
        },
    )
}
