//! Per-source summaries and the combined snapshot.

use crate::models::{Category, CollectionSummary, CombinedSnapshot, RunMetadata, Topic};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;

/// Count topics per category.
pub fn category_breakdown(topics: &[Topic]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for topic in topics {
        *counts.entry(topic.category).or_insert(0) += 1;
    }
    counts
}

/// Everything about a collection run that is not derived from its topics.
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub label: String,
    pub collection_time: DateTime<Local>,
    pub total_articles: usize,
    pub total_trending_topics: usize,
    pub metadata: RunMetadata,
}

/// Build a [`CollectionSummary`] from the already truncated top-N topics.
///
/// The breakdown therefore describes the returned trends, not the whole
/// article pool.
pub fn summarize(trends: Vec<Topic>, run: RunInfo) -> CollectionSummary {
    let category_breakdown = category_breakdown(&trends);
    CollectionSummary {
        source: run.label,
        collection_time: run.collection_time,
        total_articles: run.total_articles,
        total_trending_topics: run.total_trending_topics,
        trends,
        category_breakdown,
        metadata: run.metadata,
    }
}

/// Merge the outcome of every source into one snapshot.
///
/// `collections` holds `(key, outcome)` pairs in run order, where `key` is
/// the stable JSON key for that source and `None` marks a source that was
/// skipped or produced nothing. Returns `None` when no source succeeded.
pub fn combine(
    collections: Vec<(String, Option<CollectionSummary>)>,
    collection_timestamp: DateTime<Local>,
) -> Option<CombinedSnapshot> {
    let mut sources = Vec::new();
    let mut per_source = BTreeMap::new();

    for (key, outcome) in collections {
        if let Some(summary) = outcome {
            sources.push(summary.source.clone());
            per_source.insert(key, summary);
        }
    }

    if sources.is_empty() {
        return None;
    }

    Some(CombinedSnapshot {
        collection_timestamp,
        sources,
        per_source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(category: Category) -> Topic {
        Topic {
            rank: 1,
            title: "t".to_string(),
            description: String::new(),
            source: "s".to_string(),
            author: String::new(),
            published_at: String::new(),
            url: String::new(),
            category,
            score: 50,
        }
    }

    fn run(label: &str) -> RunInfo {
        RunInfo {
            label: label.to_string(),
            collection_time: Local::now(),
            total_articles: 10,
            total_trending_topics: 8,
            metadata: RunMetadata::Feeds {
                feeds_monitored: vec!["CNN".to_string()],
            },
        }
    }

    #[test]
    fn test_breakdown_sums_to_trend_count() {
        let trends = vec![
            topic(Category::Technology),
            topic(Category::Business),
            topic(Category::Technology),
            topic(Category::General),
        ];
        let summary = summarize(trends, run("RSS Feeds"));
        assert_eq!(summary.category_breakdown.values().sum::<usize>(), summary.trends.len());
        assert_eq!(summary.category_breakdown[&Category::Technology], 2);
        assert_eq!(summary.category_breakdown.get(&Category::Sports), None);
        assert_eq!(summary.total_articles, 10);
        assert_eq!(summary.total_trending_topics, 8);
    }

    #[test]
    fn test_empty_breakdown() {
        let summary = summarize(Vec::new(), run("RSS Feeds"));
        assert!(summary.category_breakdown.is_empty());
    }

    #[test]
    fn test_combine_lists_only_succeeded_sources() {
        let feeds = summarize(vec![topic(Category::Science)], run("RSS Feeds"));
        let snapshot = combine(
            vec![
                ("newsapi".to_string(), None),
                ("rss_feeds".to_string(), Some(feeds)),
            ],
            Local::now(),
        )
        .unwrap();

        assert_eq!(snapshot.sources, vec!["RSS Feeds"]);
        assert!(snapshot.per_source.contains_key("rss_feeds"));
        assert!(!snapshot.per_source.contains_key("newsapi"));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["sources"][0], "RSS Feeds");
        assert_eq!(json["rss_feeds"]["source"], "RSS Feeds");
        assert!(json.get("newsapi").is_none());
    }

    #[test]
    fn test_combine_keeps_run_order() {
        let api = summarize(vec![], run("NewsAPI"));
        let feeds = summarize(vec![], run("RSS Feeds"));
        let snapshot = combine(
            vec![
                ("newsapi".to_string(), Some(api)),
                ("rss_feeds".to_string(), Some(feeds)),
            ],
            Local::now(),
        )
        .unwrap();
        assert_eq!(snapshot.sources, vec!["NewsAPI", "RSS Feeds"]);
    }

    #[test]
    fn test_combine_nothing_succeeded() {
        let snapshot = combine(
            vec![("newsapi".to_string(), None), ("rss_feeds".to_string(), None)],
            Local::now(),
        );
        assert!(snapshot.is_none());
        assert!(combine(Vec::new(), Local::now()).is_none());
    }
}
