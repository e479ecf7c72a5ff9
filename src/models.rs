//! Data models shared by the source adapters, the trend pipeline and the
//! JSON outputs.
//!
//! - [`RawItem`]: a news record as normalized by a source adapter
//! - [`Topic`]: a categorized, scored and ranked trend
//! - [`CollectionSummary`]: the result of one source's collection run
//! - [`CombinedSnapshot`]: all successful collections of a full run

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single news record as fetched from a source, before categorization.
///
/// `published_at` is kept in whatever format the source used; the scorers
/// are responsible for making sense of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: String,
    /// Outlet or feed name.
    pub source: String,
    /// Byline, empty when the source does not provide one.
    pub author: String,
}

/// Topic category assigned by keyword rules.
///
/// Variant order is the order used for `category_breakdown` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Business,
    Politics,
    Sports,
    Entertainment,
    Health,
    Science,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Business => "Business",
            Category::Politics => "Politics",
            Category::Sports => "Sports",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Science => "Science",
            Category::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trending topic: one titled [`RawItem`] plus its category, score and rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// 1-based position after sorting by score.
    pub rank: usize,
    pub title: String,
    /// At most 200 characters.
    pub description: String,
    pub source: String,
    pub author: String,
    pub published_at: String,
    pub url: String,
    pub category: Category,
    pub score: u32,
}

/// Source-specific facts about a collection run, flattened into the summary
/// JSON next to the common fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunMetadata {
    Headlines {
        country: String,
        categories_fetched: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        search_keywords: Vec<String>,
    },
    Feeds {
        feeds_monitored: Vec<String>,
    },
}

/// Result of one source's collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// Human-readable source label, e.g. `"NewsAPI"` or `"RSS Feeds"`.
    pub source: String,
    pub collection_time: DateTime<Local>,
    /// Every item the adapter returned, titled or not.
    pub total_articles: usize,
    /// Titled items that were categorized and scored, before truncation.
    pub total_trending_topics: usize,
    /// Ranked topics, truncated to the configured top-N.
    pub trends: Vec<Topic>,
    /// Per-category counts over `trends` only.
    pub category_breakdown: BTreeMap<Category, usize>,
    #[serde(flatten)]
    pub metadata: RunMetadata,
}

/// All successful collections of a run, keyed by a stable per-source key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSnapshot {
    pub collection_timestamp: DateTime<Local>,
    /// Labels of the sources that produced data, in run order.
    pub sources: Vec<String>,
    #[serde(flatten)]
    pub per_source: BTreeMap<String, CollectionSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_topic() -> Topic {
        Topic {
            rank: 1,
            title: "Rust 2.0 announced".to_string(),
            description: "A new edition".to_string(),
            source: "Hacker News".to_string(),
            author: String::new(),
            published_at: "Mon, 06 May 2025 10:00:00 +0000".to_string(),
            url: "https://example.com/rust".to_string(),
            category: Category::Technology,
            score: 90,
        }
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::Entertainment).unwrap();
        assert_eq!(json, "\"Entertainment\"");
        assert_eq!(Category::Health.to_string(), "Health");
    }

    #[test]
    fn test_topic_serialization_fields() {
        let json = serde_json::to_value(sample_topic()).unwrap();
        assert_eq!(json["rank"], 1);
        assert_eq!(json["category"], "Technology");
        assert_eq!(json["score"], 90);
        assert_eq!(json["author"], "");
    }

    #[test]
    fn test_summary_flattens_feed_metadata() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(Category::Technology, 1);
        let summary = CollectionSummary {
            source: "RSS Feeds".to_string(),
            collection_time: Local::now(),
            total_articles: 3,
            total_trending_topics: 1,
            trends: vec![sample_topic()],
            category_breakdown: breakdown,
            metadata: RunMetadata::Feeds {
                feeds_monitored: vec!["Hacker News".to_string()],
            },
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["source"], "RSS Feeds");
        assert_eq!(json["feeds_monitored"][0], "Hacker News");
        assert_eq!(json["category_breakdown"]["Technology"], 1);
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_headline_metadata_omits_empty_keywords() {
        let meta = RunMetadata::Headlines {
            country: "us".to_string(),
            categories_fetched: vec!["technology".to_string()],
            search_keywords: vec![],
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["country"], "us");
        assert!(json.get("search_keywords").is_none());
    }
}
