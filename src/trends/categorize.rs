//! Keyword-based topic categorization.
//!
//! A [`KeywordRules`] table is evaluated top to bottom against the
//! lower-cased `title + " " + description`; the first category with any
//! matching keyword wins. Matching is plain substring search, so `"ai"`
//! also fires inside `"campaign"`.

use crate::models::{Category, RawItem};

/// Ordered categorization rules for one kind of source.
#[derive(Debug)]
pub struct KeywordRules {
    /// Source-name fragments that pin an item to a category before any
    /// keyword rule is considered.
    pub source_hints: &'static [(&'static str, Category)],
    pub rules: &'static [(Category, &'static [&'static str])],
}

impl KeywordRules {
    /// Assign a category to `item`, falling back to [`Category::General`].
    pub fn categorize(&self, item: &RawItem) -> Category {
        let source = item.source.to_lowercase();
        if let Some((_, category)) = self
            .source_hints
            .iter()
            .find(|(hint, _)| source.contains(hint))
        {
            return *category;
        }

        let text = format!("{} {}", item.title, item.description).to_lowercase();
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::General)
    }
}

/// Rules applied to headline API articles.
pub static HEADLINE_RULES: KeywordRules = KeywordRules {
    source_hints: &[],
    rules: &[
        (
            Category::Technology,
            &["tech", "ai", "software", "computer", "digital", "internet", "app", "cyber"],
        ),
        (
            Category::Business,
            &["business", "market", "stock", "economy", "trade", "finance", "company"],
        ),
        (
            Category::Politics,
            &["politics", "government", "election", "congress", "senate", "president", "policy"],
        ),
        (
            Category::Sports,
            &["sports", "game", "player", "team", "championship", "nfl", "nba", "soccer"],
        ),
        (
            Category::Entertainment,
            &["movie", "music", "celebrity", "actor", "film", "tv", "show", "entertainment"],
        ),
        (
            Category::Health,
            &["health", "medical", "doctor", "disease", "hospital", "treatment", "vaccine"],
        ),
        (
            Category::Science,
            &["science", "research", "study", "scientist", "discovery", "space", "nasa"],
        ),
    ],
};

/// Rules applied to RSS/Atom feed items. No `Entertainment` rule.
pub static FEED_RULES: KeywordRules = KeywordRules {
    source_hints: &[
        ("techcrunch", Category::Technology),
        ("verge", Category::Technology),
        ("hacker", Category::Technology),
    ],
    rules: &[
        (
            Category::Technology,
            &["tech", "ai", "software", "app", "cyber", "digital"],
        ),
        (
            Category::Business,
            &["business", "market", "stock", "economy", "finance"],
        ),
        (
            Category::Politics,
            &["politics", "government", "election", "president"],
        ),
        (Category::Sports, &["sports", "game", "player", "team"]),
        (Category::Health, &["health", "medical", "vaccine", "disease"]),
        (Category::Science, &["science", "research", "study", "space"]),
    ],
};
