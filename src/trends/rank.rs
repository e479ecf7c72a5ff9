//! Ranking of scored items into [`Topic`]s.

use crate::models::{Category, RawItem, Topic};
use crate::utils::truncate_chars;

/// Longest description kept on a [`Topic`], in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// A titled item together with its category and score, not yet ranked.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    pub item: RawItem,
    pub category: Category,
    pub score: u32,
}

impl ScoredItem {
    fn into_topic(self, rank: usize) -> Topic {
        let ScoredItem { item, category, score } = self;
        Topic {
            rank,
            title: item.title,
            description: truncate_chars(&item.description, MAX_DESCRIPTION_CHARS),
            source: item.source,
            author: item.author,
            published_at: item.published_at,
            url: item.url,
            category,
            score,
        }
    }
}

/// Sort by score (highest first), number the result from 1 and keep the
/// first `top_n`.
///
/// The sort is stable, so equal scores keep their encounter order. The whole
/// set is ranked before truncation.
pub fn rank(mut items: Vec<ScoredItem>, top_n: usize) -> Vec<Topic> {
    items.sort_by(|a, b| b.score.cmp(&a.score));
    items
        .into_iter()
        .enumerate()
        .map(|(i, scored)| scored.into_topic(i + 1))
        .take(top_n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(title: &str, score: u32) -> ScoredItem {
        ScoredItem {
            item: RawItem {
                title: title.to_string(),
                ..RawItem::default()
            },
            category: Category::General,
            score,
        }
    }

    #[test]
    fn test_sorted_descending_with_contiguous_ranks() {
        let topics = rank(
            vec![scored("a", 30), scored("b", 100), scored("c", 70)],
            10,
        );
        let titles: Vec<&str> = topics.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c", "a"]);
        let ranks: Vec<usize> = topics.iter().map(|t| t.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let topics = rank(
            vec![scored("first", 50), scored("top", 90), scored("second", 50), scored("third", 50)],
            10,
        );
        let titles: Vec<&str> = topics.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_truncates_after_sorting() {
        let topics = rank(
            vec![scored("low", 25), scored("mid", 50), scored("high", 100)],
            2,
        );
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].title, "high");
        assert_eq!(topics[1].title, "mid");
        assert_eq!(topics[1].rank, 2);
    }

    #[test]
    fn test_ranks_contiguous_for_any_size() {
        for n in 0..15 {
            let items: Vec<ScoredItem> = (0..n).map(|i| scored("x", (i * 7 % 5) as u32)).collect();
            let topics = rank(items, 8);
            assert!(topics.len() <= 8);
            for (i, topic) in topics.iter().enumerate() {
                assert_eq!(topic.rank, i + 1);
            }
            assert!(topics.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn test_description_is_capped() {
        let mut item = scored("long", 10);
        item.item.description = "d".repeat(500);
        let topics = rank(vec![item], 1);
        assert_eq!(topics[0].description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(Vec::new(), 5).is_empty());
    }
}
