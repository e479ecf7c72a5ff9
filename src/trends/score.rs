//! Relevance scoring heuristics.
//!
//! Both scorers are total: a missing or unparseable timestamp only changes
//! the score, it never produces an error.

use crate::models::RawItem;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// Score given to feed items whose timestamp cannot be read.
pub const DEFAULT_RECENCY_SCORE: u32 = 25;

const ENGAGEMENT_BASE: u32 = 50;
const ENGAGEMENT_MAX: u32 = 100;

/// Outlet name fragments that earn the reputation bonus.
pub const REPUTABLE_OUTLETS: &[&str] = &[
    "bbc",
    "cnn",
    "reuters",
    "ap",
    "nyt",
    "washington post",
    "guardian",
];

type TimestampParser = fn(&str) -> Option<DateTime<FixedOffset>>;

fn rss_pub_date(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(s, "%a, %d %b %Y %H:%M:%S %z").ok()
}

// Named zones such as "GMT" or "EST".
fn rfc2822(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(s).ok()
}

// Some feeds carry a weekday name that does not match the date.
fn any_weekday(s: &str) -> Option<DateTime<FixedOffset>> {
    let (weekday, rest) = s.split_once(',')?;
    if !weekday.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let rest = rest.trim_start();
    DateTime::parse_from_str(rest, "%d %b %Y %H:%M:%S %z")
        .or_else(|_| DateTime::parse_from_rfc2822(rest))
        .ok()
}

fn iso_with_offset(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
}

fn iso_utc(s: &str) -> Option<DateTime<FixedOffset>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Feed timestamp formats, tried in order.
const FEED_TIMESTAMP_PARSERS: &[TimestampParser] = &[
    rss_pub_date,
    rfc2822,
    any_weekday,
    iso_with_offset,
    iso_utc,
];

/// Parse a feed timestamp (RSS `pubDate` or Atom `published`).
pub fn parse_feed_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    FEED_TIMESTAMP_PARSERS.iter().find_map(|parse| parse(raw))
}

/// Parse an ISO-8601 timestamp as returned by the headline API.
///
/// A trailing `Z` means UTC. Timestamps without an offset are read as UTC.
pub fn parse_iso_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

fn hours_since(published: DateTime<FixedOffset>, now: DateTime<Utc>) -> f64 {
    (now - published.with_timezone(&Utc)).num_seconds() as f64 / 3600.0
}

/// Map an article age in hours to a recency score.
pub fn recency_for_age(hours_old: f64) -> u32 {
    if hours_old < 1.0 {
        100
    } else if hours_old < 6.0 {
        90
    } else if hours_old < 24.0 {
        70
    } else if hours_old < 48.0 {
        50
    } else {
        30
    }
}

/// Recency score for feed items: newer is better.
pub fn recency_score(item: &RawItem, now: DateTime<Utc>) -> u32 {
    match parse_feed_timestamp(&item.published_at) {
        Some(published) => recency_for_age(hours_since(published, now)),
        None => DEFAULT_RECENCY_SCORE,
    }
}

/// Engagement score for headline API articles, in `50..=100`.
///
/// Base 50, +20 for a reputable outlet, +20 when under a day old (+10 when
/// under two days), +10 when a description is present.
pub fn engagement_score(item: &RawItem, now: DateTime<Utc>) -> u32 {
    let mut score = ENGAGEMENT_BASE;

    let source = item.source.to_lowercase();
    if REPUTABLE_OUTLETS.iter().any(|outlet| source.contains(outlet)) {
        score += 20;
    }

    if let Some(published) = parse_iso_timestamp(&item.published_at) {
        let hours_old = hours_since(published, now);
        if hours_old < 24.0 {
            score += 20;
        } else if hours_old < 48.0 {
            score += 10;
        }
    }

    if !item.description.is_empty() {
        score += 10;
    }

    score.min(ENGAGEMENT_MAX)
}
