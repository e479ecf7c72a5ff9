//! Source adapters that fetch news and normalize it into [`RawItem`]s.
//!
//! | Source | Module | Method | Strategy |
//! |--------|--------|--------|----------|
//! | Headline API | [`newsapi`] | JSON over HTTP, one call per category | [`EngagementStrategy`] |
//! | RSS/Atom feeds | [`feeds`] | XML over HTTP, one feed at a time | [`RecencyStrategy`] |
//!
//! Adapters never fail a run: transport and parse errors are logged and the
//! affected call or feed contributes no items.
//!
//! [`EngagementStrategy`]: crate::trends::EngagementStrategy
//! [`RecencyStrategy`]: crate::trends::RecencyStrategy

pub mod feeds;
pub mod newsapi;

use crate::config::Config;
use crate::models::{RawItem, RunMetadata};
use crate::trends::TrendStrategy;
use std::time::Duration;

pub use feeds::FeedSource;
pub use newsapi::NewsApiSource;

/// A source of news items that feeds the trend pipeline.
pub trait TrendSource {
    type Strategy: TrendStrategy;

    /// Stable key used for this source in the combined snapshot and in
    /// output filenames, e.g. `"rss_feeds"`.
    fn key(&self) -> &'static str;

    /// Human-readable label, e.g. `"RSS Feeds"`.
    fn label(&self) -> &'static str;

    fn strategy(&self) -> Self::Strategy;

    fn top_n(&self) -> usize;

    /// Source-specific facts recorded in the summary.
    fn metadata(&self) -> RunMetadata;

    /// Fetch every item this source offers. Errors are logged, not returned.
    async fn fetch(&self) -> Vec<RawItem>;
}

/// Build the HTTP client shared by all adapters.
///
/// The timeout applies per request and aborts only that fetch.
pub fn http_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(config.request_timeout_secs.min(10)))
        .user_agent(config.user_agent.clone())
        .build()
}
