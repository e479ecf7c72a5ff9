//! Run configuration.
//!
//! Values come from three layers, later ones winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. An optional YAML file passed with `--config`
//! 3. Command-line flags and environment variables (see [`crate::cli::Cli`])
//!
//! Every YAML field is optional, so a file only needs the keys it overrides:
//!
//! ```yaml
//! data_dir: ./out
//! news:
//!   country: gb
//!   categories: [technology, science]
//! feeds:
//!   max_items_per_feed: 10
//!   sources:
//!     - name: Hacker News
//!       url: https://news.ycombinator.com/rss
//! ```

use crate::cli::Cli;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;

/// Headline API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsApiConfig {
    pub base_url: String,
    /// Two-letter country code for the top-headlines endpoint.
    pub country: String,
    /// One top-headlines call is made per category, in this order.
    pub categories: Vec<String>,
    /// Page size per headline call (the API caps it at 100).
    pub page_size: u32,
    pub top_n: usize,
    /// Keywords searched on the `everything` endpoint after the headline calls.
    pub search_keywords: Vec<String>,
    /// How many days back keyword searches reach.
    pub search_days: i64,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2".to_string(),
            country: "us".to_string(),
            categories: ["general", "technology", "business", "science"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            page_size: 20,
            top_n: 20,
            search_keywords: Vec::new(),
            search_days: 7,
        }
    }
}

/// One RSS or Atom feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSpec {
    pub name: String,
    pub url: String,
}

impl FeedSpec {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Feed collection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub max_items_per_feed: usize,
    pub top_n: usize,
    pub sources: Vec<FeedSpec>,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            max_items_per_feed: 15,
            top_n: 20,
            sources: vec![
                FeedSpec::new("BBC News", "http://feeds.bbci.co.uk/news/rss.xml"),
                FeedSpec::new("CNN", "http://rss.cnn.com/rss/cnn_topstories.rss"),
                FeedSpec::new("TechCrunch", "https://techcrunch.com/feed/"),
                FeedSpec::new("The Verge", "https://www.theverge.com/rss/index.xml"),
                FeedSpec::new("Reuters", "https://www.reutersagency.com/feed/"),
                FeedSpec::new("Hacker News", "https://news.ycombinator.com/rss"),
            ],
        }
    }
}

/// Effective configuration for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Never read from the YAML file; supplied by `--news-api-key` or `NEWS_API_KEY`.
    #[serde(skip)]
    pub news_api_key: Option<String>,
    pub news: NewsApiConfig,
    pub feeds: FeedsConfig,
    /// Directory that receives the JSON outputs.
    pub data_dir: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            news_api_key: None,
            news: NewsApiConfig::default(),
            feeds: FeedsConfig::default(),
            data_dir: "data".to_string(),
            request_timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

impl Config {
    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Build the effective configuration from the CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or is not valid YAML.
    #[instrument(level = "info", skip_all, fields(config = ?cli.config))]
    pub fn load(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let mut config = match &cli.config {
            Some(path) => {
                let yaml = std::fs::read_to_string(path)?;
                let parsed = Self::from_yaml(&yaml)?;
                info!(%path, "Loaded configuration file");
                parsed
            }
            None => Self::default(),
        };

        if let Some(dir) = &cli.data_dir {
            config.data_dir = dir.clone();
        }
        config.news_api_key = cli
            .news_api_key
            .as_ref()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Collect configuration problems worth reporting before a run.
    ///
    /// None of these are fatal: a missing key only disables the headline
    /// source and a bad feed URL only loses that feed.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.news_api_key.is_none() {
            issues.push(
                "NEWS_API_KEY not set; the headline API source will be skipped".to_string(),
            );
        }
        if let Err(e) = Url::parse(&self.news.base_url) {
            issues.push(format!("news.base_url {:?} is not a valid URL: {}", self.news.base_url, e));
        }
        for feed in &self.feeds.sources {
            if let Err(e) = Url::parse(&feed.url) {
                issues.push(format!("feed {:?} has an invalid URL {:?}: {}", feed.name, feed.url, e));
            }
        }
        if self.news.top_n == 0 || self.feeds.top_n == 0 {
            issues.push("top_n of 0 produces empty trend lists".to_string());
        }
        if self.news.page_size > 100 {
            issues.push(format!(
                "news.page_size {} exceeds the API maximum and will be capped at 100",
                self.news.page_size
            ));
        }

        issues
    }

    /// Log the effective configuration without secrets.
    pub fn display(&self) {
        let feed_names: Vec<&str> = self.feeds.sources.iter().map(|f| f.name.as_str()).collect();
        info!(
            country = %self.news.country,
            categories = %self.news.categories.join(", "),
            news_top_n = self.news.top_n,
            rss_max_items_per_feed = self.feeds.max_items_per_feed,
            rss_top_n = self.feeds.top_n,
            feeds = %feed_names.join(", "),
            data_dir = %self.data_dir,
            news_api_key = if self.news_api_key.is_some() { "set" } else { "not set" },
            "Current configuration"
        );
        for issue in self.validate() {
            warn!(%issue, "Configuration issue");
        }
    }
}
