//! Headline API adapter.
//!
//! Calls the `top-headlines` endpoint once per configured category and,
//! when keywords are configured, the `everything` search endpoint once per
//! keyword. Responses look like:
//!
//! ```json
//! { "status": "ok", "articles": [ { "source": { "name": "BBC News" },
//!   "author": "...", "title": "...", "description": "...", "url": "...",
//!   "publishedAt": "2025-05-06T10:00:00Z" } ] }
//! ```
//!
//! or, on failure, `{ "status": "error", "message": "..." }`.

use crate::config::NewsApiConfig;
use crate::error::FetchError;
use crate::models::{RawItem, RunMetadata};
use crate::sources::TrendSource;
use crate::trends::EngagementStrategy;
use chrono::{Duration, Local};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// The API refuses page sizes above this.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiArticle {
    source: Option<ApiSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSource {
    name: Option<String>,
}

impl From<ApiArticle> for RawItem {
    fn from(article: ApiArticle) -> Self {
        RawItem {
            title: article.title.unwrap_or_default(),
            description: article.description.unwrap_or_default(),
            url: article.url.unwrap_or_default(),
            published_at: article.published_at.unwrap_or_default(),
            source: article
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            author: article.author.unwrap_or_default(),
        }
    }
}

/// Decode an API response body into items.
///
/// A non-`ok` status is an [`FetchError::Api`]. Articles that do not match
/// the expected shape are skipped one by one.
pub fn parse_articles(body: &str) -> Result<Vec<RawItem>, FetchError> {
    let response: ApiResponse = serde_json::from_str(body)?;
    if response.status != "ok" {
        return Err(FetchError::Api {
            message: response
                .message
                .unwrap_or_else(|| "Unknown error".to_string()),
        });
    }

    let items = response
        .articles
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<ApiArticle>(value) {
            Ok(article) => Some(RawItem::from(article)),
            Err(e) => {
                debug!(index = i, error = %e, "Skipping malformed article");
                None
            }
        })
        .collect();
    Ok(items)
}

/// Adapter for the headline API.
#[derive(Debug, Clone)]
pub struct NewsApiSource {
    client: reqwest::Client,
    api_key: String,
    settings: NewsApiConfig,
}

impl NewsApiSource {
    pub fn new(client: reqwest::Client, api_key: String, settings: NewsApiConfig) -> Self {
        Self {
            client,
            api_key,
            settings,
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, FetchError> {
        let base = format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path);
        let mut all = vec![("apiKey", self.api_key.clone())];
        all.extend(params.iter().cloned());
        Ok(Url::parse_with_params(&base, &all)?)
    }

    fn page_size(&self) -> String {
        self.settings.page_size.min(MAX_PAGE_SIZE).to_string()
    }

    /// URL of a top-headlines call for one category (or all categories).
    pub fn headlines_url(&self, category: Option<&str>) -> Result<Url, FetchError> {
        let mut params = vec![
            ("country", self.settings.country.clone()),
            ("pageSize", self.page_size()),
        ];
        if let Some(category) = category {
            params.push(("category", category.to_string()));
        }
        self.endpoint("top-headlines", &params)
    }

    /// URL of a keyword search covering the last `search_days` days.
    pub fn search_url(&self, keyword: &str) -> Result<Url, FetchError> {
        let to = Local::now().date_naive();
        let from = to - Duration::days(self.settings.search_days);
        self.endpoint(
            "everything",
            &[
                ("q", keyword.to_string()),
                ("from", from.format("%Y-%m-%d").to_string()),
                ("to", to.format("%Y-%m-%d").to_string()),
                ("sortBy", "popularity".to_string()),
                ("pageSize", self.page_size()),
            ],
        )
    }

    /// The request URL carries the API key, so it is stripped from every
    /// transport error before the error can reach a log line.
    async fn get_articles(&self, url: Url) -> Result<Vec<RawItem>, FetchError> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?
            .text()
            .await
            .map_err(reqwest::Error::without_url)?;
        parse_articles(&body)
    }

    /// Fetch top headlines for one category. Failures yield an empty list.
    #[instrument(level = "info", skip(self), fields(country = %self.settings.country))]
    pub async fn get_top_headlines(&self, category: Option<&str>) -> Vec<RawItem> {
        let result = match self.headlines_url(category) {
            Ok(url) => self.get_articles(url).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(items) => {
                info!(count = items.len(), category = category.unwrap_or("all"), "Fetched headlines");
                items
            }
            Err(e) => {
                error!(category = category.unwrap_or("all"), error = %e, "Headline fetch failed");
                Vec::new()
            }
        }
    }

    /// Search recent articles by keyword. Failures yield an empty list.
    #[instrument(level = "info", skip(self))]
    pub async fn search(&self, keyword: &str) -> Vec<RawItem> {
        let result = match self.search_url(keyword) {
            Ok(url) => self.get_articles(url).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(items) => {
                info!(count = items.len(), %keyword, "Fetched search results");
                items
            }
            Err(e) => {
                error!(%keyword, error = %e, "Keyword search failed");
                Vec::new()
            }
        }
    }
}

impl TrendSource for NewsApiSource {
    type Strategy = EngagementStrategy;

    fn key(&self) -> &'static str {
        "newsapi"
    }

    fn label(&self) -> &'static str {
        "NewsAPI"
    }

    fn strategy(&self) -> EngagementStrategy {
        EngagementStrategy
    }

    fn top_n(&self) -> usize {
        self.settings.top_n
    }

    fn metadata(&self) -> RunMetadata {
        RunMetadata::Headlines {
            country: self.settings.country.clone(),
            categories_fetched: self.settings.categories.clone(),
            search_keywords: self.settings.search_keywords.clone(),
        }
    }

    #[instrument(level = "info", skip_all)]
    async fn fetch(&self) -> Vec<RawItem> {
        let mut all = Vec::new();

        if self.settings.categories.is_empty() {
            all.extend(self.get_top_headlines(None).await);
        }
        for category in &self.settings.categories {
            all.extend(self.get_top_headlines(Some(category)).await);
        }
        for keyword in &self.settings.search_keywords {
            all.extend(self.search(keyword).await);
        }

        if all.is_empty() {
            warn!("Headline API returned no articles");
        }
        info!(count = all.len(), "Total headline articles collected");
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_server;

    fn source() -> NewsApiSource {
        NewsApiSource::new(
            reqwest::Client::new(),
            "secret".to_string(),
            NewsApiConfig::default(),
        )
    }

    #[test]
    fn test_parse_articles_ok() {
        let body = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": { "id": "bbc-news", "name": "BBC News" },
                    "author": "Jane Doe",
                    "title": "Markets rally",
                    "description": "Stocks climb",
                    "url": "https://bbc.co.uk/a",
                    "publishedAt": "2025-05-06T10:00:00Z"
                },
                {
                    "source": { "id": null, "name": null },
                    "author": null,
                    "title": "Untitled source",
                    "description": null,
                    "url": "https://example.com/b",
                    "publishedAt": null
                }
            ]
        }"#;

        let items = parse_articles(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source, "BBC News");
        assert_eq!(items[0].author, "Jane Doe");
        assert_eq!(items[0].published_at, "2025-05-06T10:00:00Z");
        assert_eq!(items[1].source, "Unknown");
        assert_eq!(items[1].author, "");
        assert_eq!(items[1].description, "");
    }

    #[test]
    fn test_parse_articles_keeps_untitled() {
        let body = r#"{"status":"ok","articles":[{"title":null,"url":"https://x"}]}"#;
        let items = parse_articles(body).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].title.is_empty());
    }

    #[test]
    fn test_parse_articles_skips_malformed_entries() {
        let body = r#"{"status":"ok","articles":[
            {"title": 42},
            "not an object",
            {"title": "Fine", "source": {"name": "CNN"}}
        ]}"#;
        let items = parse_articles(body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Fine");
    }

    #[test]
    fn test_parse_articles_api_error() {
        let body = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
        match parse_articles(body) {
            Err(FetchError::Api { message }) => assert_eq!(message, "Your API key is invalid."),
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_articles_bad_json() {
        assert!(matches!(parse_articles("<html>"), Err(FetchError::Json(_))));
    }

    #[test]
    fn test_headlines_url() {
        let url = source().headlines_url(Some("technology")).unwrap();
        assert_eq!(url.path(), "/v2/top-headlines");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("apiKey".to_string(), "secret".to_string())));
        assert!(pairs.contains(&("country".to_string(), "us".to_string())));
        assert!(pairs.contains(&("pageSize".to_string(), "20".to_string())));
        assert!(pairs.contains(&("category".to_string(), "technology".to_string())));
    }

    #[test]
    fn test_page_size_capped() {
        let settings = NewsApiConfig {
            page_size: 500,
            ..NewsApiConfig::default()
        };
        let src = NewsApiSource::new(reqwest::Client::new(), "k".to_string(), settings);
        let url = src.headlines_url(None).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("pageSize".to_string(), "100".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "category"));
    }

    #[test]
    fn test_search_url() {
        let url = source().search_url("climate change").unwrap();
        assert_eq!(url.path(), "/v2/everything");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".to_string(), "climate change".to_string())));
        assert!(pairs.contains(&("sortBy".to_string(), "popularity".to_string())));
        let from = pairs.iter().find(|(k, _)| k == "from").unwrap();
        assert_eq!(from.1.len(), 10);
    }

    fn headlines_route(line: &str) -> (u16, String) {
        if line.contains("category=broken") {
            (500, "{}".to_string())
        } else {
            let body = r#"{"status":"ok","articles":[
                {"title":"Chip shortage eases","source":{"name":"Reuters"},"url":"https://r.test/a"}
            ]}"#;
            (200, body.to_string())
        }
    }

    fn local_source(base: &str, key: &str, categories: &[&str]) -> NewsApiSource {
        let settings = NewsApiConfig {
            base_url: format!("{base}/v2"),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            ..NewsApiConfig::default()
        };
        NewsApiSource::new(reqwest::Client::new(), key.to_string(), settings)
    }

    #[tokio::test]
    async fn test_fetch_continues_after_failed_category() {
        let base = test_server::serve(headlines_route).await;
        let src = local_source(&base, "k", &["broken", "technology"]);

        let items = src.fetch().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Chip shortage eases");
        assert_eq!(items[0].source, "Reuters");
    }

    #[tokio::test]
    async fn test_fetch_unreachable_api_is_empty() {
        let src = local_source("http://127.0.0.1:1", "k", &["general"]);
        assert!(src.fetch().await.is_empty());
    }

    #[tokio::test]
    async fn test_transport_errors_hide_api_key() {
        let unreachable = local_source("http://127.0.0.1:1", "SUPERSECRETKEY", &[]);
        let url = unreachable.headlines_url(Some("technology")).unwrap();
        let err = unreachable.get_articles(url).await.unwrap_err().to_string();
        assert!(!err.contains("SUPERSECRETKEY"), "key leaked: {err}");

        let base = test_server::serve(headlines_route).await;
        let failing = local_source(&base, "SUPERSECRETKEY", &[]);
        let url = failing.headlines_url(Some("broken")).unwrap();
        let err = failing.get_articles(url).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
        assert!(!err.to_string().contains("SUPERSECRETKEY"), "key leaked: {err}");
    }

    #[test]
    fn test_metadata() {
        match source().metadata() {
            RunMetadata::Headlines { country, categories_fetched, .. } => {
                assert_eq!(country, "us");
                assert_eq!(categories_fetched.len(), 4);
            }
            other => panic!("unexpected metadata {other:?}"),
        }
    }
}
