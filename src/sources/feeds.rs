//! RSS 2.0 / Atom feed adapter.
//!
//! Feeds are fetched one at a time. Each document is scanned once with a
//! streaming `quick_xml` reader that collects both RSS `<item>` and Atom
//! `<entry>` records; RSS items are used when there are any, otherwise the
//! Atom entries are.
//!
//! | Field | RSS 2.0 | Atom |
//! |-------|---------|------|
//! | title | `<title>` | `<title>` |
//! | url | `<link>` text | first `<link href="…">` |
//! | description | `<description>` | `<summary>` |
//! | published | `<pubDate>` | `<published>` |

use crate::config::{FeedSpec, FeedsConfig};
use crate::error::FetchError;
use crate::models::{RawItem, RunMetadata};
use crate::sources::TrendSource;
use crate::trends::RecencyStrategy;
use crate::utils::clean_text;
use futures::stream::{self, StreamExt};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordKind {
    Rss,
    Atom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Description,
    Published,
}

/// A record being read. Only direct children of the record element are
/// mapped to fields.
#[derive(Debug)]
struct Draft {
    kind: RecordKind,
    depth: usize,
    field: Option<Field>,
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    published: Option<String>,
    broken: bool,
}

impl Draft {
    fn new(kind: RecordKind, depth: usize) -> Self {
        Self {
            kind,
            depth,
            field: None,
            title: None,
            link: None,
            description: None,
            published: None,
            broken: false,
        }
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Description => &mut self.description,
            Field::Published => &mut self.published,
        }
    }

    fn field_for(&self, e: &BytesStart) -> Option<Field> {
        match self.kind {
            // qualified names, so `media:title` or `atom:link` are ignored
            RecordKind::Rss => match e.name().as_ref() {
                b"title" => Some(Field::Title),
                b"link" => Some(Field::Link),
                b"description" => Some(Field::Description),
                b"pubDate" => Some(Field::Published),
                _ => None,
            },
            RecordKind::Atom => match e.local_name().as_ref() {
                b"title" => Some(Field::Title),
                b"link" => Some(Field::Link),
                b"summary" => Some(Field::Description),
                b"published" => Some(Field::Published),
                _ => None,
            },
        }
    }

    /// Handle a direct child element opening.
    fn open_child(&mut self, e: &BytesStart, is_empty: bool) {
        let Some(field) = self.field_for(e) else {
            return;
        };

        if self.kind == RecordKind::Atom && field == Field::Link {
            if self.link.is_none() {
                match e.try_get_attribute("href") {
                    Ok(Some(attr)) => match attr.unescape_value() {
                        Ok(href) => self.link = Some(href.into_owned()),
                        Err(_) => self.broken = true,
                    },
                    Ok(None) => {}
                    Err(_) => self.broken = true,
                }
            }
            return;
        }

        // first occurrence wins
        if is_empty || self.slot(field).is_some() {
            return;
        }
        *self.slot(field) = Some(String::new());
        self.field = Some(field);
    }

    fn push_text(&mut self, text: &str) {
        if let Some(field) = self.field {
            if let Some(value) = self.slot(field) {
                value.push_str(text);
            }
        }
    }

    fn finish(self, source: &str) -> RawItem {
        RawItem {
            title: self.title.map(|t| t.trim().to_string()).unwrap_or_default(),
            description: self.description.map(|d| clean_text(&d)).unwrap_or_default(),
            url: self.link.map(|l| l.trim().to_string()).unwrap_or_default(),
            published_at: self.published.map(|p| p.trim().to_string()).unwrap_or_default(),
            source: source.to_string(),
            author: String::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Collected {
    rss: Vec<RawItem>,
    rss_seen: usize,
    atom: Vec<RawItem>,
    atom_seen: usize,
}

impl Collected {
    fn accept(&mut self, draft: Draft, source: &str, max_items: usize) {
        let (items, seen) = match draft.kind {
            RecordKind::Rss => (&mut self.rss, &mut self.rss_seen),
            RecordKind::Atom => (&mut self.atom, &mut self.atom_seen),
        };
        *seen += 1;
        if *seen > max_items {
            return;
        }
        if draft.broken {
            debug!(%source, "Skipping unreadable feed item");
            return;
        }
        items.push(draft.finish(source));
    }
}

fn record_kind(e: &BytesStart) -> Option<RecordKind> {
    if e.name().as_ref() == b"item" {
        Some(RecordKind::Rss)
    } else if e.local_name().as_ref() == b"entry" {
        Some(RecordKind::Atom)
    } else {
        None
    }
}

/// Parse a feed document into at most `max_items` items tagged with
/// `source`.
///
/// RSS items are preferred; Atom entries are only used when the document
/// has no usable RSS items. An item that cannot be read is skipped on its
/// own.
///
/// # Errors
///
/// Returns [`FetchError::Xml`] if the document is not well-formed XML.
pub fn parse_feed(xml: &str, source: &str, max_items: usize) -> Result<Vec<RawItem>, FetchError> {
    // Text is not trimmed per event: a field may be split across text and
    // CDATA segments, and the whitespace between them is content.
    let mut reader = Reader::from_str(xml);

    let mut collected = Collected::default();
    let mut draft: Option<Draft> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                if let Some(d) = draft.as_mut() {
                    if depth == d.depth + 1 {
                        d.open_child(&e, false);
                    }
                } else {
                    draft = record_kind(&e).map(|kind| Draft::new(kind, depth));
                }
            }
            Event::Empty(e) => match draft.as_mut() {
                Some(d) if depth == d.depth => d.open_child(&e, true),
                Some(_) => {}
                None => {
                    if let Some(kind) = record_kind(&e) {
                        collected.accept(Draft::new(kind, depth + 1), source, max_items);
                    }
                }
            },
            Event::End(_) => {
                if let Some(d) = draft.as_mut() {
                    if depth == d.depth + 1 {
                        d.field = None;
                    } else if depth == d.depth {
                        if let Some(done) = draft.take() {
                            collected.accept(done, source, max_items);
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(e) => {
                if let Some(d) = draft.as_mut() {
                    match e.unescape() {
                        Ok(text) => d.push_text(&text),
                        // unknown entities such as &nbsp; keep their raw form
                        Err(_) => d.push_text(&String::from_utf8_lossy(&e)),
                    }
                }
            }
            Event::CData(e) => {
                if let Some(d) = draft.as_mut() {
                    d.push_text(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if collected.rss.is_empty() {
        Ok(collected.atom)
    } else {
        Ok(collected.rss)
    }
}

/// Adapter for a fixed list of RSS/Atom feeds.
#[derive(Debug, Clone)]
pub struct FeedSource {
    client: reqwest::Client,
    settings: FeedsConfig,
}

impl FeedSource {
    pub fn new(client: reqwest::Client, settings: FeedsConfig) -> Self {
        Self { client, settings }
    }

    async fn download(&self, url: &str) -> Result<String, FetchError> {
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    /// Fetch and parse one feed. Failures yield an empty list.
    #[instrument(level = "info", skip_all, fields(feed = %feed.name))]
    pub async fn fetch_feed(&self, feed: &FeedSpec) -> Vec<RawItem> {
        let result = match self.download(&feed.url).await {
            Ok(body) => parse_feed(&body, &feed.name, self.settings.max_items_per_feed),
            Err(e) => Err(e),
        };
        match result {
            Ok(items) => {
                if items.is_empty() {
                    warn!(url = %feed.url, "Feed contained no items");
                } else {
                    info!(count = items.len(), "Fetched feed items");
                }
                items
            }
            Err(e) => {
                error!(url = %feed.url, error = %e, "Feed fetch failed");
                Vec::new()
            }
        }
    }
}

impl TrendSource for FeedSource {
    type Strategy = RecencyStrategy;

    fn key(&self) -> &'static str {
        "rss_feeds"
    }

    fn label(&self) -> &'static str {
        "RSS Feeds"
    }

    fn strategy(&self) -> RecencyStrategy {
        RecencyStrategy
    }

    fn top_n(&self) -> usize {
        self.settings.top_n
    }

    fn metadata(&self) -> RunMetadata {
        RunMetadata::Feeds {
            feeds_monitored: self.settings.sources.iter().map(|f| f.name.clone()).collect(),
        }
    }

    #[instrument(level = "info", skip_all, fields(feeds = self.settings.sources.len()))]
    async fn fetch(&self) -> Vec<RawItem> {
        // `then` awaits each feed before starting the next
        let per_feed: Vec<Vec<RawItem>> = stream::iter(self.settings.sources.iter())
            .then(|feed| self.fetch_feed(feed))
            .collect()
            .await;

        let all: Vec<RawItem> = per_feed.into_iter().flatten().collect();
        info!(count = all.len(), "Total feed items collected");
        all
    }
}
