//! JSON output files.
//!
//! # Output Structure
//!
//! ```text
//! data_dir/
//! ├── newsapi_20250506_143000.json          # one per source collection
//! ├── rss_feeds_20250506_143012.json
//! └── combined_trends_20250506_143015.json  # one per full run
//! ```
//!
//! Files are pretty-printed with two-space indentation and keep non-ASCII
//! text as-is.

use crate::models::{CollectionSummary, CombinedSnapshot};
use crate::utils::timestamp_slug;
use chrono::Local;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Default filename for `prefix`, stamped with the current local time.
pub fn default_filename(prefix: &str) -> String {
    format!("{}_{}.json", prefix, timestamp_slug(&Local::now()))
}

/// Serialize `value` into `{data_dir}/{filename}`, creating `data_dir` if
/// needed. Returns the written path.
#[instrument(level = "info", skip(value, data_dir), fields(data_dir = %data_dir.display()))]
pub async fn write_json<T: Serialize>(
    value: &T,
    data_dir: &Path,
    filename: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;

    if let Err(e) = fs::create_dir_all(data_dir).await {
        error!(error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let path = data_dir.join(filename);
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON file");
    Ok(path)
}

/// Write one source's summary as `{key}_{timestamp}.json` unless a filename
/// is given.
pub async fn write_summary(
    summary: &CollectionSummary,
    key: &str,
    data_dir: &Path,
    filename: Option<&str>,
) -> Result<PathBuf, Box<dyn Error>> {
    let name = filename.map(str::to_string).unwrap_or_else(|| default_filename(key));
    write_json(summary, data_dir, &name).await
}

/// Write the combined snapshot as `combined_trends_{timestamp}.json` unless
/// a filename is given.
pub async fn write_snapshot(
    snapshot: &CombinedSnapshot,
    data_dir: &Path,
    filename: Option<&str>,
) -> Result<PathBuf, Box<dyn Error>> {
    let name = filename
        .map(str::to_string)
        .unwrap_or_else(|| default_filename("combined_trends"));
    write_json(snapshot, data_dir, &name).await
}
