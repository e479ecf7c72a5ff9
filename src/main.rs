//! # Trending Topics
//!
//! Collects news from a headline API and a set of RSS/Atom feeds, assigns
//! every item a category and a relevance score, and writes ranked trending
//! topics as JSON.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... trending_topics -d ./data
//! ```
//!
//! ## Architecture
//!
//! Sources run one after another:
//! 1. **Fetching**: each source adapter returns normalized items
//! 2. **Scoring**: a per-source strategy categorizes and scores every titled item
//! 3. **Ranking**: stable sort by score, dense ranks, top-N
//! 4. **Output**: one JSON file per source, then a combined snapshot
//!
//! The process exits with status 1 when no source produced data.

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod sources;
mod trends;
mod utils;

use cli::Cli;
use config::Config;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("trending_topics starting up");

    // .env must be loaded before clap reads NEWS_API_KEY
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env file");
    }

    let args = Cli::parse();
    debug!(?args.config, ?args.data_dir, "Parsed CLI arguments");

    let config = Config::load(&args)?;
    config.display();

    if let Err(e) = ensure_writable_dir(&config.data_dir).await {
        error!(
            path = %config.data_dir,
            error = %e,
            "Data directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let result = pipeline::run(&config).await?;

    let elapsed = start_time.elapsed();
    match result {
        Some((snapshot, path)) => {
            info!(
                ?elapsed,
                path = %path.display(),
                sources = snapshot.sources.len(),
                "Data collection complete"
            );
            Ok(ExitCode::SUCCESS)
        }
        None => {
            error!(
                ?elapsed,
                "Data collection failed: no source produced data (check NEWS_API_KEY and network access)"
            );
            Ok(ExitCode::FAILURE)
        }
    }
}
