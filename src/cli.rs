//! Command-line interface definitions.
//!
//! The binary always runs the full collection pipeline; the flags only
//! point it at a config file, an output directory and an API key.

use clap::Parser;

/// Command-line arguments for the trending topics collector.
///
/// # Examples
///
/// ```sh
/// # Defaults: feeds plus the headline API when NEWS_API_KEY is set
/// trending_topics
///
/// # Custom settings and output directory
/// trending_topics -c trends.yaml -d ./data
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output directory for the JSON files (overrides the config file)
    #[arg(short, long)]
    pub data_dir: Option<String>,

    /// Headline API key; the API source is skipped without one
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,
}
