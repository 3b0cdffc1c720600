//! Command-line interface definitions.
//!
//! Every option can be given as a flag; the API key can also come from the
//! `NEWS_API_KEY` environment variable (or a `.env` file) and most settings
//! from a YAML file passed with `--config`.

use clap::{Parser, ValueEnum};

use crate::catalog::{Category, Language};

/// Command-line arguments for headline_query.
///
/// # Examples
///
/// ```sh
/// # Latest articles in English
/// headline_query -l en
///
/// # Technology headlines, second page, as JSON
/// headline_query -c technology -p 2 -f json
///
/// # Interactive search: type text, or :category / :language / :page commands
/// headline_query --watch
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// News API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Optional path to a YAML config file
    #[arg(long)]
    pub config: Option<String>,

    /// Base URL of the news API (defaults to https://newsapi.org/v2/)
    #[arg(long, env = "NEWS_API_BASE_URL")]
    pub base_url: Option<String>,

    /// Free-text search term
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Headline category; switches to the top-headlines endpoint
    #[arg(short, long, value_enum)]
    pub category: Option<Category>,

    /// Article language code
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Articles per page (1-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: Option<u32>,

    /// Do not send pageSize/page at all
    #[arg(long, conflicts_with = "page_size")]
    pub no_paging: bool,

    /// Delay before typed search text is used, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Also write the rendered result to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Read search input from stdin and re-query as it changes
    #[arg(short, long)]
    pub watch: bool,
}

/// How results are rendered on stdout and in `--output`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}
