//! Rendering of query results.
//!
//! - [`markdown`]: a readable article list for the terminal
//! - [`json`]: the filters and articles as a JSON document
//!
//! Both renderers take the same inputs, so the CLI can switch between them
//! with `--format` and optionally mirror the output to a file.

pub mod json;
pub mod markdown;

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::cli::OutputFormat;
use crate::models::{Article, FilterState};
use crate::utils::ensure_parent_dir;

/// Render `articles` in the requested format.
pub fn render(format: OutputFormat, filters: &FilterState, articles: &[Article]) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Markdown => Ok(markdown::articles_to_markdown(filters, articles)),
        OutputFormat::Json => json::articles_to_json(filters, articles),
    }
}

/// Render an error message in place of the article list.
pub fn render_error(format: OutputFormat, filters: &FilterState, message: &str) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Markdown => Ok(markdown::error_to_markdown(filters, message)),
        OutputFormat::Json => json::error_to_json(filters, message),
    }
}

/// Write rendered output to `path`, creating its directory if needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_output(path: &Path, rendered: &str) -> Result<(), Box<dyn Error>> {
    ensure_parent_dir(path).await?;
    fs::write(path, rendered).await?;
    info!(bytes = rendered.len(), "Wrote output file");
    Ok(())
}
