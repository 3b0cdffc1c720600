//! Markdown rendering of an article list.
//!
//! Each article becomes a level-2 heading followed by its image, description
//! and a link to the full story:
//!
//! ```text
//! # Headlines: category technology · page 1
//!
//! ## Some headline
//! *Example News · 2025-05-06 14:30 UTC*
//!
//! ![Some headline](https://example.com/img.jpg)
//!
//! Description text.
//!
//! [Read full article](https://example.com/story)
//! ```

use itertools::Itertools;
use std::fmt::Write;

use crate::models::{Article, FilterState};

pub fn articles_to_markdown(filters: &FilterState, articles: &[Article]) -> String {
    let mut md = String::new();
    writeln!(md, "# Headlines: {}\n", filters.summary()).ok();

    if articles.is_empty() {
        writeln!(md, "_No articles found._").ok();
        return md;
    }

    for article in articles {
        md.push_str(&article_to_markdown(article));
    }
    md
}

/// Render an error in place of the article list.
pub fn error_to_markdown(filters: &FilterState, message: &str) -> String {
    format!("# Headlines: {}\n\n**Error:** {}\n", filters.summary(), message)
}

fn article_to_markdown(article: &Article) -> String {
    let mut md = String::new();
    let title = if article.title.trim().is_empty() {
        "(untitled)"
    } else {
        article.title.trim()
    };
    writeln!(md, "## {}", title).ok();

    let byline = [
        article.source_name.clone(),
        article.author.clone(),
        article
            .published_at
            .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string()),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.trim().is_empty())
    .join(" · ");
    if !byline.is_empty() {
        writeln!(md, "*{}*", byline).ok();
    }
    md.push('\n');

    if let Some(image) = article.url_to_image.as_deref().filter(|s| !s.is_empty()) {
        writeln!(md, "![{}]({})\n", title, image).ok();
    }
    if let Some(description) = article.description.as_deref().filter(|s| !s.trim().is_empty()) {
        writeln!(md, "{}\n", description.trim()).ok();
    }
    if !article.url.is_empty() {
        writeln!(md, "[Read full article]({})\n", article.url).ok();
    }
    md
}
