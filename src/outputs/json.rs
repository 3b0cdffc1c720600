//! JSON rendering of a query result.
//!
//! The document carries the filters that produced it so a saved file is
//! self-describing:
//!
//! ```text
//! {
//!   "filters": { "search_text": "", "category": "technology", ... },
//!   "fetched_at": "2025-05-06T14:30:00Z",
//!   "articles": [ ... ]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Article, FilterState};

#[derive(Debug, Serialize)]
pub struct HeadlinePage<'a> {
    pub filters: &'a FilterState,
    pub fetched_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    pub articles: &'a [Article],
}

pub fn articles_to_json(filters: &FilterState, articles: &[Article]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&HeadlinePage {
        filters,
        fetched_at: Utc::now(),
        error: None,
        articles,
    })
}

pub fn error_to_json(filters: &FilterState, message: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&HeadlinePage {
        filters,
        fetched_at: Utc::now(),
        error: Some(message),
        articles: &[],
    })
}
