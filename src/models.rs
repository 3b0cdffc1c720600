//! Data models for filter state, articles and the news API's JSON envelope.
//!
//! - [`FilterState`]: what the user is currently asking for
//! - [`Article`]: one headline as returned by the API
//! - [`ApiResponse`]: the raw envelope around a page of articles
//! - [`QueryResult`]: the outcome of one fetch, articles or an error
//!
//! The API uses camelCase field names (`urlToImage`, `publishedAt`), which the
//! serde attributes map onto snake_case fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{Category, Language};
use crate::errors::HeadlineError;

/// Marker the API substitutes for the title or description of withdrawn content.
pub const REMOVED_MARKER: &str = "[Removed]";

/// The current filter inputs.
///
/// `page` is 1-based. An empty `search_text` means "no free-text filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_text: String,
    pub category: Option<Category>,
    pub language: Option<Language>,
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            category: None,
            language: None,
            page: 1,
        }
    }
}

impl FilterState {
    /// One-line description used in logs and rendered headers.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.search_text.trim().is_empty() {
            parts.push(format!("\"{}\"", self.search_text.trim()));
        }
        if let Some(category) = self.category {
            parts.push(format!("category {}", category));
        }
        if let Some(language) = self.language {
            parts.push(format!("{} {}", language.flag(), language.name()));
        }
        parts.push(format!("page {}", self.page));
        parts.join(" · ")
    }
}

/// A single headline.
///
/// The API occasionally sends `null` for `title` or `url`; those decode as
/// empty strings. An unparseable `publishedAt` decodes as `None` rather than
/// failing the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(
        default,
        rename(deserialize = "source", serialize = "sourceName"),
        deserialize_with = "source_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// True when the API has withdrawn this entry.
    pub fn is_removed(&self) -> bool {
        self.title.contains(REMOVED_MARKER)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.contains(REMOVED_MARKER))
    }
}

/// The JSON envelope returned by both endpoints.
///
/// On success `status` is `"ok"` and `articles` is populated; on failure it is
/// `"error"` with `code` and `message` set.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiResponse {
    /// True when the envelope reports `"status": "error"`.
    pub fn is_error(&self) -> bool {
        self.status.eq_ignore_ascii_case("error")
    }
}

/// Outcome of one fetch: the filtered articles, or the error to display.
pub type QueryResult = Result<Vec<Article>, HeadlineError>;

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc)))
}

fn source_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Source {
        name: Option<String>,
    }
    Ok(Option::<Source>::deserialize(deserializer)?.and_then(|s| s.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, description: Option<&str>) -> Article {
        Article {
            title: title.to_string(),
            description: description.map(str::to_string),
            url: "https://example.com/a".to_string(),
            url_to_image: None,
            author: None,
            source_name: None,
            published_at: None,
        }
    }

    #[test]
    fn test_default_filter_state() {
        let filters = FilterState::default();
        assert_eq!(filters.search_text, "");
        assert_eq!(filters.category, None);
        assert_eq!(filters.language, None);
        assert_eq!(filters.page, 1);
    }

    #[test]
    fn test_filter_summary() {
        let filters = FilterState {
            search_text: " rust ".to_string(),
            category: Some(Category::Technology),
            language: Some(Language::En),
            page: 2,
        };
        assert_eq!(
            filters.summary(),
            "\"rust\" · category technology · 🇺🇸 English · page 2"
        );
        assert_eq!(FilterState::default().summary(), "page 1");
    }

    #[test]
    fn test_removed_detection() {
        assert!(article("[Removed]", None).is_removed());
        assert!(article("Story [Removed] here", Some("fine")).is_removed());
        assert!(article("Fine title", Some("[Removed]")).is_removed());
        assert!(!article("Fine title", Some("Fine description")).is_removed());
        assert!(!article("Removed from office", None).is_removed());
    }

    #[test]
    fn test_article_deserialization() {
        let json = r#"{
            "source": { "id": null, "name": "Example News" },
            "author": "Jane Doe",
            "title": "Something happened",
            "description": "Details follow",
            "url": "https://example.com/story",
            "urlToImage": "https://example.com/story.jpg",
            "publishedAt": "2025-05-06T14:30:00Z",
            "content": "Ignored"
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "Something happened");
        assert_eq!(article.description.as_deref(), Some("Details follow"));
        assert_eq!(article.url_to_image.as_deref(), Some("https://example.com/story.jpg"));
        assert_eq!(article.source_name.as_deref(), Some("Example News"));
        assert_eq!(
            article.published_at.map(|d| d.to_rfc3339()),
            Some("2025-05-06T14:30:00+00:00".to_string())
        );
    }

    #[test]
    fn test_article_null_fields() {
        let json = r#"{ "title": null, "description": null, "url": null, "urlToImage": null }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.url, "");
        assert_eq!(article.description, None);
        assert_eq!(article.source_name, None);
    }

    #[test]
    fn test_bad_published_at_does_not_fail_page() {
        let json = r#"{
            "status": "ok",
            "articles": [
                { "title": "Garbled date", "url": "https://example.com/1", "publishedAt": "yesterday-ish" },
                { "title": "Numeric date", "url": "https://example.com/2", "publishedAt": 1715000000 },
                { "title": "Good date", "url": "https://example.com/3", "publishedAt": "2025-05-06T14:30:00+02:00" }
            ]
        }"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.articles.len(), 3);
        assert_eq!(response.articles[0].published_at, None);
        assert_eq!(response.articles[1].published_at, None);
        assert_eq!(
            response.articles[2].published_at.map(|d| d.to_rfc3339()),
            Some("2025-05-06T12:30:00+00:00".to_string())
        );
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{
            "status": "error",
            "code": "apiKeyMissing",
            "message": "Your API key is missing."
        }"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_error());
        assert!(response.articles.is_empty());
        assert_eq!(response.code.as_deref(), Some("apiKeyMissing"));
    }
}
