//! Turning filter state into a concrete API request.
//!
//! The news API has two search paths with different requirements:
//!
//! | Filters                     | Endpoint        | Filter params            |
//! |-----------------------------|-----------------|--------------------------|
//! | category set                | `top-headlines` | `category`, `language`?  |
//! | no category                 | `everything`    | `q`, `language`?         |
//!
//! `everything` refuses requests without a query term, so an empty search
//! falls back to [`DEFAULT_QUERY`]. Search text is never sent to
//! `top-headlines`; a category selection takes precedence over it.

use std::fmt;
use url::Url;

use crate::errors::HeadlineResult;
use crate::models::FilterState;

/// Query term used on the `everything` endpoint when the search box is empty.
pub const DEFAULT_QUERY: &str = "latest";

/// The two API paths under the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TopHeadlines,
    Everything,
}

impl Endpoint {
    /// Path segment joined onto the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::TopHeadlines => "top-headlines",
            Endpoint::Everything => "everything",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Per-client values that go into every request.
#[derive(Clone)]
pub struct RequestSettings {
    pub api_key: String,
    /// `None` disables the `pageSize`/`page` parameters entirely.
    pub page_size: Option<u32>,
}

impl fmt::Debug for RequestSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSettings")
            .field("api_key", &"<redacted>")
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// An endpoint plus its ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineRequest {
    pub endpoint: Endpoint,
    pub params: Vec<(&'static str, String)>,
}

impl HeadlineRequest {
    /// Value of the first parameter named `name`, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Full request URL: `base` joined with the endpoint path, plus the query.
    ///
    /// `base` is expected to end with a slash (`https://newsapi.org/v2/`).
    pub fn url(&self, base: &Url) -> HeadlineResult<Url> {
        let mut url = base.join(self.endpoint.path())?;
        url.query_pairs_mut()
            .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }
}

/// Decide the endpoint and parameters for `filters`.
///
/// Parameter order is `apiKey`, the filter parameters, then `pageSize` and
/// `page` when paging is enabled.
pub fn build_request(filters: &FilterState, settings: &RequestSettings) -> HeadlineRequest {
    let mut params: Vec<(&'static str, String)> = vec![("apiKey", settings.api_key.clone())];

    let endpoint = match filters.category {
        Some(category) => {
            params.push(("category", category.as_str().to_string()));
            if let Some(language) = filters.language {
                params.push(("language", language.code().to_string()));
            }
            Endpoint::TopHeadlines
        }
        None => {
            let term = filters.search_text.trim();
            let term = if term.is_empty() { DEFAULT_QUERY } else { term };
            params.push(("q", term.to_string()));
            if let Some(language) = filters.language {
                params.push(("language", language.code().to_string()));
            }
            Endpoint::Everything
        }
    };

    if let Some(page_size) = settings.page_size {
        params.push(("pageSize", page_size.to_string()));
        params.push(("page", filters.page.max(1).to_string()));
    }

    HeadlineRequest { endpoint, params }
}
