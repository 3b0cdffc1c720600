//! Filter state, re-fetch triggering and result application.
//!
//! [`HeadlineSession`] is the single writer of the filters and of the live
//! [`QueryResult`]. Callers feed it settled filter changes, ask it for the
//! next request with [`HeadlineSession::next_fetch`], and hand responses back
//! through [`HeadlineSession::apply`].
//!
//! # Ordering
//!
//! Requests are never cancelled, so responses can arrive out of order. Each
//! issued request carries a [`RequestToken`]; only the response for the most
//! recently issued token is applied. Anything older is dropped.
//!
//! # Failure policy
//!
//! A failed fetch clears the displayed articles and records the error
//! message. A successful fetch replaces the list and clears the error.

use std::fmt;
use tracing::{debug, info};

use crate::catalog::{Category, Language};
use crate::models::{Article, FilterState, QueryResult};
use crate::query::{build_request, HeadlineRequest, RequestSettings};

/// Monotonic identifier attached to each issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owner of the filters and of the currently displayed result.
#[derive(Debug)]
pub struct HeadlineSession {
    filters: FilterState,
    last_issued: Option<FilterState>,
    latest_token: Option<RequestToken>,
    next_token: u64,
    articles: Vec<Article>,
    error: Option<String>,
}

impl HeadlineSession {
    /// Start a session with `filters`; nothing has been requested yet.
    pub fn new(filters: FilterState) -> Self {
        Self {
            filters,
            last_issued: None,
            latest_token: None,
            next_token: 1,
            articles: Vec::new(),
            error: None,
        }
    }

    /// Current filter values, including unsent changes.
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Articles from the last applied success; empty after a failure.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Message of the last applied failure, if the latest result was one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Token of the request whose response would currently be accepted.
    pub fn latest_token(&self) -> Option<RequestToken> {
        self.latest_token
    }

    /// Set the settled search text. Resets paging when the text changes.
    pub fn set_search_text(&mut self, text: &str) {
        if self.filters.search_text != text {
            self.filters.search_text = text.to_string();
            self.filters.page = 1;
        }
    }

    /// Select or clear the category. Resets paging when it changes.
    pub fn set_category(&mut self, category: Option<Category>) {
        if self.filters.category != category {
            self.filters.category = category;
            self.filters.page = 1;
        }
    }

    /// Select or clear the language. Resets paging when it changes.
    pub fn set_language(&mut self, language: Option<Language>) {
        if self.filters.language != language {
            self.filters.language = language;
            self.filters.page = 1;
        }
    }

    /// Jump to `page`; pages below 1 clamp to 1.
    pub fn set_page(&mut self, page: u32) {
        self.filters.page = page.max(1);
    }

    /// Advance one page.
    pub fn next_page(&mut self) {
        self.filters.page = self.filters.page.saturating_add(1);
    }

    /// Go back one page, stopping at page 1.
    pub fn prev_page(&mut self) {
        self.filters.page = self.filters.page.saturating_sub(1).max(1);
    }

    /// Issue a request if the filters differ from the last issued ones.
    ///
    /// # Arguments
    ///
    /// * `settings` - API key and page size for the built request
    ///
    /// # Returns
    ///
    /// * `Some((token, request))` with a fresh token that supersedes every earlier one
    /// * `None` when nothing changed since the previous call
    pub fn next_fetch(&mut self, settings: &RequestSettings) -> Option<(RequestToken, HeadlineRequest)> {
        if self.last_issued.as_ref() == Some(&self.filters) {
            debug!(filters = %self.filters.summary(), "Filters unchanged; not fetching");
            return None;
        }

        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.latest_token = Some(token);
        self.last_issued = Some(self.filters.clone());

        let request = build_request(&self.filters, settings);
        info!(%token, endpoint = %request.endpoint, q = ?request.param("q"), filters = %self.filters.summary(), "Issuing request");
        Some((token, request))
    }

    /// Apply the response for `token`. Returns `false` if it was stale.
    pub fn apply(&mut self, token: RequestToken, result: QueryResult) -> bool {
        if self.latest_token != Some(token) {
            debug!(%token, latest = ?self.latest_token, "Discarding stale response");
            return false;
        }

        match result {
            Ok(articles) => {
                self.articles = articles;
                self.error = None;
            }
            Err(e) => {
                self.articles.clear();
                self.error = Some(e.to_string());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HeadlineError;

    fn settings() -> RequestSettings {
        RequestSettings {
            api_key: "k".to_string(),
            page_size: Some(20),
        }
    }

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: None,
            url: format!("https://example.com/{}", title),
            url_to_image: None,
            author: None,
            source_name: None,
            published_at: None,
        }
    }

    #[test]
    fn test_first_fetch_with_empty_filters() {
        let mut session = HeadlineSession::new(FilterState::default());
        let (token, request) = session.next_fetch(&settings()).unwrap();
        assert_eq!(session.latest_token(), Some(token));
        assert_eq!(request.param("q"), Some("latest"));
    }

    #[test]
    fn test_unchanged_filters_do_not_refetch() {
        let mut session = HeadlineSession::new(FilterState::default());
        assert!(session.next_fetch(&settings()).is_some());
        assert!(session.next_fetch(&settings()).is_none());

        session.set_search_text("");
        assert!(session.next_fetch(&settings()).is_none());
    }

    #[test]
    fn test_each_filter_change_triggers_fetch() {
        let mut session = HeadlineSession::new(FilterState::default());
        session.next_fetch(&settings()).unwrap();

        session.set_search_text("rust");
        let (t1, _) = session.next_fetch(&settings()).unwrap();
        session.set_category(Some(Category::Science));
        let (t2, _) = session.next_fetch(&settings()).unwrap();
        session.set_language(Some(Language::De));
        let (t3, _) = session.next_fetch(&settings()).unwrap();
        session.next_page();
        let (t4, request) = session.next_fetch(&settings()).unwrap();

        assert!(t1 < t2 && t2 < t3 && t3 < t4);
        assert_eq!(request.param("page"), Some("2"));
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut session = HeadlineSession::new(FilterState::default());
        session.set_page(4);
        session.set_language(Some(Language::Es));
        assert_eq!(session.filters().page, 1);

        session.set_page(3);
        session.set_language(Some(Language::Es));
        assert_eq!(session.filters().page, 3);
    }

    #[test]
    fn test_prev_page_stops_at_one() {
        let mut session = HeadlineSession::new(FilterState::default());
        session.prev_page();
        assert_eq!(session.filters().page, 1);
        session.set_page(0);
        assert_eq!(session.filters().page, 1);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = HeadlineSession::new(FilterState::default());
        let (old, _) = session.next_fetch(&settings()).unwrap();
        session.set_search_text("new");
        let (new, _) = session.next_fetch(&settings()).unwrap();

        // Newer response arrives first, then the older one.
        assert!(session.apply(new, Ok(vec![article("fresh")])));
        assert!(!session.apply(old, Ok(vec![article("stale")])));

        assert_eq!(session.articles().len(), 1);
        assert_eq!(session.articles()[0].title, "fresh");
    }

    #[test]
    fn test_failed_fetch_clears_articles() {
        let mut session = HeadlineSession::new(FilterState::default());
        let (t1, _) = session.next_fetch(&settings()).unwrap();
        session.apply(t1, Ok(vec![article("a"), article("b")]));

        session.next_page();
        let (t2, _) = session.next_fetch(&settings()).unwrap();
        session.apply(t2, Err(HeadlineError::RateLimited { message: None }));

        assert!(session.articles().is_empty());
        assert_eq!(session.error(), Some("Rate limited by the news API (HTTP 429)"));

        session.prev_page();
        let (t3, _) = session.next_fetch(&settings()).unwrap();
        session.apply(t3, Ok(vec![]));
        assert_eq!(session.error(), None);
        assert!(session.articles().is_empty());
    }
}
