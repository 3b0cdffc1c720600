//! HTTP access to the news API.
//!
//! # Architecture
//!
//! - [`HeadlineTransport`]: the seam that performs one GET and hands back the
//!   status code and body
//! - [`ReqwestTransport`]: the production transport over `reqwest::Client`
//! - [`HeadlineQueryClient`]: turns a [`HeadlineRequest`] into a URL, sends it
//!   through a transport and classifies the outcome
//!
//! # Outcome classification
//!
//! | Response                         | Result                              |
//! |----------------------------------|-------------------------------------|
//! | transport failure                | [`HeadlineError::Transport`]        |
//! | HTTP 429                         | [`HeadlineError::RateLimited`]      |
//! | other non-2xx                    | [`HeadlineError::HttpStatus`]       |
//! | 2xx with `"status": "error"`     | [`HeadlineError::Api`]              |
//! | 2xx with an undecodable body     | [`HeadlineError::Decode`]           |
//! | 2xx with `"status": "ok"`        | articles minus `[Removed]` entries  |
//!
//! No retry, backoff or caching happens at this layer.

use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::errors::{HeadlineError, HeadlineResult};
use crate::models::{ApiResponse, Article, QueryResult};
use crate::query::HeadlineRequest;
use crate::utils::{looks_truncated, redact_api_key, truncate_for_log};

/// HTTP status the API uses when the key has exhausted its quota.
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Raw result of one GET: status code and body text.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Something that can perform a GET against the news API.
///
/// Implementors only move bytes; status interpretation happens in
/// [`HeadlineQueryClient`].
pub trait HeadlineTransport {
    /// Send a GET for `url` and return its status and body.
    async fn get(&self, url: &Url) -> HeadlineResult<TransportResponse>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the transport with a crate-identifying user agent.
    ///
    /// # Returns
    ///
    /// * `Err(HeadlineError::Transport)` if the TLS backend cannot be initialised
    pub fn new() -> HeadlineResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl HeadlineTransport for ReqwestTransport {
    /// The request URL carries `apiKey`, so it is stripped from any error.
    async fn get(&self, url: &Url) -> HeadlineResult<TransportResponse> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        Ok(TransportResponse { status, body })
    }
}

/// Client for the headline and search endpoints.
#[derive(Debug)]
pub struct HeadlineQueryClient<T> {
    transport: T,
    base_url: Url,
}

impl<T> HeadlineQueryClient<T>
where
    T: HeadlineTransport,
{
    /// Create a client that resolves endpoint paths against `base_url`.
    pub fn new(transport: T, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    /// Base URL that endpoint paths are joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Perform `request` once and return the surviving articles or an error.
    #[instrument(level = "info", skip_all, fields(endpoint = %request.endpoint))]
    pub async fn fetch_articles(&self, request: &HeadlineRequest) -> QueryResult {
        let url = request.url(&self.base_url)?;
        debug!(url = %redact_api_key(&url), "Sending request");

        let t0 = Instant::now();
        let response = self.transport.get(&url).await;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!(elapsed_ms, error = %e, "Request failed before a response arrived");
                return Err(e);
            }
        };

        let result = interpret_response(response);
        match &result {
            Ok(articles) => info!(elapsed_ms, count = articles.len(), "Fetched articles"),
            Err(e) => warn!(elapsed_ms, rate_limited = e.is_rate_limited(), error = %e, "News API request failed"),
        }
        result
    }
}

/// Classify a raw response and, on success, drop withdrawn articles.
pub fn interpret_response(response: TransportResponse) -> QueryResult {
    let TransportResponse { status, body } = response;

    if !(200..300).contains(&status) {
        // Error bodies usually carry the API envelope; use its message if so.
        let message = serde_json::from_str::<ApiResponse>(&body)
            .ok()
            .and_then(|r| r.message);
        return Err(if status == STATUS_TOO_MANY_REQUESTS {
            HeadlineError::RateLimited { message }
        } else {
            HeadlineError::HttpStatus { status, message }
        });
    }

    let envelope: ApiResponse = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(
                error = %e,
                truncated = looks_truncated(&e),
                body_preview = %truncate_for_log(&body, 300),
                "Response body did not match the expected shape"
            );
            return Err(e.into());
        }
    };

    if envelope.is_error() {
        return Err(HeadlineError::Api {
            code: envelope.code.unwrap_or_else(|| "unknown".to_string()),
            message: envelope.message.unwrap_or_default(),
        });
    }

    let received = envelope.articles.len();
    let articles: Vec<Article> = envelope
        .articles
        .into_iter()
        .filter(|a| !a.is_removed())
        .collect();
    debug!(
        received,
        kept = articles.len(),
        total_results = ?envelope.total_results,
        "Filtered removed articles"
    );
    Ok(articles)
}
