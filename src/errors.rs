//! Error type shared by the request builder, the HTTP client and the CLI.
//!
//! Every failure a user can see is one [`HeadlineError`]; its `Display`
//! string is the message shown in place of the article list.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeadlineError {
    // Configuration errors
    #[error("Missing API key: pass --api-key or set NEWS_API_KEY")]
    MissingApiKey,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file could not be parsed: {0}")]
    ConfigFile(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Rate limited by the news API (HTTP 429){}", fmt_detail(.message))]
    RateLimited { message: Option<String> },

    #[error("News API returned HTTP {status}{}", fmt_detail(.message))]
    HttpStatus { status: u16, message: Option<String> },

    // Envelope said "error" on a successful status
    #[error("News API error ({code}): {message}")]
    Api { code: String, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl HeadlineError {
    /// True for HTTP 429, as opposed to any other failure.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, HeadlineError::RateLimited { .. })
    }
}

fn fmt_detail(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(": {}", m),
        _ => String::new(),
    }
}

pub type HeadlineResult<T> = Result<T, HeadlineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message_includes_detail() {
        let err = HeadlineError::RateLimited {
            message: Some("You have made too many requests".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Rate limited by the news API (HTTP 429): You have made too many requests"
        );
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_http_status_without_detail() {
        let err = HeadlineError::HttpStatus {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "News API returned HTTP 500");
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_api_error_message() {
        let err = HeadlineError::Api {
            code: "apiKeyInvalid".to_string(),
            message: "Your API key is invalid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "News API error (apiKeyInvalid): Your API key is invalid"
        );
    }
}
