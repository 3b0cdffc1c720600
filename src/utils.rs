//! Small helpers for logging and output paths.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};
use url::Url;

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` bytes (on a character boundary) with an
/// ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Detect if a serde_json error indicates a body that ended early.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Render `url` for logs with the `apiKey` query value masked.
pub fn redact_api_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apiKey" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return redacted.to_string();
    }
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Create the parent directory of `path` if it does not exist yet.
///
/// # Arguments
///
/// * `path` - File about to be written; a bare file name means the current directory
///
/// # Returns
///
/// * `Ok(())` once the directory exists
/// * `Err` if it cannot be created
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    fs::create_dir_all(dir).await?;
    debug!(dir = %dir.display(), "Output directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        // "é" is two bytes; byte 3 falls inside the second one.
        let result = truncate_for_log("éééé", 3);
        assert_eq!(result, "é…(+6 bytes)");
    }

    #[test]
    fn test_looks_truncated() {
        let result: Result<serde_json::Value, _> = serde_json::from_str(r#"{"status": "ok""#);
        assert!(looks_truncated(&result.unwrap_err()));

        let result: Result<serde_json::Value, _> = serde_json::from_str("<html>");
        assert!(!looks_truncated(&result.unwrap_err()));
    }

    #[test]
    fn test_redact_api_key() {
        let url = Url::parse("https://newsapi.org/v2/everything?apiKey=secret&q=latest").unwrap();
        let redacted = redact_api_key(&url);
        assert!(!redacted.contains("secret"));
        assert!(redacted.contains("apiKey=***"));
        assert!(redacted.contains("q=latest"));
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_creates_only_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out.json");
        ensure_parent_dir(&target).await.unwrap();

        let nested = dir.path().join("nested");
        assert!(nested.is_dir());
        // Nothing is written into the directory.
        assert_eq!(std::fs::read_dir(&nested).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_bare_file_name() {
        ensure_parent_dir(Path::new("out.md")).await.unwrap();
    }
}
