//! Runtime settings resolved from flags, environment and an optional YAML file.
//!
//! Precedence, highest first: command-line flag, environment variable,
//! `--config` file, built-in default.
//!
//! ```yaml
//! api_key: "..."
//! base_url: "https://newsapi.org/v2/"
//! page_size: 20
//! debounce_ms: 500
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::cli::Cli;
use crate::errors::{HeadlineError, HeadlineResult};
use crate::query::RequestSettings;

/// Public NewsAPI v2 root.
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest `pageSize` the API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Quiet period before typed search text is used.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Contents of the optional YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub page_size: Option<u32>,
    pub debounce_ms: Option<u64>,
}

impl FileConfig {
    /// Parse YAML text. Unknown keys are rejected so typos surface early.
    pub fn from_yaml(text: &str) -> HeadlineResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse the file at `path`.
    ///
    /// # Returns
    ///
    /// * `Err(HeadlineError::Io)` if the file cannot be read
    /// * `Err(HeadlineError::ConfigFile)` if it is not valid config YAML
    pub fn load(path: &Path) -> HeadlineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub request: RequestSettings,
    pub base_url: Url,
    pub debounce: Duration,
}

impl Settings {
    /// Load `.env` from the working directory, if present.
    ///
    /// Call before parsing arguments so clap's `env` lookups see its values.
    pub fn load_dotenv() {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env");
        }
    }

    /// Resolve settings from parsed arguments, reading `--config` if given.
    pub fn from_cli(cli: &Cli) -> HeadlineResult<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(Path::new(path))?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    /// Merge parsed arguments over `file` and fill in defaults.
    ///
    /// # Arguments
    ///
    /// * `cli` - Parsed arguments; clap has already applied environment variables
    /// * `file` - Values from the config file, or `FileConfig::default()`
    ///
    /// # Returns
    ///
    /// * `Err(HeadlineError::MissingApiKey)` if no non-blank key was supplied
    /// * `Err(HeadlineError::Config)` for an out-of-range page size or unusable base URL
    pub fn resolve(cli: &Cli, file: FileConfig) -> HeadlineResult<Self> {
        let api_key = cli
            .api_key
            .clone()
            .or(file.api_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or(HeadlineError::MissingApiKey)?;

        let base_url = parse_base_url(
            cli.base_url
                .as_deref()
                .or(file.base_url.as_deref())
                .unwrap_or(DEFAULT_BASE_URL),
        )?;

        let page_size = if cli.no_paging {
            None
        } else {
            let size = cli.page_size.or(file.page_size).unwrap_or(DEFAULT_PAGE_SIZE);
            if size == 0 || size > MAX_PAGE_SIZE {
                return Err(HeadlineError::Config(format!(
                    "page_size must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, size
                )));
            }
            Some(size)
        };

        let debounce = Duration::from_millis(
            cli.debounce_ms
                .or(file.debounce_ms)
                .unwrap_or(DEFAULT_DEBOUNCE_MS),
        );

        Ok(Self {
            request: RequestSettings { api_key, page_size },
            base_url,
            debounce,
        })
    }
}

/// Parse a base URL, adding the trailing slash endpoint joins rely on.
fn parse_base_url(raw: &str) -> HeadlineResult<Url> {
    let raw = raw.trim();
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    let url = Url::parse(&with_slash)?;
    if url.cannot_be_a_base() {
        return Err(HeadlineError::Config(format!("base URL '{}' cannot be a base", raw)));
    }
    Ok(url)
}
