//! Interactive mode: re-query as the user types.
//!
//! Each input line is one event. Plain text replaces the search text and goes
//! through the debounce timer; lines starting with `:` are commands that take
//! effect immediately:
//!
//! | Line               | Effect                          |
//! |--------------------|---------------------------------|
//! | `some words`       | search text (debounced)         |
//! | `:category NAME`   | select a category               |
//! | `:category`        | clear the category              |
//! | `:language CODE`   | select a language               |
//! | `:language`        | clear the language              |
//! | `:page N`          | jump to page N                  |
//! | `:next` / `:prev`  | move one page                   |
//! | `:quit`            | stop, dropping any pending text |
//!
//! The loop multiplexes input lines, settled search text and in-flight
//! requests. Requests are never cancelled; late responses are filtered by the
//! session's request tokens. On end of input the pending search text is still
//! allowed to settle and every in-flight request is drained before returning.

use futures::stream::{FuturesUnordered, StreamExt};
use std::error::Error;
use std::future::Future;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

use crate::api::{HeadlineQueryClient, HeadlineTransport};
use crate::catalog::{Category, Language};
use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::debounce::DebounceTimer;
use crate::errors::{HeadlineError, HeadlineResult};
use crate::models::QueryResult;
use crate::outputs;
use crate::query::HeadlineRequest;
use crate::session::{HeadlineSession, RequestToken};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    /// Plain text: the new search text, debounced before use.
    Search(String),
    /// `:category [name]`; no argument clears the category.
    Category(Option<Category>),
    /// `:language [code]`; no argument clears the language.
    Language(Option<Language>),
    /// `:page N` with N >= 1.
    Page(u32),
    /// `:next`
    NextPage,
    /// `:prev`
    PrevPage,
    /// `:quit`
    Quit,
}

impl WatchCommand {
    /// Parse one input line.
    ///
    /// Lines starting with `:` are commands (`c`, `l`, `p`, `n` and `q` are
    /// accepted as short names); anything else is search text.
    ///
    /// # Returns
    ///
    /// * `Err(HeadlineError::InvalidInput)` for an unknown command, category,
    ///   language or a page below 1
    pub fn parse(line: &str) -> HeadlineResult<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(command) = line.trim_start().strip_prefix(':') else {
            return Ok(WatchCommand::Search(line.trim().to_string()));
        };

        let (name, arg) = match command.trim().split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command.trim(), ""),
        };

        match name {
            "category" | "c" if arg.is_empty() => Ok(WatchCommand::Category(None)),
            "category" | "c" => Ok(WatchCommand::Category(Some(arg.parse()?))),
            "language" | "l" if arg.is_empty() => Ok(WatchCommand::Language(None)),
            "language" | "l" => Ok(WatchCommand::Language(Some(arg.parse()?))),
            "page" | "p" => arg
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .map(WatchCommand::Page)
                .ok_or_else(|| HeadlineError::InvalidInput(format!("page must be a number >= 1, got '{}'", arg))),
            "next" | "n" => Ok(WatchCommand::NextPage),
            "prev" => Ok(WatchCommand::PrevPage),
            "quit" | "q" => Ok(WatchCommand::Quit),
            other => Err(HeadlineError::InvalidInput(format!("unknown command ':{}'", other))),
        }
    }
}

fn fetch_one<'a, T>(
    client: &'a HeadlineQueryClient<T>,
    token: RequestToken,
    request: HeadlineRequest,
) -> impl Future<Output = (RequestToken, QueryResult)> + 'a
where
    T: HeadlineTransport,
{
    async move { (token, client.fetch_articles(&request).await) }
}

/// Drive the session from `input` until end of input or `:quit`.
///
/// Every applied result is rendered to `out` (and to `output_path`, if set).
///
/// # Arguments
///
/// * `client` - Client used for every fetch
/// * `settings` - Supplies the API key, page size and debounce delay
/// * `session` - Filter state; an initial fetch is issued for it immediately
/// * `input` - One search text or command per line
/// * `out` - Rendered results and `! <error>` lines for rejected input
/// * `format` - Rendering format
/// * `output_path` - Optional file mirrored with the latest rendering
///
/// # Returns
///
/// * `Ok(())` after end of input (pending work drained) or `:quit`
/// * `Err` if reading input or writing output fails
#[instrument(level = "info", skip_all, fields(debounce_ms = settings.debounce.as_millis() as u64))]
pub async fn run_watch<T, R, W>(
    client: &HeadlineQueryClient<T>,
    settings: &Settings,
    session: &mut HeadlineSession,
    input: R,
    out: &mut W,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> Result<(), Box<dyn Error>>
where
    T: HeadlineTransport,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (mut timer, mut settled_rx) = DebounceTimer::<String>::new(settings.debounce);
    let mut lines = input.lines();
    let mut in_flight = FuturesUnordered::new();
    let mut input_closed = false;
    debug!(delay_ms = timer.delay().as_millis() as u64, "Debounce timer ready");

    if let Some((token, request)) = session.next_fetch(&settings.request) {
        in_flight.push(fetch_one(client, token, request));
    }

    loop {
        if input_closed && in_flight.is_empty() && !timer.is_pending() {
            // A value may have settled after the last poll of the channel.
            match settled_rx.try_recv() {
                Ok(text) => {
                    session.set_search_text(&text);
                    if let Some((token, request)) = session.next_fetch(&settings.request) {
                        in_flight.push(fetch_one(client, token, request));
                    }
                    continue;
                }
                Err(_) => break,
            }
        }

        let mut filters_changed = false;

        tokio::select! {
            line = lines.next_line(), if !input_closed => {
                match line? {
                    None => {
                        debug!("Input closed; waiting for pending work");
                        input_closed = true;
                    }
                    Some(line) => match WatchCommand::parse(&line) {
                        Ok(WatchCommand::Search(text)) => timer.push(text),
                        Ok(WatchCommand::Category(category)) => {
                            session.set_category(category);
                            filters_changed = true;
                        }
                        Ok(WatchCommand::Language(language)) => {
                            session.set_language(language);
                            filters_changed = true;
                        }
                        Ok(WatchCommand::Page(page)) => {
                            session.set_page(page);
                            filters_changed = true;
                        }
                        Ok(WatchCommand::NextPage) => {
                            session.next_page();
                            filters_changed = true;
                        }
                        Ok(WatchCommand::PrevPage) => {
                            session.prev_page();
                            filters_changed = true;
                        }
                        Ok(WatchCommand::Quit) => {
                            info!("Quit requested");
                            timer.cancel();
                            while settled_rx.try_recv().is_ok() {}
                            input_closed = true;
                        }
                        Err(e) => {
                            warn!(error = %e, "Ignoring input line");
                            out.write_all(format!("! {}\n", e).as_bytes()).await?;
                            out.flush().await?;
                        }
                    },
                }
            }
            Some(text) = settled_rx.recv() => {
                debug!(text = %text, "Search text settled");
                session.set_search_text(&text);
                filters_changed = true;
            }
            Some((token, result)) = in_flight.next(), if !in_flight.is_empty() => {
                if session.apply(token, result) {
                    let rendered = match session.error() {
                        Some(message) => outputs::render_error(format, session.filters(), message)?,
                        None => outputs::render(format, session.filters(), session.articles())?,
                    };
                    out.write_all(rendered.as_bytes()).await?;
                    out.write_all(b"\n").await?;
                    out.flush().await?;
                    if let Some(path) = output_path {
                        outputs::write_output(path, &rendered).await?;
                    }
                }
            }
            else => break,
        }

        if filters_changed {
            if let Some((token, request)) = session.next_fetch(&settings.request) {
                in_flight.push(fetch_one(client, token, request));
            }
        }
    }

    info!(filters = %session.filters().summary(), latest = ?session.latest_token(), "Watch loop finished");
    Ok(())
}
