//! # headline_query
//!
//! Query a news-headlines API by free text, category and language, and print
//! the matching articles as Markdown or JSON.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... headline_query -c technology -l en
//! NEWS_API_KEY=... headline_query --watch
//! ```
//!
//! ## Architecture
//!
//! 1. **Settings**: flags, environment, `.env` and an optional YAML file
//! 2. **Request building**: filters decide the endpoint and parameters
//! 3. **Fetching**: one GET per settled filter change, withdrawn entries dropped
//! 4. **Output**: Markdown or JSON on stdout, optionally mirrored to a file
//!
//! In `--watch` mode stdin lines drive the filters; typed text is debounced
//! and only the response to the newest request is shown.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod catalog;
mod cli;
mod config;
mod debounce;
mod errors;
mod models;
mod outputs;
mod query;
mod session;
mod utils;
mod watch;

use api::{HeadlineQueryClient, ReqwestTransport};
use cli::Cli;
use config::Settings;
use models::FilterState;
use session::HeadlineSession;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    Settings::load_dotenv();
    let args = Cli::parse();
    debug!(?args.category, ?args.language, page = args.page, watch = args.watch, "Parsed CLI arguments");

    let settings = match Settings::from_cli(&args) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Could not resolve settings");
            return Err(e.into());
        }
    };

    let client = HeadlineQueryClient::new(ReqwestTransport::new()?, settings.base_url.clone());
    info!(base_url = %client.base_url(), page_size = ?settings.request.page_size, "headline_query starting up");

    let filters = FilterState {
        search_text: args.query.clone(),
        category: args.category,
        language: args.language,
        page: args.page,
    };
    let mut session = HeadlineSession::new(filters);
    let output_path = args.output.as_deref().map(Path::new);

    let result = if args.watch {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        watch::run_watch(
            &client,
            &settings,
            &mut session,
            stdin,
            &mut stdout,
            args.format,
            output_path,
        )
        .await
    } else {
        run_once(&client, &settings, &mut session, &args, output_path).await
    };

    let elapsed = start_time.elapsed();
    info!(?elapsed, millis = elapsed.as_millis() as u64, "Execution complete");
    result
}

/// Fetch once for the CLI filters and print the result.
///
/// A failed fetch is still rendered, then returned as the process error.
#[instrument(level = "info", skip_all)]
async fn run_once(
    client: &HeadlineQueryClient<ReqwestTransport>,
    settings: &Settings,
    session: &mut HeadlineSession,
    args: &Cli,
    output_path: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let Some((token, request)) = session.next_fetch(&settings.request) else {
        return Ok(());
    };
    let result = client.fetch_articles(&request).await;
    session.apply(token, result);

    let rendered = match session.error() {
        Some(message) => outputs::render_error(args.format, session.filters(), message)?,
        None => outputs::render(args.format, session.filters(), session.articles())?,
    };
    println!("{}", rendered);

    if let Some(path) = output_path {
        if let Err(e) = outputs::write_output(path, &rendered).await {
            error!(path = %path.display(), error = %e, "Failed to write output file");
            return Err(e);
        }
    }

    match session.error() {
        Some(message) => Err(message.to_string().into()),
        None => Ok(()),
    }
}
