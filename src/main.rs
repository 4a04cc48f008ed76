//! # Sponge
//!
//! Collects the top items from several news and discussion sources and merges
//! them into one digest, rendered as HTML or plain text and written to a file
//! or sent by email.
//!
//! ## Usage
//!
//! ```sh
//! sponge --count 5 --text --out ./digest
//! sponge --email me@example.com
//! ```
//!
//! ## Architecture
//!
//! One run is a straight pipeline:
//! 1. **Configuration**: CLI flags, credentials and the source list become [`config::Settings`]
//! 2. **Aggregation**: every source is fetched concurrently ([`pipeline::aggregate`])
//! 3. **Rendering**: the collected sections become one document ([`render::render`])
//! 4. **Delivery**: the document goes to a file or an inbox ([`outputs::deliver`])
//!
//! Sources that fail are logged and left out; the digest is built from whatever
//! succeeded.

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod render;
mod sources;
mod utils;

use cli::Cli;
use config::Settings;
use sources::HttpSources;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("sponge starting up");

    let args = Cli::parse();
    debug!(count = args.count, out = ?args.out, email = ?args.email, text = args.text, "Parsed CLI arguments");

    let settings = Settings::from_cli(args);

    // ---- Fetch every source concurrently ----
    let requests = settings.fetch_requests();
    info!(sources = requests.len(), count = settings.count, "Fetching sources");
    let adapter = Arc::new(HttpSources::from_settings(&settings));
    let result = pipeline::aggregate(adapter, requests).await;

    if !result.is_complete() {
        warn!(
            failed = result.failures.len(),
            sources = %result.failed_sources(),
            "Some sources failed; building the digest from the rest"
        );
    }

    // ---- Render and deliver ----
    let document = render::render(&result.sections, settings.mode);
    if let Err(e) = outputs::deliver(
        &document,
        &settings.destination,
        settings.mode,
        &settings.mail,
        settings.timeout,
    )
    .await
    {
        error!(error = %e, "Failed to deliver digest");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        sections = result.sections.len(),
        failed = result.failures.len(),
        "Execution complete"
    );

    Ok(())
}
