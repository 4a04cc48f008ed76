//! Command-line interface definitions for sponge.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials for the individual sources and for the email provider are read
//! from environment variables through the same struct, so nothing downstream
//! has to look at the process environment.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the sponge digest job.
///
/// # Examples
///
/// ```sh
/// # HTML digest with 10 items per source, written to the temp directory
/// sponge
///
/// # Plain text, 5 items per source, written to ./digest.txt
/// sponge --count 5 --text --out ./digest
///
/// # Email the digest instead of writing a file
/// MAILGUN_API_KEY=... MAILGUN_DOMAIN=mg.example.com sponge --email me@example.com
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of items to fetch from each source
    #[arg(short = 'n', long, default_value_t = 10)]
    pub count: usize,

    /// Output file path without extension (defaults to <tmpdir>/sponge_out)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Send the digest to this address instead of writing a file
    #[arg(short, long)]
    pub email: Option<String>,

    /// Render plain text instead of HTML
    #[arg(short, long)]
    pub text: bool,

    /// Optional path to a YAML file listing the sources to fetch
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// News API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// New York Times API key
    #[arg(long, env = "NYT_API_KEY", hide_env_values = true)]
    pub nyt_api_key: Option<String>,

    /// Reddit username used in the User-Agent header
    #[arg(long, env = "REDDIT_USERNAME")]
    pub reddit_username: Option<String>,

    /// Mailgun API key
    #[arg(long, env = "MAILGUN_API_KEY", hide_env_values = true)]
    pub mailgun_api_key: Option<String>,

    /// Mailgun sending domain
    #[arg(long, env = "MAILGUN_DOMAIN")]
    pub mailgun_domain: Option<String>,

    /// Sender address for emailed digests (defaults to sponge@<domain>)
    #[arg(long, env = "MAILGUN_FROM")]
    pub mailgun_from: Option<String>,

    /// Mailgun API host, e.g. https://api.eu.mailgun.net for EU domains
    #[arg(long, env = "MAILGUN_API_BASE")]
    pub mailgun_api_base: Option<String>,
}
