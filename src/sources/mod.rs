//! Source adapters that turn one remote API into one [`Section`].
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Hacker News | [`hacker_news`] | Firebase API | Index fetch, then one request per item |
//! | New York Times | [`nyt`] | Top Stories API | Requires `NYT_API_KEY` |
//! | Reddit | [`reddit`] | Subreddit JSON listing | Requires `REDDIT_USERNAME` for the User-Agent |
//! | News API | [`news_api`] | `/v1/articles` | Requires `NEWS_API_KEY` |
//!
//! # Common Patterns
//!
//! Every adapter:
//! - builds its own HTTP client with the run's per-request timeout
//! - reads credentials from the [`Credentials`] it was handed, never from the environment
//! - keeps the first `count` entries and tolerates shorter lists

pub mod hacker_news;
pub mod news_api;
pub mod nyt;
pub mod reddit;

use crate::config::{Credentials, Settings};
use crate::error::{ConfigError, FetchError};
use crate::models::{FetchRequest, Section, SourceKind};
use crate::pipeline::SourceAdapter;
use crate::utils::truncate_for_log;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

/// Base URLs of the remote services.
///
/// Production values come from [`Endpoints::default`]; tests point them at a
/// local mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub hacker_news: String,
    pub news_api: String,
    pub reddit: String,
    pub nyt: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            hacker_news: "https://hacker-news.firebaseio.com".to_string(),
            news_api: "https://newsapi.org".to_string(),
            reddit: "https://www.reddit.com".to_string(),
            nyt: "https://api.nytimes.com".to_string(),
        }
    }
}

/// The production adapter: dispatches each request to the matching HTTP source.
#[derive(Debug, Clone)]
pub struct HttpSources {
    endpoints: Endpoints,
    credentials: Credentials,
    timeout: Duration,
}

impl HttpSources {
    pub fn new(endpoints: Endpoints, credentials: Credentials, timeout: Duration) -> Self {
        Self {
            endpoints,
            credentials,
            timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Endpoints::default(),
            settings.credentials.clone(),
            settings.timeout,
        )
    }

    fn client(&self) -> Result<Client, FetchError> {
        http_client(self.timeout)
    }
}

impl SourceAdapter for HttpSources {
    async fn fetch(&self, request: &FetchRequest) -> Result<Section, FetchError> {
        let client = self.client()?;
        let count = request.count;
        match &request.source {
            SourceKind::HackerNews => {
                hacker_news::fetch(&client, &self.endpoints.hacker_news, count).await
            }
            SourceKind::NewYorkTimes => {
                let key = require(
                    &self.credentials.nyt_api_key,
                    "New York Times API key",
                    "NYT_API_KEY",
                )?;
                nyt::fetch(&client, &self.endpoints.nyt, key, count).await
            }
            SourceKind::Reddit { subreddit } => {
                let username = require(
                    &self.credentials.reddit_username,
                    "Reddit username",
                    "REDDIT_USERNAME",
                )?;
                reddit::fetch(&client, &self.endpoints.reddit, subreddit, username, count).await
            }
            SourceKind::NewsApi { source } => {
                let key = require(
                    &self.credentials.news_api_key,
                    "News API key",
                    "NEWS_API_KEY",
                )?;
                news_api::fetch(&client, &self.endpoints.news_api, source, key, count).await
            }
        }
    }
}

/// Build an HTTP client whose every request is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("sponge/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| FetchError::network("<client>", source))
}

fn require<'a>(
    value: &'a Option<String>,
    what: &'static str,
    env: &'static str,
) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingCredential { what, env })
}

/// Send `request`, insist on a 2xx status and decode the JSON body.
///
/// `url` is only used for error messages and logs, so callers can pass a form
/// with secrets stripped out.
#[instrument(level = "debug", skip(request))]
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    url: &str,
) -> Result<T, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|e| FetchError::network(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::network(url, e))?;
    debug!(bytes = body.len(), "Received response body");

    serde_json::from_str(&body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        preview: truncate_for_log(&body, 200),
        source,
    })
}
