//! Hacker News top stories.
//!
//! The Firebase API needs two steps:
//!
//! 1. **Indexing**: `GET /v0/topstories.json` returns the ranked story ids
//! 2. **Fetching**: `GET /v0/item/{id}.json` for each of the first `count` ids
//!
//! The per-item requests run concurrently. A failed item is logged and left
//! out, the section itself still succeeds. Items are collected in completion
//! order, so they do not necessarily follow the front-page ranking.

use crate::error::{FetchError, SubFetchError};
use crate::models::{CanonicalItem, Section};
use crate::sources::get_json;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

pub const SECTION_NAME: &str = "Hacker News";

const COMMENTS_BASE: &str = "https://news.ycombinator.com/item?id=";

#[derive(Debug, Deserialize)]
struct HackerNewsItem {
    id: u64,
    /// Absent for deleted and dead items.
    title: Option<String>,
    /// Absent for text posts such as "Ask HN".
    url: Option<String>,
}

impl HackerNewsItem {
    /// Deleted and dead items come back as `{"id": .., "deleted": true}` and
    /// have nothing to show.
    fn standardize(self) -> Result<CanonicalItem, FetchError> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| FetchError::Api {
                service: "Hacker News",
                message: format!("item {} has no title (deleted or dead)", self.id),
            })?;
        let comments = format!("{COMMENTS_BASE}{}", self.id);
        let url = self.url.unwrap_or_else(|| comments.clone());
        Ok(CanonicalItem::with_comments(title, url, comments))
    }
}

/// Fetch the top `count` stories.
#[instrument(level = "info", skip(client))]
pub async fn fetch(client: &Client, base: &str, count: usize) -> Result<Section, FetchError> {
    let ids = index_stories(client, base).await?;
    let top: Vec<u64> = ids.into_iter().take(count).collect();
    info!(count = top.len(), "Indexed Hacker News stories");

    let items = fetch_items(client, base, top).await;
    info!(count = items.len(), "Fetched Hacker News stories");
    Ok(Section::new(SECTION_NAME, items))
}

async fn index_stories(client: &Client, base: &str) -> Result<Vec<u64>, FetchError> {
    let url = format!("{base}/v0/topstories.json");
    get_json(client.get(&url), &url).await
}

/// Fetch every id concurrently, dropping the ones that fail.
async fn fetch_items(client: &Client, base: &str, ids: Vec<u64>) -> Vec<CanonicalItem> {
    let width = ids.len().max(1);
    stream::iter(ids)
        .map(|id| async move {
            match fetch_item(client, base, id).await {
                Ok(item) => {
                    debug!(id, "Fetched Hacker News item");
                    Some(item)
                }
                Err(e) => {
                    warn!(error = %e, "Dropping Hacker News item");
                    None
                }
            }
        })
        .buffer_unordered(width)
        .filter_map(std::future::ready)
        .collect()
        .await
}

async fn fetch_item(client: &Client, base: &str, id: u64) -> Result<CanonicalItem, SubFetchError> {
    let url = format!("{base}/v0/item/{id}.json");
    let item: HackerNewsItem = get_json(client.get(&url), &url)
        .await
        .map_err(|source| SubFetchError { id, source })?;
    item.standardize().map_err(|source| SubFetchError { id, source })
}
