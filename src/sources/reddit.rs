//! Subreddit top posts of the day from the public JSON listing.
//!
//! Reddit answers 429 to generic user agents, so every request identifies the
//! app and the configured Reddit user.

use crate::error::FetchError;
use crate::models::{CanonicalItem, Section};
use crate::sources::get_json;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::{info, instrument};

const COMMENTS_BASE: &str = "https://reddit.com";

#[derive(Debug, Deserialize)]
struct RedditList {
    data: RedditListData,
}

#[derive(Debug, Deserialize)]
struct RedditListData {
    #[serde(default)]
    children: Vec<RedditChild>,
}

#[derive(Debug, Deserialize)]
struct RedditChild {
    data: RedditItem,
}

#[derive(Debug, Deserialize)]
struct RedditItem {
    title: String,
    url: String,
    permalink: String,
}

impl RedditItem {
    fn standardize(self) -> CanonicalItem {
        CanonicalItem::with_comments(
            self.title,
            self.url,
            format!("{COMMENTS_BASE}{}", self.permalink),
        )
    }
}

pub fn section_name(subreddit: &str) -> String {
    format!("Reddit r/{subreddit}")
}

pub fn user_agent(username: &str) -> String {
    format!(
        "rust:sponge:{} (by /u/{username})",
        env!("CARGO_PKG_VERSION")
    )
}

pub fn listing_url(base: &str, subreddit: &str) -> String {
    format!(
        "{base}/r/{}/top.json",
        urlencoding::encode(subreddit)
    )
}

/// Fetch the top `count` posts of the day from `subreddit`.
#[instrument(level = "info", skip(client))]
pub async fn fetch(
    client: &Client,
    base: &str,
    subreddit: &str,
    username: &str,
    count: usize,
) -> Result<Section, FetchError> {
    let url = listing_url(base, subreddit);
    let request = client
        .get(&url)
        .header(USER_AGENT, user_agent(username))
        .query(&[("raw_json", "1"), ("t", "day")])
        .query(&[("limit", count)]);
    let list: RedditList = get_json(request, &url).await?;

    let items: Vec<CanonicalItem> = list
        .data
        .children
        .into_iter()
        .take(count)
        .map(|child| child.data.standardize())
        .collect();
    info!(count = items.len(), "Fetched subreddit posts");
    Ok(Section::new(section_name(subreddit), items))
}
