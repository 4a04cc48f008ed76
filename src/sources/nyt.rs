//! New York Times top stories via the Top Stories API.

use crate::error::FetchError;
use crate::models::{CanonicalItem, Section};
use crate::sources::get_json;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

pub const SECTION_NAME: &str = "New York Times";

#[derive(Debug, Deserialize)]
struct NytList {
    #[serde(default)]
    results: Vec<NytItem>,
}

#[derive(Debug, Deserialize)]
struct NytItem {
    title: String,
    url: String,
}

impl NytItem {
    fn standardize(self) -> CanonicalItem {
        CanonicalItem::new(self.title, self.url)
    }
}

/// Fetch the home page's top `count` stories.
#[instrument(level = "info", skip(client, api_key))]
pub async fn fetch(
    client: &Client,
    base: &str,
    api_key: &str,
    count: usize,
) -> Result<Section, FetchError> {
    let url = format!("{base}/svc/topstories/v2/home.json");
    let list: NytList = get_json(client.get(&url).query(&[("api-key", api_key)]), &url).await?;

    let items: Vec<CanonicalItem> = list
        .results
        .into_iter()
        .take(count)
        .map(NytItem::standardize)
        .collect();
    info!(count = items.len(), "Fetched New York Times stories");
    Ok(Section::new(SECTION_NAME, items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::http_client;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_top_stories() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/svc/topstories/v2/home.json"))
            .and(query_param("api-key", "nyt-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "results": [
                    {"title": "First", "url": "https://nytimes.com/1", "section": "us"},
                    {"title": "Second", "url": "https://nytimes.com/2", "section": "world"},
                    {"title": "Third", "url": "https://nytimes.com/3", "section": "arts"}
                ]
            })))
            .mount(&server)
            .await;

        let client = http_client(Duration::from_secs(5)).unwrap();
        let section = fetch(&client, &server.uri(), "nyt-key", 2).await.unwrap();

        assert_eq!(section.name, "New York Times");
        assert_eq!(
            section.items,
            vec![
                CanonicalItem::new("First", "https://nytimes.com/1"),
                CanonicalItem::new("Second", "https://nytimes.com/2"),
            ]
        );
    }

    #[tokio::test]
    async fn test_rejected_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/svc/topstories/v2/home.json"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = http_client(Duration::from_secs(5)).unwrap();
        let err = fetch(&client, &server.uri(), "bad", 5).await.unwrap_err();

        // The key must not leak into the error message
        assert!(!err.to_string().contains("bad"));
        assert!(matches!(err, FetchError::Status { .. }));
    }
}
