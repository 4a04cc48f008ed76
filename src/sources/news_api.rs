//! News outlets via the News API `/v1/articles` endpoint.
//!
//! One request per outlet; the section is named after the outlet's source id.

use crate::error::FetchError;
use crate::models::{CanonicalItem, Section};
use crate::sources::get_json;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiItem>,
}

#[derive(Debug, Deserialize)]
struct NewsApiItem {
    title: String,
    url: String,
}

impl NewsApiItem {
    fn standardize(self) -> CanonicalItem {
        CanonicalItem::new(self.title, self.url)
    }
}

/// Fetch the top `count` articles for one News API source id.
#[instrument(level = "info", skip(client, api_key))]
pub async fn fetch(
    client: &Client,
    base: &str,
    source: &str,
    api_key: &str,
    count: usize,
) -> Result<Section, FetchError> {
    let url = format!("{base}/v1/articles");
    let request = client.get(&url).query(&[
        ("source", source),
        ("apiKey", api_key),
        ("sortBy", "top"),
    ]);
    let response: NewsApiResponse = get_json(request, &url).await?;

    if response.status != "ok" {
        return Err(FetchError::Api {
            service: "News API",
            message: response
                .message
                .unwrap_or_else(|| format!("status {}", response.status)),
        });
    }

    let items: Vec<CanonicalItem> = response
        .articles
        .into_iter()
        .take(count)
        .map(NewsApiItem::standardize)
        .collect();
    info!(count = items.len(), "Fetched News API articles");
    Ok(Section::new(source, items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::http_client;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> Client {
        http_client(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_articles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/articles"))
            .and(query_param("source", "bbc-news"))
            .and(query_param("apiKey", "news-key"))
            .and(query_param("sortBy", "top"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "source": "bbc-news",
                "articles": [
                    {"author": "BBC", "title": "One", "url": "https://bbc.co.uk/1"},
                    {"author": "BBC", "title": "Two", "url": "https://bbc.co.uk/2"}
                ]
            })))
            .mount(&server)
            .await;

        let section = fetch(&client(), &server.uri(), "bbc-news", "news-key", 10)
            .await
            .unwrap();

        assert_eq!(section.name, "bbc-news");
        assert_eq!(section.items.len(), 2);
        assert!(section.items.iter().all(|i| i.comments_url().is_none()));
    }

    #[tokio::test]
    async fn test_error_payload_fails_the_source() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "code": "sourceDoesntExist",
                "message": "The news source you've entered doesn't exist."
            })))
            .mount(&server)
            .await;

        let err = fetch(&client(), &server.uri(), "nope", "news-key", 10)
            .await
            .unwrap_err();

        match err {
            FetchError::Api { service, message } => {
                assert_eq!(service, "News API");
                assert!(message.contains("doesn't exist"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_article_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/articles"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "articles": []})),
            )
            .mount(&server)
            .await;

        let section = fetch(&client(), &server.uri(), "reuters", "news-key", 10)
            .await
            .unwrap();
        assert_eq!(section.name, "reuters");
        assert!(section.items.is_empty());
    }
}
