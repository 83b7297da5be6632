use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::NewsArticle;
use crate::provider::truncate_body;

const BASE_URL: &str = "https://newsapi.org/v2/top-headlines";
const PAGE_SIZE: u8 = 3;

#[async_trait]
pub trait NewsClient: Send + Sync {
    /// Top headlines for a two-letter country code.
    async fn top_headlines(&self, country_code: &str) -> Result<Vec<NewsArticle>>;
}

/// Top headlines from NewsAPI. Requires an API key.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    api_key: String,
    http: Client,
}

impl NewsApiClient {
    pub fn new(api_key: String) -> Self {
        Self { api_key, http: Client::new() }
    }

    fn build_url(&self, country_code: &str) -> String {
        format!("{BASE_URL}?pageSize={PAGE_SIZE}&country={country_code}&apiKey={}", self.api_key)
    }
}

#[async_trait]
impl NewsClient for NewsApiClient {
    async fn top_headlines(&self, country_code: &str) -> Result<Vec<NewsArticle>> {
        let url = self.build_url(country_code);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to NewsAPI")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read NewsAPI response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "NewsAPI request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: NaResponse =
            serde_json::from_str(&body).context("Failed to parse NewsAPI JSON")?;

        Ok(parsed
            .articles
            .into_iter()
            .map(|a| NewsArticle { title: a.title, source: a.source.name, url: a.url })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct NaSource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct NaArticle {
    title: String,
    url: String,
    source: NaSource,
}

#[derive(Debug, Deserialize)]
struct NaResponse {
    #[serde(default)]
    articles: Vec<NaArticle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_fixed() {
        assert_eq!(BASE_URL, "https://newsapi.org/v2/top-headlines");
    }

    #[test]
    fn url_carries_page_size_country_and_key() {
        let client = NewsApiClient::new("SECRET".to_string());

        assert_eq!(
            client.build_url("test"),
            "https://newsapi.org/v2/top-headlines?pageSize=3&country=test&apiKey=SECRET"
        );
    }

    #[test]
    fn articles_map_to_model() {
        let json = r#"{
            "status": "ok",
            "articles": [
                { "title": "Headline", "url": "https://example.com/a", "source": { "name": "Example" } }
            ]
        }"#;
        let parsed: NaResponse = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.articles.len(), 1);
        assert_eq!(parsed.articles[0].source.name, "Example");
    }
}
