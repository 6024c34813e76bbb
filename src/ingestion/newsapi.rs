//! NewsAPI-style HTTP connector: the concrete [`NewsSource`] the Fetcher
//! talks to in production. GET with an API-key header, matching the
//! shape of [`crate::llm::gemini::GeminiClient`]'s HTTP client so the
//! two external connectors read the same way.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::{PipelineError, Result};

use super::fetcher::NewsSource;
use super::normalizer::RawRecord;

pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    articles: Vec<ApiArticle>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch(&self, query: &str, max_articles: usize) -> Result<Vec<RawRecord>> {
        let url = format!("{}/v2/everything", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("pageSize", &max_articles.to_string()),
                ("sortBy", "publishedAt"),
            ])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| PipelineError::transient("newsapi", e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::transient(
                "newsapi",
                format!("HTTP {}", response.status()),
            ));
        }

        let parsed: EverythingResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::malformed("newsapi", e.to_string()))?;

        Ok(parsed
            .articles
            .into_iter()
            .map(|a| RawRecord {
                title: a.title,
                body: a.content.or(a.description),
                url: a.url,
                published_at: a.published_at,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "NewsAPI"
    }
}
