//! Gemini-style HTTP client: JSON-mode structured extraction plus a text
//! embedding endpoint, both over `reqwest`. Two model tiers share one
//! `reqwest::Client` and API key; `base_url` is overridable so tests can
//! point it at an HTTP mock instead of the real API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::errors::{PipelineError, Result};
use crate::relevance::EmbeddingClient;

use super::{LlmClient, ModelTier, RawExtraction};

const FLASH_MODEL: &str = "gemini-1.5-flash";
const PRO_MODEL: &str = "gemini-1.5-pro";
const EMBEDDING_MODEL: &str = "text-embedding-004";

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn model_name(tier: ModelTier) -> &'static str {
        match tier {
            ModelTier::Flash => FLASH_MODEL,
            ModelTier::Pro => PRO_MODEL,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: Embedding,
}

#[derive(Debug, Deserialize)]
struct Embedding {
    values: Vec<f64>,
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn extract_risk(&self, prompt: &str, tier: ModelTier) -> Result<RawExtraction> {
        let model = Self::model_name(tier);
        let url = format!(
            "{}/v1beta/models/{model}:generateContent?key={}",
            self.base_url, self.api_key
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "response_mime_type": "application/json",
                "temperature": 0.1,
            }
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::transient("gemini", e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::transient(
                "gemini",
                format!("HTTP {}", response.status()),
            ));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::malformed("gemini", e.to_string()))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| PipelineError::malformed("gemini", "empty candidates list"))?;

        serde_json::from_str(text)
            .map_err(|e| PipelineError::malformed("gemini", format!("invalid extraction JSON: {e}")))
    }

    async fn generate_text(&self, prompt: &str, tier: ModelTier) -> Result<String> {
        let model = Self::model_name(tier);
        let url = format!(
            "{}/v1beta/models/{model}:generateContent?key={}",
            self.base_url, self.api_key
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0.5,
            }
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::transient("gemini", e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::transient(
                "gemini",
                format!("HTTP {}", response.status()),
            ));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::malformed("gemini", e.to_string()))?;

        parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .ok_or_else(|| PipelineError::malformed("gemini", "empty candidates list"))
    }
}

#[async_trait]
impl EmbeddingClient for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let url = format!(
            "{}/v1beta/models/{EMBEDDING_MODEL}:embedContent?key={}",
            self.base_url, self.api_key
        );

        let body = json!({
            "model": format!("models/{EMBEDDING_MODEL}"),
            "content": { "parts": [{ "text": text }] },
            "taskType": "SEMANTIC_SIMILARITY",
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::transient("gemini_embeddings", e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::transient(
                "gemini_embeddings",
                format!("HTTP {}", response.status()),
            ));
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::malformed("gemini_embeddings", e.to_string()))?;

        Ok(parsed.embedding.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn extract_risk_parses_json_mode_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path_contains("generateContent");
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": {
                        "parts": [{
                            "text": json!({
                                "is_risk": true,
                                "risk_type": "geopolitical",
                                "affected_entities": ["Rotterdam"],
                                "affected_supply_chain_nodes": ["Acme Steel"],
                                "severity": "high",
                                "is_confirmed": "true",
                                "time_horizon": "days",
                                "reasoning": "port closure",
                                "recommended_action": "find alternate route"
                            }).to_string()
                        }]
                    }
                }]
            }));
        });

        let client = GeminiClient::new(server.base_url(), "test-key");
        let extraction = client
            .extract_risk("analyze this article", ModelTier::Flash)
            .await
            .unwrap();

        mock.assert();
        assert!(extraction.is_risk);
        assert_eq!(extraction.risk_type, "geopolitical");
        assert_eq!(extraction.affected_supply_chain_nodes, vec!["Acme Steel"]);
    }

    #[tokio::test]
    async fn embed_returns_embedding_values() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path_contains("embedContent");
            then.status(200)
                .json_body(json!({ "embedding": { "values": [0.1, 0.2, 0.3] } }));
        });

        let client = GeminiClient::new(server.base_url(), "test-key");
        let vector = client.embed("some text").await.unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn generate_text_returns_trimmed_candidate_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path_contains("generateContent");
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "  Engage an alternate supplier now.  " }] }
                }]
            }));
        });

        let client = GeminiClient::new(server.base_url(), "test-key");
        let text = client
            .generate_text("write a recommendation", ModelTier::Flash)
            .await
            .unwrap();
        assert_eq!(text, "Engage an alternate supplier now.");
    }

    #[tokio::test]
    async fn non_success_status_is_a_transient_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path_contains("generateContent");
            then.status(503);
        });

        let client = GeminiClient::new(server.base_url(), "test-key");
        let result = client.extract_risk("x", ModelTier::Pro).await;
        assert!(result.is_err());
    }
}
