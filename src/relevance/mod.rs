//! Semantic relevance filtering (spec §4.4): a cheap embedding-based
//! pre-filter that keeps expensive LLM calls off content that has
//! nothing to do with the company's supply chain.

use async_trait::async_trait;

use crate::domain::{Article, CompanyProfile};
use crate::errors::Result;

/// Embedding provider used for relevance scoring. Kept separate from
/// [`crate::llm::LlmClient`] since a deployment might use a cheaper,
/// dedicated embeddings endpoint.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f64>>;
}

/// Lets workers hold a single `Arc<dyn EmbeddingClient>` and still
/// construct owned-generic helpers like [`RelevanceFilter`] that expect
/// `E: EmbeddingClient` by value.
#[async_trait]
impl EmbeddingClient for std::sync::Arc<dyn EmbeddingClient> {
    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        self.as_ref().embed(text).await
    }
}

/// Cosine similarity between two equal-length vectors. Returns `0.0` for
/// empty or mismatched-length inputs, or when either magnitude is zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

/// Build the keyword set used as the relevance "anchor" (spec §4.4):
/// company name, top-5 tier-1 suppliers by supply volume, top-3
/// materials by criticality, top-3 key geographies.
pub fn build_company_keywords(company: &CompanyProfile, suppliers: &[&crate::domain::Supplier]) -> Vec<String> {
    let mut keywords = vec![company.name.clone()];

    let mut tier1: Vec<_> = suppliers.iter().filter(|s| s.tier == 1).collect();
    tier1.sort_by(|a, b| {
        b.supply_volume_pct
            .partial_cmp(&a.supply_volume_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    keywords.extend(tier1.into_iter().take(5).map(|s| s.name.clone()));

    let mut materials: Vec<_> = company.material_criticality.iter().collect();
    materials.sort_by(|a, b| b.1.cmp(a.1));
    keywords.extend(materials.into_iter().take(3).map(|(m, _)| m.clone()));

    keywords.extend(company.key_geographies.iter().take(3).cloned());

    keywords
}

/// Filters articles by embedding-similarity to the company's keyword
/// anchor. On embedding failure, fails open with a default score of 0.5
/// (spec §4.4) rather than blocking the pipeline on an LLM outage.
pub struct RelevanceFilter<E> {
    embeddings: E,
    threshold: f64,
}

const DEFAULT_SCORE_ON_FAILURE: f64 = 0.5;

impl<E: EmbeddingClient> RelevanceFilter<E> {
    pub fn new(embeddings: E, threshold: f64) -> Self {
        Self {
            embeddings,
            threshold,
        }
    }

    /// Score an article's relevance against `keywords`. Returns
    /// `(is_relevant, score)`.
    pub async fn is_relevant(&self, article: &Article, keywords: &[String]) -> (bool, f64) {
        let score = self.score(article, keywords).await;
        (score >= self.threshold, score)
    }

    async fn score(&self, article: &Article, keywords: &[String]) -> f64 {
        let article_text = article.text(1000);
        let keyword_text = keywords.join(" ");

        let article_embedding = match self.embeddings.embed(&article_text).await {
            Ok(v) => v,
            Err(_) => return DEFAULT_SCORE_ON_FAILURE,
        };
        let keyword_embedding = match self.embeddings.embed(&keyword_text).await {
            Ok(v) => v,
            Err(_) => return DEFAULT_SCORE_ON_FAILURE,
        };

        cosine_similarity(&article_embedding, &keyword_embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    struct StubEmbeddings {
        vector: Vec<f64>,
        fail: bool,
    }

    #[async_trait]
    impl EmbeddingClient for StubEmbeddings {
        async fn embed(&self, _text: &str) -> Result<Vec<f64>> {
            if self.fail {
                Err(crate::errors::PipelineError::transient("embeddings", "down"))
            } else {
                Ok(self.vector.clone())
            }
        }
    }

    fn article() -> Article {
        Article {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: "NewsAPI".to_string(),
            headline: "Port closure disrupts shipping lanes".to_string(),
            body: "Details".to_string(),
            url: "https://example.com".to_string(),
            processed: false,
            risk_extracted: false,
            risk_event_id: None,
        }
    }

    #[test]
    fn cosine_similarity_identical_vectors_is_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_similarity_orthogonal_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn embedding_failure_fails_open_at_default_score() {
        let filter = RelevanceFilter::new(
            StubEmbeddings {
                vector: vec![],
                fail: true,
            },
            0.9,
        );
        let (relevant, score) = filter.is_relevant(&article(), &["steel".to_string()]).await;
        assert_eq!(score, DEFAULT_SCORE_ON_FAILURE);
        assert!(!relevant); // 0.5 < 0.9 threshold
    }

    #[tokio::test]
    async fn identical_embeddings_pass_a_low_threshold() {
        let filter = RelevanceFilter::new(
            StubEmbeddings {
                vector: vec![1.0, 1.0],
                fail: false,
            },
            0.5,
        );
        let (relevant, score) = filter.is_relevant(&article(), &["steel".to_string()]).await;
        assert!(relevant);
        assert!((score - 1.0).abs() < 1e-9);
    }
}
