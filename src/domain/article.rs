use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A news item after normalization into the pipeline's canonical schema.
///
/// Invariant 1 (spec §3): an `Article` is persisted only after relevance
/// acceptance and LLM classification as a risk; non-risk articles are
/// marked `processed` without a [`crate::domain::RiskEvent`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub headline: String,
    pub body: String,
    pub url: String,
    pub processed: bool,
    pub risk_extracted: bool,
    pub risk_event_id: Option<Uuid>,
}

impl Article {
    /// Required-field validation applied by the Fetcher before dedup
    /// (spec §4.3 step 2): non-empty `event_id`/`source`/`url`, `headline`
    /// at least 10 characters.
    pub fn validate(&self) -> Result<(), String> {
        if self.source.trim().is_empty() {
            return Err("article missing source".to_string());
        }
        if self.url.trim().is_empty() {
            return Err("article missing url".to_string());
        }
        if self.headline.trim().chars().count() < 10 {
            return Err("article headline shorter than 10 characters".to_string());
        }
        Ok(())
    }

    /// Combined headline+body text, truncated for embedding/LLM calls.
    pub fn text(&self, max_chars: usize) -> String {
        let combined = format!("{} {}", self.headline, self.body);
        combined.chars().take(max_chars).collect()
    }
}
