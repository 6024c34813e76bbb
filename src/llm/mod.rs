//! LLM integration: structured risk extraction and text embeddings
//! (spec §4.5). [`LlmClient`] is the extraction-facing trait; the
//! embedding side is [`crate::relevance::EmbeddingClient`], implemented
//! by the same concrete client in [`gemini`].

pub mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// The raw JSON-shaped extraction result the LLM is prompted to return
/// (spec §4.5). Fields are kept as strings at this layer; mapping
/// unrecognized values to `Other`/`Uncertain` happens in
/// [`crate::risk_extraction`], not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExtraction {
    pub is_risk: bool,
    pub risk_type: String,
    #[serde(default)]
    pub affected_entities: Vec<String>,
    #[serde(default)]
    pub affected_supply_chain_nodes: Vec<String>,
    pub severity: String,
    pub is_confirmed: String,
    pub time_horizon: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub recommended_action: String,
}

/// Model tier selected by the caller (spec §4.5: Pro for complex
/// geopolitical analysis, Flash otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Flash,
    Pro,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run structured risk extraction over `prompt`, returning the raw
    /// (still string-typed) extraction JSON.
    async fn extract_risk(&self, prompt: &str, tier: ModelTier) -> Result<RawExtraction>;

    /// Free-form text completion for the alert recommendation narrative
    /// (spec §4.8). Unlike [`Self::extract_risk`] the response isn't
    /// asked to be JSON, just prose.
    async fn generate_text(&self, prompt: &str, tier: ModelTier) -> Result<String>;
}

/// Lets workers hold a single `Arc<dyn LlmClient>` and still construct
/// owned-generic helpers like [`crate::risk_extraction::RiskExtractor`]
/// that expect `L: LlmClient` by value.
#[async_trait]
impl LlmClient for std::sync::Arc<dyn LlmClient> {
    async fn extract_risk(&self, prompt: &str, tier: ModelTier) -> Result<RawExtraction> {
        self.as_ref().extract_risk(prompt, tier).await
    }

    async fn generate_text(&self, prompt: &str, tier: ModelTier) -> Result<String> {
        self.as_ref().generate_text(prompt, tier).await
    }
}
