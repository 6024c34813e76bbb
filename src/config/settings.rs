//! Service-level settings sourced from the environment: connection strings,
//! API keys, and tunable intervals/thresholds. Loaded once at startup and
//! threaded through the worker context explicitly.

use crate::errors::PipelineError;

/// Environment-sourced service configuration (spec §5/§6/§7).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Redis connection URL for the stream bus and dedup index.
    pub redis_url: String,
    /// Postgres connection URL for the document store.
    pub database_url: String,
    /// API key for the LLM provider (risk extraction, embeddings).
    pub llm_api_key: String,
    /// Base URL for the LLM provider, overridable for testing against a mock.
    pub llm_base_url: String,
    /// Minimum cosine similarity for an article to be considered relevant.
    /// Default: 0.35 (spec §4.4).
    pub relevance_threshold: f64,
    /// Minimum `risk_score` for an `Alert` to be synthesized (spec §4.9).
    /// Default: 3.0 — the low/medium boundary.
    pub alert_threshold: f64,
    /// Fetcher polling interval in seconds. Default: 900 (15 minutes).
    pub fetch_interval_secs: u64,
    /// Dedup fingerprint TTL in seconds. Default: 48 hours (spec).
    pub dedup_ttl_secs: u64,
    /// Propagation attenuation floor below which a hop is dropped (spec §4.7).
    /// Default: 1.0.
    pub propagation_threshold: f64,
    /// Consumer group read batch size.
    pub stream_batch_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            database_url: String::new(),
            llm_api_key: String::new(),
            llm_base_url: "https://generativelanguage.googleapis.com".to_string(),
            relevance_threshold: 0.35,
            alert_threshold: 3.0,
            fetch_interval_secs: 900,
            dedup_ttl_secs: 48 * 3600,
            propagation_threshold: 1.0,
            stream_batch_size: 10,
        }
    }
}

impl Settings {
    /// Load from environment variables, falling back to defaults.
    ///
    /// `LLM_API_KEY` is mandatory in release builds — a pipeline that
    /// cannot call the LLM cannot do risk extraction, so this is a fatal
    /// startup error rather than a degraded mode. Debug builds warn and
    /// fall back to an empty key, useful when running entirely against
    /// mocked LLM clients in tests.
    pub fn from_env() -> Result<Self, PipelineError> {
        let mut settings = Self::default();

        if let Ok(v) = std::env::var("REDIS_URL") {
            settings.redis_url = v;
        }
        settings.database_url = std::env::var("DATABASE_URL").unwrap_or_default();

        settings.llm_api_key = match std::env::var("LLM_API_KEY") {
            Ok(key) => key,
            Err(_) => {
                if cfg!(debug_assertions) {
                    tracing::warn!(
                        "LLM_API_KEY not set, using empty key — do NOT use in production"
                    );
                    String::new()
                } else {
                    return Err(PipelineError::Config(
                        "LLM_API_KEY environment variable is not set. The pipeline cannot \
                         perform risk extraction without it."
                            .to_string(),
                    ));
                }
            }
        };

        if let Ok(v) = std::env::var("LLM_BASE_URL") {
            settings.llm_base_url = v;
        }
        if let Ok(v) = std::env::var("RELEVANCE_THRESHOLD") {
            settings.relevance_threshold = v.parse().unwrap_or(settings.relevance_threshold);
        }
        if let Ok(v) = std::env::var("ALERT_THRESHOLD") {
            settings.alert_threshold = v.parse().unwrap_or(settings.alert_threshold);
        }
        if let Ok(v) = std::env::var("FETCH_INTERVAL_SECS") {
            settings.fetch_interval_secs = v.parse().unwrap_or(settings.fetch_interval_secs);
        }
        if let Ok(v) = std::env::var("DEDUP_TTL_SECS") {
            settings.dedup_ttl_secs = v.parse().unwrap_or(settings.dedup_ttl_secs);
        }
        if let Ok(v) = std::env::var("PROPAGATION_THRESHOLD") {
            settings.propagation_threshold = v.parse().unwrap_or(settings.propagation_threshold);
        }
        if let Ok(v) = std::env::var("STREAM_BATCH_SIZE") {
            settings.stream_batch_size = v.parse().unwrap_or(settings.stream_batch_size);
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_values() {
        let s = Settings::default();
        assert_eq!(s.alert_threshold, 3.0);
        assert_eq!(s.fetch_interval_secs, 900);
        assert_eq!(s.propagation_threshold, 1.0);
    }
}
