//! Crate-wide error taxonomy
//!
//! Six kinds, matching the failure-handling policy: transient failures are
//! retried (by not acking a stream record), malformed external payloads are
//! dropped after logging, validation/not-found failures are counted and
//! skipped, config errors are fatal at startup, and invariant violations are
//! clamped in production but panic in development.

use thiserror::Error;

/// Errors surfaced by pipeline components.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Network, 5xx, or rate-limit failure from an external dependency
    /// (news API, embedding service, LLM, stream broker). The caller must
    /// NOT ack the triggering record — redelivery will retry it.
    #[error("transient failure calling {dependency}: {message}")]
    TransientExternal {
        dependency: &'static str,
        message: String,
    },

    /// Invalid JSON or schema from an external payload (LLM response,
    /// news-source record). The triggering record is dropped and acked —
    /// never retried, since retrying won't fix a malformed payload.
    #[error("malformed payload from {source}: {message}")]
    MalformedExternal {
        source: &'static str,
        message: String,
    },

    /// A record failed local validation before being accepted into the
    /// pipeline (e.g. an Article missing a required field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced entity (most commonly a supplier name from an LLM
    /// extraction) could not be resolved against the current catalog.
    #[error("not found: {0}")]
    NotFound(String),

    /// Startup configuration is missing or invalid. Fatal — the caller
    /// should exit non-zero.
    #[error("configuration error: {0}")]
    Config(String),

    /// An internal invariant was violated (e.g. a score component computed
    /// outside its documented range). In development this is surfaced as a
    /// panic; in production the caller clamps the value and logs this
    /// error as a metric instead of propagating it.
    #[error("invariant violation: {0}")]
    Invariant(String),
}

impl PipelineError {
    pub fn transient(dependency: &'static str, message: impl Into<String>) -> Self {
        Self::TransientExternal {
            dependency,
            message: message.into(),
        }
    }

    pub fn malformed(source: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedExternal {
            source,
            message: message.into(),
        }
    }

    /// Whether the triggering stream record should be acked (consumed) or
    /// left pending for redelivery.
    pub fn should_ack(&self) -> bool {
        !matches!(self, PipelineError::TransientExternal { .. })
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
