//! The stream bus: at-least-once delivery between pipeline stages
//! (spec §4.1/§9). Five named streams carry JSON payloads; consumer
//! groups give each stage's worker pool competing-consumer semantics —
//! every record is claimed by exactly one worker within a group, but
//! redelivered to another worker if not acked.
//!
//! [`StreamBus`] itself is object-safe (it moves `serde_json::Value`, not
//! generic payloads) so workers can hold it as `Arc<dyn StreamBus>`.
//! [`publish`] and [`Record::decode`] are the typed convenience layer
//! built on top.
//!
//! Two implementations: [`redis_bus::RedisStreamBus`] for production,
//! [`inmemory::InMemoryStreamBus`] as a test double that never talks to a
//! real Redis.

pub mod inmemory;
pub mod redis_bus;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::{PipelineError, Result};

/// Stream name: raw articles as fetched, pre-normalization.
pub const STREAM_RAW_EVENTS: &str = "raw_events";
/// Stream name: normalized, deduplicated articles awaiting risk extraction.
pub const STREAM_NORMALIZED_EVENTS: &str = "normalized_events";
/// Stream name: LLM-extracted risk entities awaiting scoring.
pub const STREAM_RISK_ENTITIES: &str = "risk_entities";
/// Stream name: scored risk events awaiting propagation + alerting.
pub const STREAM_RISK_SCORES: &str = "risk_scores";
/// Stream name: synthesized alerts awaiting notification.
pub const STREAM_NEW_ALERTS: &str = "new_alerts";

/// Consumer group name for the risk-extraction worker pool.
pub const GROUP_RISK_EXTRACTION: &str = "risk_extraction_group";
/// Consumer group name for the scoring worker pool.
pub const GROUP_RISK_SCORING: &str = "risk_scoring_group";
/// Consumer group name for the alert-generation worker pool.
pub const GROUP_ALERT_GENERATION: &str = "alert_generation_group";

/// Default maximum stream length; streams are trimmed (approximate) after
/// each publish so they never grow unbounded (spec §9).
pub const DEFAULT_MAXLEN: usize = 100_000;

/// A stream record handed back to a consumer: its opaque id (needed to
/// ack it) and the raw JSON payload.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: String,
    pub payload: Value,
}

impl Record {
    /// Decode the payload into a concrete type. A decode failure is
    /// treated as a malformed-external error by callers — the record
    /// should be logged and acked, not retried forever.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.payload.clone())
            .map_err(|e| PipelineError::malformed("stream_record", e.to_string()))
    }
}

/// Transport for the five named streams. Implementations must provide
/// at-least-once delivery: a record is redelivered to some consumer in
/// the group until it is acked.
#[async_trait]
pub trait StreamBus: Send + Sync {
    /// Publish a JSON payload to `stream`, trimming the stream to
    /// approximately [`DEFAULT_MAXLEN`] afterward. Returns the new
    /// entry's stream id.
    async fn publish_value(&self, stream: &str, payload: Value) -> Result<String>;

    /// Ensure `group` exists on `stream`, creating both if necessary.
    /// Idempotent: an existing group is left untouched.
    async fn ensure_group(&self, stream: &str, group: &str) -> Result<()>;

    /// Read up to `count` new records for `consumer` in `group` on
    /// `stream`, blocking up to `block_ms` if none are immediately
    /// available. Returns an empty vec on timeout, never an error.
    async fn read_group(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        count: usize,
        block_ms: u64,
    ) -> Result<Vec<Record>>;

    /// Acknowledge a record, removing it from the group's pending list.
    async fn ack(&self, stream: &str, group: &str, id: &str) -> Result<()>;
}

/// Serialize `payload` and publish it — the typed convenience wrapper
/// used by pipeline stages instead of calling [`StreamBus::publish_value`]
/// directly.
pub async fn publish<T: Serialize + Sync>(
    bus: &(impl StreamBus + ?Sized),
    stream: &str,
    payload: &T,
) -> Result<String> {
    let value = serde_json::to_value(payload)
        .map_err(|e| PipelineError::Invariant(format!("payload did not serialize: {e}")))?;
    bus.publish_value(stream, value).await
}
