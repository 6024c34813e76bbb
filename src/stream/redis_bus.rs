//! Redis Streams-backed [`StreamBus`].
//!
//! Mirrors the semantics of a hand-rolled `XADD`/`XGROUP CREATE`/
//! `XREADGROUP`/`XACK`/`XTRIM` client: every publish is trimmed
//! (approximate) to [`DEFAULT_MAXLEN`], every group is created with
//! `MKSTREAM` and tolerates `BUSYGROUP` (already exists), and reads
//! block for `block_ms` before returning empty rather than erroring.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::streams::{StreamReadOptions, StreamReadReply};
use redis::{AsyncCommands, RedisError};
use serde_json::Value;

use crate::errors::{PipelineError, Result};

use super::{Record, StreamBus, DEFAULT_MAXLEN};

pub struct RedisStreamBus {
    conn: ConnectionManager,
}

impl RedisStreamBus {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| PipelineError::Config(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| transient(&e))?;
        Ok(Self { conn })
    }
}

fn transient(e: &RedisError) -> PipelineError {
    PipelineError::transient("redis", e.to_string())
}

#[async_trait]
impl StreamBus for RedisStreamBus {
    async fn publish_value(&self, stream: &str, payload: Value) -> Result<String> {
        let serialized = payload
            .as_object()
            .ok_or_else(|| PipelineError::Invariant("stream payload must be a JSON object".to_string()))?
            .iter()
            .map(|(k, v)| {
                let s = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), s)
            })
            .collect::<Vec<(String, String)>>();

        let mut conn = self.conn.clone();
        let id: String = conn
            .xadd(stream, "*", &serialized)
            .await
            .map_err(|e| transient(&e))?;

        // Best-effort; trimming is advisory and never fails the publish.
        let _: std::result::Result<i64, RedisError> = conn
            .xtrim(
                stream,
                redis::streams::StreamMaxlen::Approx(DEFAULT_MAXLEN),
            )
            .await;

        Ok(id)
    }

    async fn ensure_group(&self, stream: &str, group: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let result: std::result::Result<(), RedisError> =
            conn.xgroup_create_mkstream(stream, group, "$").await;
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.to_string().contains("BUSYGROUP") => Ok(()),
            Err(e) => Err(transient(&e)),
        }
    }

    async fn read_group(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        count: usize,
        block_ms: u64,
    ) -> Result<Vec<Record>> {
        let mut conn = self.conn.clone();
        let opts = StreamReadOptions::default()
            .group(group, consumer)
            .count(count)
            .block(block_ms as usize);

        let reply: StreamReadReply = conn
            .xread_options(&[stream], &[">"], &opts)
            .await
            .map_err(|e| transient(&e))?;

        let mut records = Vec::new();
        for stream_key in reply.keys {
            for entry in stream_key.ids {
                let mut obj = serde_json::Map::new();
                for (field, value) in entry.map {
                    let as_string: String = redis::FromRedisValue::from_redis_value(&value)
                        .unwrap_or_default();
                    let parsed =
                        serde_json::from_str(&as_string).unwrap_or(Value::String(as_string));
                    obj.insert(field, parsed);
                }
                records.push(Record {
                    id: entry.id,
                    payload: Value::Object(obj),
                });
            }
        }
        Ok(records)
    }

    async fn ack(&self, stream: &str, group: &str, id: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.xack(stream, group, &[id]).await.map_err(|e| transient(&e))?;
        Ok(())
    }
}
