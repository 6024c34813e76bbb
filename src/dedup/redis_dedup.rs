//! Redis-backed [`DedupIndex`] using `SET NX EX` — a single round trip,
//! atomic by construction.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::errors::{PipelineError, Result};

use super::DedupIndex;

pub struct RedisDedupIndex {
    conn: ConnectionManager,
}

impl RedisDedupIndex {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| PipelineError::Config(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| PipelineError::transient("redis", e.to_string()))?;
        Ok(Self { conn })
    }

    fn key(fp: &str) -> String {
        format!("dedup:{fp}")
    }
}

#[async_trait]
impl DedupIndex for RedisDedupIndex {
    async fn try_insert(&self, fp: &str, ttl_secs: u64) -> Result<bool> {
        let mut conn = self.conn.clone();
        let result: Option<String> = redis::cmd("SET")
            .arg(Self::key(fp))
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e| PipelineError::transient("redis", e.to_string()))?;
        Ok(result.is_some())
    }
}
