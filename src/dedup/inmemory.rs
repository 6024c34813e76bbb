//! In-process [`DedupIndex`] test double with manual TTL expiry — no
//! background sweeper, expiry is checked lazily on access.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::errors::Result;

use super::DedupIndex;

#[derive(Default)]
pub struct InMemoryDedupIndex {
    seen: Mutex<HashMap<String, Instant>>,
}

impl InMemoryDedupIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DedupIndex for InMemoryDedupIndex {
    async fn try_insert(&self, fp: &str, ttl_secs: u64) -> Result<bool> {
        let mut seen = self.seen.lock().unwrap();
        let now = Instant::now();
        if let Some(expires_at) = seen.get(fp) {
            if *expires_at > now {
                return Ok(false);
            }
        }
        seen.insert(fp.to_string(), now + Duration::from_secs(ttl_secs));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_insert_is_novel_second_is_duplicate() {
        let idx = InMemoryDedupIndex::new();
        assert!(idx.try_insert("abc", 3600).await.unwrap());
        assert!(!idx.try_insert("abc", 3600).await.unwrap());
    }

    #[tokio::test]
    async fn distinct_fingerprints_are_independent() {
        let idx = InMemoryDedupIndex::new();
        assert!(idx.try_insert("abc", 3600).await.unwrap());
        assert!(idx.try_insert("xyz", 3600).await.unwrap());
    }
}
