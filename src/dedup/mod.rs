//! Content-fingerprint deduplication (spec §4.2). A fingerprint is the
//! MD5 hash of the lowercased headline plus the first 100 lowercased
//! characters of the body — stable across re-fetches of the same story
//! from different sources.
//!
//! `try_insert` is the only operation that matters: it must be atomic,
//! so that two fetchers racing on the same article never both observe
//! "novel". Everything else is bookkeeping.

pub mod inmemory;
pub mod redis_dedup;

use async_trait::async_trait;

use crate::domain::Article;
use crate::errors::Result;

/// `fingerprint(article) = md5(lowercase(headline) + " " + lowercase(body[:100]))`
/// (spec §4.2).
pub fn fingerprint(headline: &str, body: &str) -> String {
    let head = headline.to_lowercase().trim().to_string();
    let body_prefix: String = body.chars().take(100).collect::<String>().to_lowercase();
    let content = if body_prefix.is_empty() {
        head
    } else {
        format!("{head} {}", body_prefix.trim())
    };
    format!("{:x}", md5::compute(content.as_bytes()))
}

pub fn fingerprint_article(article: &Article) -> String {
    fingerprint(&article.headline, &article.body)
}

/// A set of content fingerprints with TTL (spec §4.2).
#[async_trait]
pub trait DedupIndex: Send + Sync {
    /// Atomically insert `fp` if absent. Returns `true` iff the key was
    /// newly created — the article is novel. Returns `false` if the key
    /// already existed — the article is a duplicate within `ttl`.
    async fn try_insert(&self, fp: &str, ttl_secs: u64) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_case_insensitive_on_headline() {
        let a = fingerprint("Port Closure In Rotterdam", "");
        let b = fingerprint("port closure in rotterdam", "");
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_incorporates_body_prefix() {
        let a = fingerprint("Same headline", "Body one is different");
        let b = fingerprint("Same headline", "Body two completely different");
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_ignores_body_past_100_chars() {
        let long_common_prefix = "x".repeat(100);
        let a = fingerprint("H", &format!("{long_common_prefix}tail-one"));
        let b = fingerprint("H", &format!("{long_common_prefix}tail-two"));
        assert_eq!(a, b);
    }
}
