//! Converts a raw external news record into a canonical [`Article`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::Article;

/// A single record as returned by a [`crate::llm`]-agnostic news source —
/// the shape is intentionally generic (title/body/url/published_at) so
/// any connector can produce it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
}

/// Normalize a raw record from `source` into a canonical [`Article`]
/// (spec §4.3 step 1). `source` is the connector's name (e.g. `"NewsAPI"`).
pub fn normalize(raw: &RawRecord, source: &str) -> Article {
    Article {
        event_id: Uuid::new_v4(),
        timestamp: parse_timestamp(raw.published_at.as_deref()),
        source: source.to_string(),
        headline: raw.title.clone().unwrap_or_default(),
        body: raw.body.clone().unwrap_or_default(),
        url: raw.url.clone().unwrap_or_default(),
        processed: false,
        risk_extracted: false,
        risk_event_id: None,
    }
}

fn parse_timestamp(ts: Option<&str>) -> DateTime<Utc> {
    match ts {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        None => Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_complete_record() {
        let raw = RawRecord {
            title: Some("Port closure disrupts shipping".to_string()),
            body: Some("A major port has closed".to_string()),
            url: Some("https://example.com/a".to_string()),
            published_at: Some("2026-01-15T08:00:00Z".to_string()),
        };
        let article = normalize(&raw, "NewsAPI");
        assert_eq!(article.source, "NewsAPI");
        assert_eq!(article.headline, "Port closure disrupts shipping");
        assert!(!article.processed);
        assert!(article.risk_event_id.is_none());
    }

    #[test]
    fn missing_timestamp_falls_back_to_now() {
        let raw = RawRecord {
            title: Some("Headline long enough".to_string()),
            body: None,
            url: Some("https://example.com".to_string()),
            published_at: None,
        };
        let before = Utc::now();
        let article = normalize(&raw, "GDELT");
        assert!(article.timestamp >= before);
    }
}
