//! The Fetcher (spec §4.3): builds a search query from the company
//! profile and catalog, calls an external [`NewsSource`], and pushes
//! validated, deduplicated articles onto `normalized_events`.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::dedup::{fingerprint, DedupIndex};
use crate::domain::CompanyProfile;
use crate::errors::Result;
use crate::stream::{self, StreamBus, STREAM_NORMALIZED_EVENTS};

use super::normalizer::{self, RawRecord};

/// An external source of raw news records. Implementations own the HTTP
/// client and any source-specific error translation; `fetch` returning
/// `Err` means "this cycle failed, try again next tick" (spec §4.3: the
/// cycle ends cleanly on outbound HTTP failure, the next tick retries).
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self, query: &str, max_articles: usize) -> Result<Vec<RawRecord>>;
    fn name(&self) -> &'static str;
}

/// Per-cycle outcome counts (spec §4.3: "Reports counts {fetched, new,
/// duplicates, invalid}").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchCounts {
    pub fetched: usize,
    pub new: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

/// Build the search query: top-N (N=5) keywords, in priority order
/// `[company_name, top suppliers by supply_volume_pct, critical
/// materials, key geographies]`, joined with `OR` and quoted (spec §4.3).
/// Suppliers are ranked across all tiers, not just tier 1 — §4.4's
/// relevance-anchor keyword set is the one restricted to tier-1.
pub fn build_query(company: &CompanyProfile, catalog: &Catalog) -> String {
    const TOP_N: usize = 5;
    let mut keywords = vec![company.name.clone()];

    let mut suppliers: Vec<_> = catalog.all().to_vec();
    suppliers.sort_by(|a, b| {
        b.supply_volume_pct
            .partial_cmp(&a.supply_volume_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    keywords.extend(suppliers.into_iter().map(|s| s.name.clone()));

    let mut materials: Vec<_> = company.material_criticality.iter().collect();
    materials.sort_by(|a, b| b.1.cmp(a.1));
    keywords.extend(materials.into_iter().map(|(m, _)| m.clone()));

    keywords.extend(company.key_geographies.iter().cloned());

    keywords
        .into_iter()
        .take(TOP_N)
        .map(|kw| format!("\"{kw}\""))
        .collect::<Vec<_>>()
        .join(" OR ")
}

pub struct Fetcher<S, D, B> {
    source: S,
    dedup: D,
    bus: B,
    dedup_ttl_secs: u64,
}

impl<S: NewsSource, D: DedupIndex, B: StreamBus> Fetcher<S, D, B> {
    pub fn new(source: S, dedup: D, bus: B, dedup_ttl_secs: u64) -> Self {
        Self {
            source,
            dedup,
            bus,
            dedup_ttl_secs,
        }
    }

    /// Run one fetch cycle (spec §4.3). Never returns an error for a
    /// failed outbound call — that is logged and folded into an empty
    /// [`FetchCounts`], since the next scheduled tick retries.
    pub async fn run_cycle(
        &self,
        company: &CompanyProfile,
        catalog: &Catalog,
        max_articles: usize,
    ) -> FetchCounts {
        let query = build_query(company, catalog);
        let raw_records = match self.source.fetch(&query, max_articles).await {
            Ok(records) => records,
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "fetch cycle failed, will retry next tick");
                return FetchCounts::default();
            }
        };

        let mut counts = FetchCounts {
            fetched: raw_records.len(),
            ..FetchCounts::default()
        };

        for raw in &raw_records {
            let article = normalizer::normalize(raw, self.source.name());

            if let Err(reason) = article.validate() {
                warn!(reason = %reason, "dropping invalid article before dedup");
                counts.invalid += 1;
                continue;
            }

            let fp = fingerprint(&article.headline, &article.body);
            let novel = match self.dedup.try_insert(&fp, self.dedup_ttl_secs).await {
                Ok(n) => n,
                Err(e) => {
                    warn!(error = %e, "dedup check failed, treating as duplicate to avoid double-processing");
                    false
                }
            };
            if !novel {
                counts.duplicates += 1;
                continue;
            }

            if let Err(e) = stream::publish(&self.bus, STREAM_NORMALIZED_EVENTS, &article).await {
                warn!(error = %e, "failed to publish normalized article, dropping");
                continue;
            }
            counts.new += 1;
        }

        info!(
            fetched = counts.fetched,
            new = counts.new,
            duplicates = counts.duplicates,
            invalid = counts.invalid,
            "fetch cycle complete"
        );
        counts
    }
}
