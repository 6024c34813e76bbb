//! SupplierRanker (spec §4.9): scores alternate-supplier candidates by
//! seven weighted factors and returns them ranked, with a per-factor
//! breakdown for the alert UI. Grounded on
//! `recommender/supplier_finder.py`'s `score_alternate_supplier`.

use crate::catalog::Catalog;
use crate::domain::{AlternateRec, AlternateScoreBreakdown, Supplier, SupplierStatus};

const WEIGHT_GEO: f64 = 0.20;
const WEIGHT_CAPACITY: f64 = 0.25;
const WEIGHT_RELATIONSHIP: f64 = 0.20;
const WEIGHT_ESG: f64 = 0.10;
const WEIGHT_FINANCIAL: f64 = 0.10;
const WEIGHT_SWITCHING_COST: f64 = 0.05;
const WEIGHT_LEAD_TIME: f64 = 0.10;

pub struct SupplierRanker;

impl SupplierRanker {
    /// Rank every eligible candidate for replacing `disrupted`, returning
    /// up to `max_results` entries sorted by score descending with the
    /// documented tiebreak chain (spec §4.9, invariant 7 in §8).
    pub fn rank(
        catalog: &Catalog,
        disrupted: &Supplier,
        required_volume: f64,
        max_results: usize,
    ) -> Vec<AlternateRec> {
        let material = disrupted.primary_material();

        let mut scored: Vec<AlternateRec> = catalog
            .suppliers_for_material(material)
            .into_iter()
            .filter(|s| s.id != disrupted.id)
            .filter(|s| s.company_id == disrupted.company_id)
            .filter(|s| s.status.is_available())
            .map(|candidate| score_candidate(candidate, disrupted, required_volume))
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap()
                .then(a.lead_time_weeks.cmp(&b.lead_time_weeks))
                .then(b.approved_vendor.cmp(&a.approved_vendor))
                .then(a.name.cmp(&b.name))
        });
        scored.truncate(max_results);
        scored
    }
}

fn score_candidate(candidate: &Supplier, disrupted: &Supplier, required_volume: f64) -> AlternateRec {
    let geographic_diversity = if candidate.country != disrupted.country {
        1.0
    } else {
        0.3
    };

    let capacity = match candidate.max_capacity {
        Some(cap) if cap > 0.0 => (cap / required_volume).min(1.0),
        _ => 0.5,
    };

    let relationship = if candidate.approved_vendor {
        1.0
    } else if candidate.pre_qualified {
        0.8
    } else {
        0.4
    };

    let esg = candidate.esg_score / 100.0;
    let financial = candidate.financial_health_score / 10.0;
    let switching_cost = 1.0 - candidate.switching_cost_estimate / 10.0;
    let lead_time = 1.0 / (1.0 + candidate.lead_time_weeks as f64 / 4.0);

    let score = (geographic_diversity * WEIGHT_GEO
        + capacity * WEIGHT_CAPACITY
        + relationship * WEIGHT_RELATIONSHIP
        + esg * WEIGHT_ESG
        + financial * WEIGHT_FINANCIAL
        + switching_cost * WEIGHT_SWITCHING_COST
        + lead_time * WEIGHT_LEAD_TIME)
        * 10.0;

    AlternateRec {
        supplier_id: candidate.id.clone(),
        name: candidate.name.clone(),
        score: round2(score),
        lead_time_weeks: candidate.lead_time_weeks,
        approved_vendor: candidate.approved_vendor,
        country: candidate.country.clone(),
        capacity: candidate.max_capacity,
        esg_score: candidate.esg_score,
        score_breakdown: AlternateScoreBreakdown {
            geographic_diversity: round2(geographic_diversity),
            capacity: round2(capacity),
            relationship: round2(relationship),
            esg: round2(esg),
            financial: round2(financial),
            switching_cost: round2(switching_cost),
            lead_time: round2(lead_time),
        },
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// A lighter-weight lookup used outside of an active disruption: every
/// available supplier of `material`, sorted by current risk ascending
/// (lowest-risk first), without the full weighted scoring pass. Kept
/// distinct from [`SupplierRanker::rank`] because it has no disrupted
/// supplier or required volume to score against.
pub fn by_material<'a>(catalog: &'a Catalog, material: &str, exclude_id: Option<&str>, max_results: usize) -> Vec<&'a Supplier> {
    let mut candidates: Vec<&Supplier> = catalog
        .suppliers_for_material(material)
        .into_iter()
        .filter(|s| s.status.is_available())
        .filter(|s| exclude_id.map(|id| s.id != id).unwrap_or(true))
        .collect();
    candidates.sort_by(|a, b| {
        a.risk_score_current
            .partial_cmp(&b.risk_score_current)
            .unwrap()
            .then(a.name.cmp(&b.name))
    });
    candidates.truncate(max_results);
    candidates
}
