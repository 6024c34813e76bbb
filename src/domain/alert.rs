use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::risk_event::SeverityBand;

/// One ranked alternate-supplier candidate, as produced by
/// [`crate::alerts::ranker::SupplierRanker`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternateRec {
    pub supplier_id: String,
    pub name: String,
    pub score: f64,
    pub lead_time_weeks: u32,
    pub approved_vendor: bool,
    pub country: String,
    pub capacity: Option<f64>,
    pub esg_score: f64,
    pub score_breakdown: AlternateScoreBreakdown,
}

/// Per-factor score breakdown (spec §4.9), each already normalized to `[0,1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlternateScoreBreakdown {
    pub geographic_diversity: f64,
    pub capacity: f64,
    pub relationship: f64,
    pub esg: f64,
    pub financial: f64,
    pub switching_cost: f64,
    pub lead_time: f64,
}

/// An actionable alert synthesized from a [`crate::domain::RiskEvent`]
/// (spec §3). Exists iff §3 invariant 5 holds: `risk_score >=
/// alert_threshold` and `affected_supply_chain_nodes` is non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub risk_event_id: Uuid,
    pub company_id: String,
    pub severity_band: SeverityBand,
    pub risk_score: f64,
    pub title: String,
    pub description: String,
    pub affected_supplier: String,
    pub affected_material: String,
    pub recommendations: Vec<AlternateRec>,
    pub recommendation_text: Option<String>,
    pub is_acknowledged: bool,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub notification_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
