use serde::{Deserialize, Serialize};

/// Lifecycle status of a supplier relationship (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierStatus {
    Active,
    Alternate,
    PreQualified,
    Inactive,
    AtRisk,
}

impl SupplierStatus {
    /// Statuses eligible to be counted as mitigation alternates (§4.6) or
    /// ranked as alternate-supplier candidates (§4.9).
    pub fn is_available(self) -> bool {
        matches!(
            self,
            SupplierStatus::Active | SupplierStatus::Alternate | SupplierStatus::PreQualified
        )
    }
}

/// A reference to an upstream (tier 2+) supplier declared by a tier-1
/// supplier, used by [`crate::graph::builder`] to extend the DAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamSupplier {
    pub name: String,
    pub country: String,
    pub supply_volume_pct: f64,
}

/// A node in the company's supplier catalog (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub country: String,
    pub region: String,
    pub tier: u32,
    pub supplies: Vec<String>,
    pub supply_volume_pct: f64,
    pub status: SupplierStatus,
    pub approved_vendor: bool,
    pub pre_qualified: bool,
    pub is_single_source: bool,
    pub esg_score: f64,
    pub financial_health_score: f64,
    pub switching_cost_estimate: f64,
    pub max_capacity: Option<f64>,
    pub lead_time_weeks: u32,
    pub risk_score_current: f64,
    #[serde(default)]
    pub upstream_suppliers: Vec<UpstreamSupplier>,
}

impl Supplier {
    /// First material in `supplies`, used wherever the spec says "the
    /// material" for a supplier (Scorer §4.6, ranker §4.9) — `"unknown"`
    /// when the supplier declares none.
    pub fn primary_material(&self) -> &str {
        self.supplies.first().map(String::as_str).unwrap_or("unknown")
    }

    pub fn supplies_material(&self, material: &str) -> bool {
        self.supplies.iter().any(|m| m.eq_ignore_ascii_case(material))
    }
}
