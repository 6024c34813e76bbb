use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Category of a risk event (spec §3). Unknown values from the LLM map to
/// `Other` rather than failing deserialization (spec §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskType {
    Geopolitical,
    NaturalDisaster,
    Financial,
    Regulatory,
    Operational,
    Cybersecurity,
    Esg,
    Other,
}

impl RiskType {
    /// `"Natural Disaster Risk: ..."` style title used by [`crate::alerts::synth`].
    pub fn title_case(self) -> &'static str {
        match self {
            RiskType::Geopolitical => "Geopolitical",
            RiskType::NaturalDisaster => "Natural Disaster",
            RiskType::Financial => "Financial",
            RiskType::Regulatory => "Regulatory",
            RiskType::Operational => "Operational",
            RiskType::Cybersecurity => "Cybersecurity",
            RiskType::Esg => "ESG",
            RiskType::Other => "Other",
        }
    }
}

/// LLM's raw severity label (spec §9: kept distinct from the Scorer-derived
/// `severity_band`, both are emitted on the event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Probability mapping used by the Scorer (§4.6).
    pub fn base_probability(self) -> f64 {
        match self {
            Severity::Critical => 0.95,
            Severity::High => 0.80,
            Severity::Medium => 0.55,
            Severity::Low => 0.25,
        }
    }
}

/// Whether the LLM is confident the risk is real (spec §3/§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    True,
    False,
    Uncertain,
}

impl Confirmation {
    pub fn probability_multiplier(self) -> f64 {
        match self {
            Confirmation::True => 1.0,
            Confirmation::Uncertain => 0.7,
            Confirmation::False => 0.3,
        }
    }
}

/// Expected onset of the risk (spec §3/§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeHorizon {
    Immediate,
    Days,
    Weeks,
    Months,
}

impl TimeHorizon {
    pub fn urgency(self) -> f64 {
        match self {
            TimeHorizon::Immediate => 2.0,
            TimeHorizon::Days => 1.5,
            TimeHorizon::Weeks => 1.0,
            TimeHorizon::Months => 0.5,
        }
    }
}

/// Derived severity band (spec §4.6 bands, §8 invariant 1). A pure function
/// of `risk_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    Critical,
    High,
    Medium,
    Low,
}

impl SeverityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 10.0 {
            SeverityBand::Critical
        } else if score >= 6.0 {
            SeverityBand::High
        } else if score >= 3.0 {
            SeverityBand::Medium
        } else {
            SeverityBand::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeverityBand::Critical => "critical",
            SeverityBand::High => "high",
            SeverityBand::Medium => "medium",
            SeverityBand::Low => "low",
        }
    }
}

/// The four multiplicative factors behind `risk_score` (spec §3/§4.6).
/// `mitigation` is held to `[0.5, 2.0]`, `impact` to `[1, 10]`, `probability`
/// to `[0, 1]` — invariant 2 in spec §8.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub probability: f64,
    pub impact: f64,
    pub urgency: f64,
    pub mitigation: f64,
}

impl ScoreComponents {
    pub fn zeroed() -> Self {
        Self {
            probability: 0.0,
            impact: 0.0,
            urgency: 0.0,
            mitigation: 0.0,
        }
    }
}

/// The structured, scored artifact produced from an [`crate::domain::Article`]
/// by the LLM + Scorer (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskEvent {
    pub id: Uuid,
    pub article_id: Uuid,
    pub company_id: String,
    pub timestamp: DateTime<Utc>,
    pub risk_type: RiskType,
    pub affected_entities: Vec<String>,
    pub affected_supply_chain_nodes: Vec<String>,
    /// The LLM's original severity label (spec §9).
    pub severity: Severity,
    pub is_confirmed: Confirmation,
    pub time_horizon: TimeHorizon,
    pub reasoning: String,
    pub recommended_action: String,
    pub risk_score_components: ScoreComponents,
    pub risk_score: f64,
    /// The Scorer-derived band (spec §9) — always `SeverityBand::from_score(risk_score)`.
    pub severity_band: SeverityBand,
    pub propagation: HashMap<String, f64>,
}

impl RiskEvent {
    /// Invariant 2 (spec §3): every event resolves to at least one known
    /// supplier name. Checked by the caller before persisting.
    pub fn has_resolvable_node(&self) -> bool {
        !self.affected_supply_chain_nodes.is_empty()
    }
}
