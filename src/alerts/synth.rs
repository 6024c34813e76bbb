//! AlertSynth (spec §4.8): gates a scored [`RiskEvent`] into an [`Alert`],
//! resolving the primary affected supplier, ranking alternates, and
//! composing title/description/recommendation text.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::domain::{Alert, RiskEvent};
use crate::llm::{LlmClient, ModelTier};

use super::ranker::SupplierRanker;

const MAX_ALTERNATES: usize = 5;
const MAX_DESCRIPTION_ENTITIES: usize = 5;

/// `risk_score >= alert_threshold AND affected_supply_chain_nodes non-empty`
/// (spec §4.8).
pub fn should_alert(event: &RiskEvent, alert_threshold: f64) -> bool {
    event.risk_score >= alert_threshold && event.has_resolvable_node()
}

/// Build the Alert for `event`, or `None` if the primary affected supplier
/// can't be resolved against the catalog (a data-quality issue logged by
/// the caller, not a panic). Optionally asks `llm` for a human-written
/// recommendation before falling back to the deterministic template
/// (spec §4.8).
pub async fn synthesize<L: LlmClient>(event: &RiskEvent, catalog: &Catalog, llm: &L) -> Option<Alert> {
    let supplier_name = event.affected_supply_chain_nodes.first()?;
    let supplier = catalog.find_by_name(supplier_name)?;
    let affected_material = supplier.primary_material().to_string();

    let alternates = SupplierRanker::rank(catalog, supplier, supplier.supply_volume_pct, MAX_ALTERNATES);

    let title = format!("{} Risk: {}", event.risk_type.title_case(), supplier.name);
    let description = compose_description(event);
    let recommendation = recommendation_text(llm, event, &affected_material, supplier.name.as_str(), &alternates).await;

    let now = Utc::now();
    Some(Alert {
        id: Uuid::new_v4(),
        risk_event_id: event.id,
        company_id: event.company_id.clone(),
        severity_band: event.severity_band,
        risk_score: event.risk_score,
        title,
        description,
        affected_supplier: supplier.name.clone(),
        affected_material,
        recommendations: alternates,
        recommendation_text: Some(recommendation),
        is_acknowledged: false,
        acknowledged_by: None,
        acknowledged_at: None,
        notification_sent: false,
        created_at: now,
        updated_at: now,
    })
}

fn compose_description(event: &RiskEvent) -> String {
    let entities = event
        .affected_entities
        .iter()
        .take(MAX_DESCRIPTION_ENTITIES)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    if entities.is_empty() {
        event.reasoning.clone()
    } else {
        format!("{} Affected: {}.", event.reasoning, entities)
    }
}

/// Asks the LLM for a 3-4 sentence human recommendation, falling back to
/// [`fallback_recommendation`] if the call errors (spec §4.8).
async fn recommendation_text<L: LlmClient>(
    llm: &L,
    event: &RiskEvent,
    material: &str,
    supplier: &str,
    alternates: &[crate::domain::AlternateRec],
) -> String {
    let prompt = recommendation_prompt(event, material, supplier, alternates);
    match llm.generate_text(&prompt, ModelTier::Flash).await {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => fallback_recommendation(event, material, supplier, alternates),
        Err(e) => {
            warn!(risk_event_id = %event.id, error = %e, "recommendation text generation failed, using template");
            fallback_recommendation(event, material, supplier, alternates)
        }
    }
}

fn recommendation_prompt(
    event: &RiskEvent,
    material: &str,
    supplier: &str,
    alternates: &[crate::domain::AlternateRec],
) -> String {
    let alternates_text = alternates
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, alt)| {
            format!(
                "  {}. {} ({}) - Lead time: {} weeks, Approved: {}",
                i + 1,
                alt.name,
                alt.country,
                alt.lead_time_weeks,
                if alt.approved_vendor { "Yes" } else { "No" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a supply chain advisor.\n\n\
         ALERT DETAILS:\n\
         - Risk type: {risk_type}\n\
         - Risk score: {score} ({band})\n\
         - Affected supplier: {supplier}\n\
         - Affected material: {material}\n\n\
         TOP ALTERNATE SUPPLIERS:\n{alternates_text}\n\n\
         Write a concise (3-4 sentences) recommendation for the supply chain \
         manager. Cover urgency, the top recommended alternate and why, and a \
         mitigation strategy. Professional, direct, flowing sentences, no \
         bullet points.",
        risk_type = event.risk_type.title_case(),
        score = event.risk_score,
        band = event.severity_band.as_str(),
    )
}

/// Deterministic template used when the LLM isn't asked for (or fails to
/// produce) a human recommendation (spec §4.8, supplemented by
/// `recommendation_text.py` in the original source).
fn fallback_recommendation(
    event: &RiskEvent,
    material: &str,
    supplier: &str,
    alternates: &[crate::domain::AlternateRec],
) -> String {
    let band = event.severity_band.as_str();
    let band_title = {
        let mut c = band.chars();
        match c.next() {
            Some(first) => first.to_uppercase().collect::<String>() + c.as_str(),
            None => String::new(),
        }
    };

    match alternates.first() {
        Some(top) => format!(
            "{band_title} risk to {material} supply via {supplier}. {n} alternate supplier(s) identified; top candidate: {top_name} ({country}, {lead_time}wk lead time).",
            n = alternates.len(),
            top_name = top.name,
            country = top.country,
            lead_time = top.lead_time_weeks,
        ),
        None => format!(
            "{band_title} risk to {material} supply via {supplier}. No alternate suppliers identified in the catalog."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Confirmation, RiskType, ScoreComponents, Severity, SeverityBand, Supplier, SupplierStatus,
        TimeHorizon,
    };
    use crate::llm::RawExtraction;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubLlm {
        text: Option<String>,
    }

    #[async_trait]
    impl LlmClient for StubLlm {
        async fn extract_risk(&self, _prompt: &str, _tier: ModelTier) -> crate::errors::Result<RawExtraction> {
            unimplemented!("not exercised by these tests")
        }

        async fn generate_text(&self, _prompt: &str, _tier: ModelTier) -> crate::errors::Result<String> {
            match &self.text {
                Some(t) => Ok(t.clone()),
                None => Err(crate::errors::PipelineError::transient("stub_llm", "down")),
            }
        }
    }

    fn supplier() -> Supplier {
        Supplier {
            id: "s1".to_string(),
            company_id: "co".to_string(),
            name: "Acme Steel".to_string(),
            country: "US".to_string(),
            region: "NA".to_string(),
            tier: 1,
            supplies: vec!["steel".to_string()],
            supply_volume_pct: 80.0,
            status: SupplierStatus::Active,
            approved_vendor: true,
            pre_qualified: false,
            is_single_source: false,
            esg_score: 70.0,
            financial_health_score: 7.0,
            switching_cost_estimate: 3.0,
            max_capacity: Some(500.0),
            lead_time_weeks: 4,
            risk_score_current: 0.0,
            upstream_suppliers: Vec::new(),
        }
    }

    fn alternate() -> Supplier {
        Supplier {
            id: "s2".to_string(),
            name: "Beta Metals".to_string(),
            country: "CA".to_string(),
            ..supplier()
        }
    }

    fn event(risk_score: f64, affected: Vec<String>) -> RiskEvent {
        RiskEvent {
            id: Uuid::new_v4(),
            article_id: Uuid::new_v4(),
            company_id: "co".to_string(),
            timestamp: Utc::now(),
            risk_type: RiskType::NaturalDisaster,
            affected_entities: vec!["Acme Steel".to_string(), "Texas".to_string()],
            affected_supply_chain_nodes: affected,
            severity: Severity::High,
            is_confirmed: Confirmation::True,
            time_horizon: TimeHorizon::Days,
            reasoning: "A major flood has disrupted operations.".to_string(),
            recommended_action: "Activate alternates.".to_string(),
            risk_score_components: ScoreComponents::zeroed(),
            risk_score,
            severity_band: SeverityBand::from_score(risk_score),
            propagation: HashMap::new(),
        }
    }

    #[test]
    fn gate_requires_threshold_and_nonempty_nodes() {
        assert!(should_alert(&event(5.0, vec!["Acme Steel".to_string()]), 3.0));
        assert!(!should_alert(&event(2.0, vec!["Acme Steel".to_string()]), 3.0));
        assert!(!should_alert(&event(5.0, Vec::new()), 3.0));
    }

    #[tokio::test]
    async fn synthesize_composes_title_from_risk_type_and_supplier() {
        let catalog = Catalog::new(vec![supplier(), alternate()]);
        let e = event(7.0, vec!["Acme Steel".to_string()]);
        let llm = StubLlm { text: None };
        let alert = synthesize(&e, &catalog, &llm).await.unwrap();
        assert_eq!(alert.title, "Natural Disaster Risk: Acme Steel");
        assert_eq!(alert.affected_material, "steel");
    }

    #[tokio::test]
    async fn synthesize_returns_none_for_unresolvable_supplier() {
        let catalog = Catalog::new(vec![supplier()]);
        let e = event(7.0, vec!["Unknown Corp".to_string()]);
        let llm = StubLlm { text: None };
        assert!(synthesize(&e, &catalog, &llm).await.is_none());
    }

    #[tokio::test]
    async fn llm_failure_falls_back_to_template_naming_top_alternate() {
        let catalog = Catalog::new(vec![supplier(), alternate()]);
        let e = event(7.0, vec!["Acme Steel".to_string()]);
        let llm = StubLlm { text: None };
        let alert = synthesize(&e, &catalog, &llm).await.unwrap();
        let text = alert.recommendation_text.unwrap();
        assert!(text.contains("Beta Metals"));
        assert!(text.contains("steel"));
    }

    #[tokio::test]
    async fn synthesize_uses_llm_recommendation_when_available() {
        let catalog = Catalog::new(vec![supplier(), alternate()]);
        let e = event(7.0, vec!["Acme Steel".to_string()]);
        let llm = StubLlm {
            text: Some("Engage Beta Metals immediately to de-risk steel supply.".to_string()),
        };
        let alert = synthesize(&e, &catalog, &llm).await.unwrap();
        assert_eq!(
            alert.recommendation_text.unwrap(),
            "Engage Beta Metals immediately to de-risk steel supply."
        );
    }
}
