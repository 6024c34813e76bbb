//! Risk extraction (spec §4.5): prompts the LLM to classify an article
//! as a risk or not, then converts its raw JSON response into a
//! [`crate::domain::RiskEvent`] skeleton (scoring happens downstream).

use uuid::Uuid;

use crate::catalog::Catalog;
use crate::domain::{Article, CompanyProfile, Confirmation, RiskType, ScoreComponents, Severity, TimeHorizon};
use crate::errors::Result;
use crate::llm::{LlmClient, ModelTier, RawExtraction};

/// Geopolitical risk narratives tend to need more context than Flash
/// reliably handles (spec §4.5) — route them to Pro.
fn select_tier(risk_type_hint: Option<&str>) -> ModelTier {
    match risk_type_hint {
        Some(t) if t.eq_ignore_ascii_case("geopolitical") => ModelTier::Pro,
        _ => ModelTier::Flash,
    }
}

/// Build the structured-extraction prompt (spec §4.5), matching the
/// schema the LLM is asked to emit.
pub fn build_prompt(article: &Article, company: &CompanyProfile, catalog: &Catalog) -> String {
    let supplier_list = catalog
        .all()
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let materials_list = company.raw_materials.join(", ");
    let geographies = company.key_geographies.join(", ");

    format!(
        "You are a supply chain risk analyst for {company_name}.\n\n\
         Company's key suppliers: {supplier_list}\n\
         Company's raw materials: {materials_list}\n\
         Key geographies: {geographies}\n\n\
         Analyze the following news article and return a JSON object ONLY (no explanation):\n\n\
         Article:\n{article_text}\n\n\
         JSON schema to follow:\n\
         {{\n\
         \x20\x20\"is_risk\": true or false,\n\
         \x20\x20\"risk_type\": \"geopolitical | natural_disaster | financial | regulatory | operational | cybersecurity | esg | other\",\n\
         \x20\x20\"affected_entities\": [\"list of companies, countries, or materials mentioned\"],\n\
         \x20\x20\"affected_supply_chain_nodes\": [\"names matching our supplier list or materials exactly\"],\n\
         \x20\x20\"severity\": \"critical | high | medium | low\",\n\
         \x20\x20\"is_confirmed\": \"true | false | uncertain\",\n\
         \x20\x20\"time_horizon\": \"immediate | days | weeks | months\",\n\
         \x20\x20\"reasoning\": \"one sentence explaining the link to our supply chain\",\n\
         \x20\x20\"recommended_action\": \"one sentence immediate action\"\n\
         }}\n\n\
         Rules:\n\
         - Only set is_risk=true if this directly affects our suppliers, materials, or geographies\n\
         - affected_supply_chain_nodes must match names from the supplier list exactly (case-insensitive)\n\
         - Be conservative: if connection is weak or speculative, set is_risk=false\n\
         - severity should reflect potential operational impact to {company_name}",
        company_name = company.name,
        article_text = article.text(4000),
    )
}

/// The result of extracting one article: either a risk worth scoring, or
/// a determination that it is not (the article is still marked
/// `processed` by the caller, per spec §3 invariant 1).
pub enum Extraction {
    NotRisk,
    Risk(RiskFields),
}

/// The subset of [`crate::domain::RiskEvent`] that extraction alone can
/// populate; `risk_score`/`severity_band`/`propagation` are filled in by
/// the Scorer and Propagator.
pub struct RiskFields {
    pub risk_type: RiskType,
    pub affected_entities: Vec<String>,
    pub affected_supply_chain_nodes: Vec<String>,
    pub severity: Severity,
    pub is_confirmed: Confirmation,
    pub time_horizon: TimeHorizon,
    pub reasoning: String,
    pub recommended_action: String,
}

pub struct RiskExtractor<L> {
    llm: L,
}

impl<L: LlmClient> RiskExtractor<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    /// Extract risk structure from `article`. Validates
    /// `affected_supply_chain_nodes` against the catalog by name
    /// (case-insensitive); entries that don't resolve to a known
    /// supplier are dropped rather than failing the whole extraction —
    /// the LLM is free-texting names, not ids.
    pub async fn extract(
        &self,
        article: &Article,
        company: &CompanyProfile,
        catalog: &Catalog,
    ) -> Result<Extraction> {
        let prompt = build_prompt(article, company, catalog);
        let tier = select_tier(None);
        let raw = self.llm.extract_risk(&prompt, tier).await?;

        // Geopolitical extractions sometimes warrant a second pass on Pro
        // for better reasoning; re-run only when Flash already flagged it.
        let raw = if raw.is_risk && raw.risk_type.eq_ignore_ascii_case("geopolitical") && tier == ModelTier::Flash {
            self.llm
                .extract_risk(&prompt, ModelTier::Pro)
                .await
                .unwrap_or(raw)
        } else {
            raw
        };

        if !raw.is_risk {
            return Ok(Extraction::NotRisk);
        }

        Ok(Extraction::Risk(to_risk_fields(raw, catalog)))
    }
}

fn to_risk_fields(raw: RawExtraction, catalog: &Catalog) -> RiskFields {
    let affected_supply_chain_nodes = raw
        .affected_supply_chain_nodes
        .into_iter()
        .filter(|name| catalog.find_by_name(name).is_some())
        .collect();

    RiskFields {
        risk_type: parse_risk_type(&raw.risk_type),
        affected_entities: raw.affected_entities,
        affected_supply_chain_nodes,
        severity: parse_severity(&raw.severity),
        is_confirmed: parse_confirmation(&raw.is_confirmed),
        time_horizon: parse_time_horizon(&raw.time_horizon),
        reasoning: raw.reasoning,
        recommended_action: raw.recommended_action,
    }
}

fn parse_risk_type(s: &str) -> RiskType {
    match s.to_lowercase().as_str() {
        "geopolitical" => RiskType::Geopolitical,
        "natural_disaster" => RiskType::NaturalDisaster,
        "financial" => RiskType::Financial,
        "regulatory" => RiskType::Regulatory,
        "operational" => RiskType::Operational,
        "cybersecurity" => RiskType::Cybersecurity,
        "esg" => RiskType::Esg,
        _ => RiskType::Other,
    }
}

fn parse_severity(s: &str) -> Severity {
    match s.to_lowercase().as_str() {
        "critical" => Severity::Critical,
        "high" => Severity::High,
        "medium" => Severity::Medium,
        _ => Severity::Low,
    }
}

fn parse_confirmation(s: &str) -> Confirmation {
    match s.to_lowercase().as_str() {
        "true" => Confirmation::True,
        "false" => Confirmation::False,
        _ => Confirmation::Uncertain,
    }
}

fn parse_time_horizon(s: &str) -> TimeHorizon {
    match s.to_lowercase().as_str() {
        "immediate" => TimeHorizon::Immediate,
        "days" => TimeHorizon::Days,
        "weeks" => TimeHorizon::Weeks,
        _ => TimeHorizon::Months,
    }
}

/// `risk_score_components` starts zeroed; the Scorer fills them in.
pub fn zeroed_components() -> ScoreComponents {
    ScoreComponents::zeroed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_risk_type_maps_to_other() {
        assert_eq!(parse_risk_type("volcanic"), RiskType::Other);
    }

    #[test]
    fn unknown_confirmation_maps_to_uncertain() {
        assert_eq!(parse_confirmation("maybe"), Confirmation::Uncertain);
    }

    #[test]
    fn prompt_includes_company_name_and_schema() {
        let company = CompanyProfile::default();
        let catalog = Catalog::new(Vec::new());
        let article = crate::domain::Article {
            event_id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            source: "NewsAPI".to_string(),
            headline: "Headline long enough".to_string(),
            body: "body".to_string(),
            url: "https://example.com".to_string(),
            processed: false,
            risk_extracted: false,
            risk_event_id: None,
        };
        let prompt = build_prompt(&article, &company, &catalog);
        assert!(prompt.contains(&company.name));
        assert!(prompt.contains("affected_supply_chain_nodes"));
    }
}
