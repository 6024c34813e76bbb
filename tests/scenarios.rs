//! End-to-end scenarios from the scoring/alerting walkthrough, tying
//! together `scoring` and `alerts::synth` the way a single risk event
//! would actually flow through the score and alert worker stages.

use supplyrisk::alerts::synth::should_alert;
use supplyrisk::domain::{Confirmation, Severity, SeverityBand, Supplier, SupplierStatus, TimeHorizon};
use supplyrisk::scoring::score;

fn supplier(single_source: bool, supply_volume_pct: f64) -> Supplier {
    Supplier {
        id: "s1".to_string(),
        company_id: "co".to_string(),
        name: "Gulf Coast LPG Terminal".to_string(),
        country: "US".to_string(),
        region: "Gulf Coast".to_string(),
        tier: 1,
        supplies: vec!["LPG".to_string()],
        supply_volume_pct,
        status: SupplierStatus::Active,
        approved_vendor: true,
        pre_qualified: false,
        is_single_source: single_source,
        esg_score: 70.0,
        financial_health_score: 7.0,
        switching_cost_estimate: 3.0,
        max_capacity: Some(1000.0),
        lead_time_weeks: 4,
        risk_score_current: 0.0,
        upstream_suppliers: Vec::new(),
    }
}

/// Critical pipeline disruption at a single-source supplier, LPG
/// criticality=5, 10 days of inventory. Single-source override forces
/// mitigation to 0.5 regardless of alternate count.
#[test]
fn scenario_a_critical_single_source_disruption() {
    let disrupted = supplier(true, 100.0);

    let (raw_score, components) = score(
        Severity::Critical,
        Confirmation::True,
        TimeHorizon::Immediate,
        &disrupted,
        5,
        10,
        0,
    );

    assert_eq!(components.probability, 0.95);
    assert_eq!(components.impact, 3.75);
    assert_eq!(components.urgency, 2.0);
    assert_eq!(components.mitigation, 0.5);
    assert!((raw_score - 14.25).abs() < 0.01);
    assert_eq!(SeverityBand::from_score(raw_score), SeverityBand::Critical);
    assert!(should_alert_from_score(raw_score, 10.0));
}

/// Low-severity financial risk months out, with three alternates
/// already on file — mitigation is richest here, not worst-case.
#[test]
fn scenario_b_low_severity_abundant_alternates() {
    let disrupted = supplier(false, 35.0);

    let (raw_score, components) = score(
        Severity::Low,
        Confirmation::True,
        TimeHorizon::Months,
        &disrupted,
        10,
        15,
        3,
    );

    assert_eq!(components.probability, 0.25);
    assert_eq!(components.impact, 2.33);
    assert_eq!(components.urgency, 0.5);
    assert_eq!(components.mitigation, 1.6);
    assert!((raw_score - 0.18).abs() < 0.01);
    assert_eq!(SeverityBand::from_score(raw_score), SeverityBand::Low);
    assert!(!should_alert_from_score(raw_score, 3.0));
}

fn should_alert_from_score(risk_score: f64, alert_threshold: f64) -> bool {
    use chrono::Utc;
    use std::collections::HashMap;
    use supplyrisk::domain::{RiskEvent, RiskType, ScoreComponents};
    use uuid::Uuid;

    let event = RiskEvent {
        id: Uuid::new_v4(),
        article_id: Uuid::new_v4(),
        company_id: "co".to_string(),
        timestamp: Utc::now(),
        risk_type: RiskType::Operational,
        affected_entities: Vec::new(),
        affected_supply_chain_nodes: vec!["Gulf Coast LPG Terminal".to_string()],
        severity: Severity::Critical,
        is_confirmed: Confirmation::True,
        time_horizon: TimeHorizon::Immediate,
        reasoning: String::new(),
        recommended_action: String::new(),
        risk_score_components: ScoreComponents::zeroed(),
        risk_score,
        severity_band: SeverityBand::from_score(risk_score),
        propagation: HashMap::new(),
    };
    should_alert(&event, alert_threshold)
}
