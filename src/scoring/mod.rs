//! The Scorer (spec §4.6): a pure function mapping `(risk_data, supplier,
//! company)` to `(score, band, components)`. No I/O, no globals — every
//! input is passed explicitly, which is what makes the formula testable
//! in isolation from the rest of the pipeline.

use crate::catalog::Catalog;
use crate::domain::{
    Confirmation, RiskEvent, ScoreComponents, Severity, Supplier, SupplierStatus, TimeHorizon,
};

/// Compute the four score components and final score for a risk against
/// `supplier`, given `material_criticality`/`inventory_days` lookups and
/// the number of available alternates (spec §4.6).
pub fn score(
    severity: Severity,
    is_confirmed: Confirmation,
    time_horizon: TimeHorizon,
    supplier: &Supplier,
    material_criticality: u32,
    inventory_days: u32,
    num_alternates: usize,
) -> (f64, ScoreComponents) {
    let probability = severity.base_probability() * is_confirmed.probability_multiplier();

    let dependency_ratio = supplier.supply_volume_pct / 100.0;
    let criticality_factor = material_criticality as f64 / 10.0;
    let buffer_score = 1.0 / (1.0 + inventory_days as f64 / 30.0);
    let impact = (dependency_ratio * criticality_factor * buffer_score * 10.0).clamp(1.0, 10.0);

    let urgency = time_horizon.urgency();

    let mitigation = if supplier.is_single_source {
        0.5
    } else {
        1.0 + (num_alternates as f64 * 0.2).min(1.0)
    };

    let raw_score = (probability * impact * urgency) / mitigation;
    let components = ScoreComponents {
        probability: round2(probability),
        impact: round2(impact),
        urgency,
        mitigation,
    };

    (round2(raw_score), components)
}

/// Count suppliers offering `material` with an available status, other
/// than `exclude_id` (spec §4.6: "count of suppliers ... minus one for
/// the currently affected supplier").
pub fn count_alternate_suppliers(catalog: &Catalog, material: &str, exclude_id: &str) -> usize {
    catalog
        .suppliers_for_material(material)
        .into_iter()
        .filter(|s| s.status.is_available() && s.id != exclude_id)
        .count()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Score a [`RiskEvent`] in place against its primary affected supplier,
/// resolving catalog lookups for criticality, inventory, and alternates.
/// Returns `None` if the primary affected supplier cannot be resolved —
/// the caller should log and leave the event unscored rather than panic,
/// since a dangling name is a data-quality issue, not a bug.
pub fn score_event(
    event: &mut RiskEvent,
    catalog: &Catalog,
    material_criticality: impl Fn(&str) -> u32,
    inventory_days: impl Fn(&str) -> u32,
) -> Option<()> {
    let supplier_name = event.affected_supply_chain_nodes.first()?;
    let supplier = catalog.find_by_name(supplier_name)?;
    let material = supplier.primary_material();

    let criticality = material_criticality(material);
    let days = inventory_days(material);
    let alternates = count_alternate_suppliers(catalog, material, &supplier.id);

    let (raw_score, components) = score(
        event.severity,
        event.is_confirmed,
        event.time_horizon,
        supplier,
        criticality,
        days,
        alternates,
    );

    event.risk_score = raw_score;
    event.risk_score_components = components;
    event.severity_band = crate::domain::SeverityBand::from_score(raw_score);
    Some(())
}
