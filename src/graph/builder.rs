//! Builds a [`SupplyGraph`] from the company profile and supplier
//! catalog (spec §4.7).
//!
//! Tier-1 suppliers get an edge straight to the company node. A tier-1
//! supplier's declared `upstream_suppliers` (tier 2+) get a synthetic
//! node and an edge to *that supplier*, not to the company directly —
//! so a tier-3 disruption has to cross two hops to reach the company,
//! matching how [`crate::graph::propagator`] attenuates score per hop.

use tracing::warn;

use crate::catalog::Catalog;
use crate::domain::CompanyProfile;

use super::{Edge, Node, SupplyGraph};

fn upstream_node_id(supplier_id: &str, upstream_name: &str) -> String {
    format!("{supplier_id}::upstream::{upstream_name}")
}

/// Rebuild the full graph from scratch (spec §4.7: "Graph is rebuilt at
/// worker startup and on supplier-catalog change notifications").
pub fn build(company: &CompanyProfile, catalog: &Catalog) -> SupplyGraph {
    let mut graph = SupplyGraph::new();

    graph.add_node(Node {
        id: company.company_id.clone(),
        name: company.name.clone(),
        is_single_source: false,
        tier: None,
    });

    for supplier in catalog.all() {
        graph.add_node(Node {
            id: supplier.id.clone(),
            name: supplier.name.clone(),
            is_single_source: supplier.is_single_source,
            tier: Some(supplier.tier),
        });

        let material = supplier.primary_material().to_string();
        let weight = supplier.supply_volume_pct / 100.0;

        match supplier.tier {
            1 => {
                graph.add_edge(Edge {
                    from: supplier.id.clone(),
                    to: company.company_id.clone(),
                    weight,
                    material: material.clone(),
                });
            }
            tier => {
                warn!(
                    supplier = %supplier.name,
                    tier,
                    "tier-2+ supplier present directly in catalog with no declared parent; \
                     wiring straight to company as a fallback"
                );
                graph.add_edge(Edge {
                    from: supplier.id.clone(),
                    to: company.company_id.clone(),
                    weight,
                    material: material.clone(),
                });
            }
        }

        for upstream in &supplier.upstream_suppliers {
            let upstream_id = upstream_node_id(&supplier.id, &upstream.name);
            graph.add_node(Node {
                id: upstream_id.clone(),
                name: upstream.name.clone(),
                is_single_source: false,
                tier: None,
            });
            graph.add_edge(Edge {
                from: upstream_id,
                to: supplier.id.clone(),
                weight: upstream.supply_volume_pct / 100.0,
                material,
            });
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SupplierStatus, UpstreamSupplier};

    fn tier1_with_upstream() -> crate::domain::Supplier {
        crate::domain::Supplier {
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
            esg_score: 0.7,
            financial_health_score: 0.8,
            switching_cost_estimate: 0.3,
            max_capacity: Some(1000.0),
            lead_time_weeks: 4,
            risk_score_current: 0.0,
            upstream_suppliers: vec![UpstreamSupplier {
                name: "Ore Mine Co".to_string(),
                country: "BR".to_string(),
                supply_volume_pct: 100.0,
            }],
        }
    }

    #[test]
    fn tier1_connects_directly_to_company() {
        let mut company = CompanyProfile::default();
        company.company_id = "co".to_string();
        let catalog = Catalog::new(vec![tier1_with_upstream()]);
        let graph = build(&company, &catalog);

        let edges = graph.successors("s1");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, "co");
    }

    #[test]
    fn upstream_connects_to_parent_not_company() {
        let mut company = CompanyProfile::default();
        company.company_id = "co".to_string();
        let catalog = Catalog::new(vec![tier1_with_upstream()]);
        let graph = build(&company, &catalog);

        let upstream_id = upstream_node_id("s1", "Ore Mine Co");
        let edges = graph.successors(&upstream_id);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, "s1");
        assert_ne!(edges[0].to, "co");
    }

    #[test]
    fn graph_has_company_supplier_and_upstream_nodes() {
        let mut company = CompanyProfile::default();
        company.company_id = "co".to_string();
        let catalog = Catalog::new(vec![tier1_with_upstream()]);
        let graph = build(&company, &catalog);
        assert_eq!(graph.node_count(), 3); // company + supplier + upstream
    }
}
