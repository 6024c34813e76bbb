//! Supplementary supply-chain graph analysis: critical nodes, vulnerable
//! paths, and a summary view (grounded on `graph_propagation.py`'s
//! `find_critical_nodes`/`find_vulnerable_paths`/`analyze_supply_chain`,
//! supplemented per spec's original_source — not named in the distilled
//! spec's REDESIGN section, but present in the source it was drawn from).

use std::collections::{HashMap, HashSet, VecDeque};

use super::SupplyGraph;

/// A node ranked by how many shortest paths from any supplier to the
/// company pass through it — an approximation of betweenness
/// centrality restricted to paths that terminate at `company_id`,
/// which is the only sink every path in this graph shares.
#[derive(Debug, Clone)]
pub struct CriticalNode {
    pub node_id: String,
    pub name: String,
    pub path_count: usize,
}

/// A path from `node_id` to the company, carrying the weakest edge
/// weight along the way (the bottleneck).
#[derive(Debug, Clone)]
pub struct VulnerablePath {
    pub node_id: String,
    pub path: Vec<String>,
    pub bottleneck_weight: f64,
}

/// Aggregate view returned by [`SupplyGraph::analyze`].
#[derive(Debug, Clone)]
pub struct GraphAnalysis {
    pub node_count: usize,
    pub edge_count: usize,
    pub total_suppliers: usize,
    pub tier1_suppliers: usize,
    pub tier2_suppliers: usize,
    pub critical_nodes: Vec<CriticalNode>,
    pub single_source_count: usize,
    pub single_source_materials: Vec<String>,
    pub avg_path_length: f64,
    pub max_path_length: usize,
}

/// Shortest path (by hop count) from `start` to `company_id`, or `None`
/// if unreachable. BFS over successors, matching the Python original's
/// `networkx.shortest_path` usage on an unweighted view of the graph.
fn shortest_path_to_company(graph: &SupplyGraph, start: &str, company_id: &str) -> Option<Vec<String>> {
    if start == company_id {
        return Some(vec![start.to_string()]);
    }

    let mut prev: HashMap<String, String> = HashMap::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(start.to_string());
    visited.insert(start.to_string());

    while let Some(node) = queue.pop_front() {
        for edge in graph.successors(&node) {
            if visited.contains(&edge.to) {
                continue;
            }
            visited.insert(edge.to.clone());
            prev.insert(edge.to.clone(), node.clone());
            if edge.to == company_id {
                let mut path = vec![company_id.to_string()];
                let mut cur = node.clone();
                path.push(cur.clone());
                while let Some(p) = prev.get(&cur) {
                    if p == start {
                        break;
                    }
                    path.push(p.clone());
                    cur = p.clone();
                }
                path.push(start.to_string());
                path.reverse();
                return Some(path);
            }
            queue.push_back(edge.to.clone());
        }
    }

    None
}

/// Nodes sorted by how many supplier-to-company shortest paths they sit
/// on, descending. A chokepoint upstream node that many tier-1 suppliers
/// route through ranks above any single leaf supplier.
pub fn critical_nodes(graph: &SupplyGraph, company_id: &str, top_n: usize) -> Vec<CriticalNode> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for node_id in graph.node_ids() {
        if node_id == company_id {
            continue;
        }
        if let Some(path) = shortest_path_to_company(graph, node_id, company_id) {
            for hop in &path[1..path.len().saturating_sub(1)] {
                *counts.entry(hop.clone()).or_insert(0) += 1;
            }
        }
    }

    let mut ranked: Vec<CriticalNode> = counts
        .into_iter()
        .map(|(node_id, path_count)| {
            let name = graph
                .nodes
                .get(&node_id)
                .map(|n| n.name.clone())
                .unwrap_or_else(|| node_id.clone());
            CriticalNode {
                node_id,
                name,
                path_count,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.path_count.cmp(&a.path_count).then(a.node_id.cmp(&b.node_id)));
    ranked.truncate(top_n);
    ranked
}

/// Every node's path to the company along with its weakest-edge
/// bottleneck, sorted by bottleneck ascending (the fragile paths first).
pub fn vulnerable_paths(graph: &SupplyGraph, company_id: &str) -> Vec<VulnerablePath> {
    let mut out = Vec::new();

    for node_id in graph.node_ids() {
        if node_id == company_id {
            continue;
        }
        let Some(path) = shortest_path_to_company(graph, node_id, company_id) else {
            continue;
        };

        let mut bottleneck = f64::MAX;
        for pair in path.windows(2) {
            let weight = graph
                .successors(&pair[0])
                .iter()
                .find(|e| &e.to == &pair[1])
                .map(|e| e.weight)
                .unwrap_or(0.0);
            bottleneck = bottleneck.min(weight);
        }
        if bottleneck == f64::MAX {
            bottleneck = 0.0;
        }

        out.push(VulnerablePath {
            node_id: node_id.clone(),
            path,
            bottleneck_weight: bottleneck,
        });
    }

    out.sort_by(|a, b| {
        a.bottleneck_weight
            .partial_cmp(&b.bottleneck_weight)
            .unwrap()
            .then(a.node_id.cmp(&b.node_id))
    });
    out
}

impl SupplyGraph {
    /// Comprehensive supply chain summary (supplemented feature, not on
    /// the pipeline's hot path): tier breakdown, single-source exposure,
    /// top critical nodes, and path-length statistics to `company_id`.
    pub fn analyze(&self, company_id: &str) -> GraphAnalysis {
        let mut total_suppliers = 0;
        let mut tier1_suppliers = 0;
        let mut tier2_suppliers = 0;
        for node in self.nodes.values() {
            match node.tier {
                Some(1) => {
                    total_suppliers += 1;
                    tier1_suppliers += 1;
                }
                Some(2) => {
                    total_suppliers += 1;
                    tier2_suppliers += 1;
                }
                Some(_) => total_suppliers += 1,
                None => {}
            }
        }

        let mut single_source_materials: Vec<String> = self
            .nodes
            .values()
            .filter(|n| n.is_single_source)
            .flat_map(|n| self.successors(&n.id).iter().map(|e| e.material.clone()))
            .collect();
        single_source_materials.sort();
        single_source_materials.dedup();

        let paths = vulnerable_paths(self, company_id);
        let (avg_path_length, max_path_length) = if paths.is_empty() {
            (0.0, 0)
        } else {
            let lengths: Vec<usize> = paths.iter().map(|p| p.path.len()).collect();
            let avg = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
            let max = *lengths.iter().max().unwrap_or(&0);
            (avg, max)
        };

        GraphAnalysis {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            total_suppliers,
            tier1_suppliers,
            tier2_suppliers,
            critical_nodes: critical_nodes(self, company_id, 10),
            single_source_count: self.nodes.values().filter(|n| n.is_single_source).count(),
            single_source_materials,
            avg_path_length,
            max_path_length,
        }
    }
}
