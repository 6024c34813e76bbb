//! The supply chain graph: nodes are the company and every supplier
//! (including declared tier-2+ upstreams), edges flow supplier →
//! dependent (spec §4.7). Built once at worker startup and rebuilt on
//! supplier-catalog change notifications — never mutated in place.

pub mod analysis;
pub mod builder;
pub mod propagator;

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

/// A graph node: the company itself, or a supplier at any tier.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub is_single_source: bool,
    /// Supplier tier, `None` for the company node and synthetic
    /// tier-2+ upstream nodes that have no catalog entry of their own.
    pub tier: Option<u32>,
}

/// A directed edge from a supplier toward whatever depends on it.
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub weight: f64,
    pub material: String,
}

/// An adjacency-list directed graph over [`Node`]/[`Edge`]. Deliberately
/// not a general-purpose graph library — the pipeline only ever needs
/// successor traversal and node lookup.
#[derive(Debug, Clone, Default)]
pub struct SupplyGraph {
    pub nodes: HashMap<String, Node>,
    adjacency: HashMap<String, Vec<Edge>>,
}

impl SupplyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) {
        self.adjacency.entry(node.id.clone()).or_default();
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.adjacency
            .entry(edge.from.clone())
            .or_default()
            .push(edge);
    }

    pub fn successors(&self, node_id: &str) -> &[Edge] {
        self.adjacency.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &String> {
        self.nodes.keys()
    }
}

/// Process-wide graph handle, refreshed the same way as
/// [`crate::catalog::CatalogHandle`] — rebuilt at worker startup and on
/// supplier-catalog change notifications (spec §4.7), never mutated
/// in place so readers on the hot path never block.
#[derive(Clone)]
pub struct GraphHandle {
    inner: Arc<ArcSwap<SupplyGraph>>,
}

impl GraphHandle {
    pub fn new(initial: SupplyGraph) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    pub fn current(&self) -> Arc<SupplyGraph> {
        self.inner.load_full()
    }

    pub fn swap(&self, next: SupplyGraph) {
        self.inner.store(Arc::new(next));
    }
}
