//! The supplier catalog: a read-mostly snapshot of every [`Supplier`] the
//! company tracks, refreshed periodically from the document store and
//! published via atomic pointer swap — the same pattern used for the
//! company profile global in [`crate::config`]. Readers on the hot path
//! (Fetcher, RelevanceFilter, Scorer, GraphBuilder) never block behind a
//! refresh.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::domain::Supplier;

/// A point-in-time snapshot of the supplier catalog, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    suppliers: Vec<Supplier>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(suppliers: Vec<Supplier>) -> Self {
        let by_id = suppliers
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        Self { suppliers, by_id }
    }

    pub fn all(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn get(&self, id: &str) -> Option<&Supplier> {
        self.by_id.get(id).map(|&i| &self.suppliers[i])
    }

    /// Case-insensitive lookup by supplier name — the LLM returns names,
    /// not ids, in `affected_supply_chain_nodes` (spec §4.5).
    pub fn find_by_name(&self, name: &str) -> Option<&Supplier> {
        self.suppliers
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn suppliers_for_material(&self, material: &str) -> Vec<&Supplier> {
        self.suppliers
            .iter()
            .filter(|s| s.supplies_material(material))
            .collect()
    }

    pub fn tier1(&self) -> Vec<&Supplier> {
        self.suppliers.iter().filter(|s| s.tier == 1).collect()
    }
}

/// Process-wide catalog handle, refreshed via [`CatalogHandle::swap`].
#[derive(Clone)]
pub struct CatalogHandle {
    inner: Arc<ArcSwap<Catalog>>,
}

impl CatalogHandle {
    pub fn new(initial: Catalog) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    pub fn current(&self) -> Arc<Catalog> {
        self.inner.load_full()
    }

    pub fn swap(&self, next: Catalog) {
        self.inner.store(Arc::new(next));
    }
}
