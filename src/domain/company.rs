use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-deployment company profile (spec §3). TOML-loaded at startup by
/// [`crate::config`]; re-read on SIGHUP or periodic refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_id: String,
    pub name: String,
    #[serde(default)]
    pub raw_materials: Vec<String>,
    #[serde(default)]
    pub key_geographies: Vec<String>,
    #[serde(default)]
    pub inventory_days: HashMap<String, u32>,
    #[serde(default)]
    pub material_criticality: HashMap<String, u32>,
    #[serde(default)]
    pub alert_contacts: Vec<String>,
}

impl CompanyProfile {
    /// `company.inventory_days[material]`, defaulting to 0 per §4.6.
    pub fn inventory_days(&self, material: &str) -> u32 {
        self.inventory_days.get(material).copied().unwrap_or(0)
    }

    /// `company.material_criticality[material]`, defaulting to 5 per §4.6.
    pub fn material_criticality(&self, material: &str) -> u32 {
        self.material_criticality
            .get(material)
            .copied()
            .unwrap_or(5)
    }
}

#[cfg(test)]
impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            company_id: "test-co".to_string(),
            name: "Test Co".to_string(),
            raw_materials: Vec::new(),
            key_geographies: Vec::new(),
            inventory_days: HashMap::new(),
            material_criticality: HashMap::new(),
            alert_contacts: Vec::new(),
        }
    }
}
