//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks on the loaded [`CompanyProfile`](crate::domain::CompanyProfile).
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use crate::domain::CompanyProfile;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " — did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Complete set of valid dotted key paths for `CompanyProfile`.
///
/// Maintained manually to match the struct in `domain/company.rs`. Any new
/// field added there must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        "company_id",
        "name",
        "raw_materials",
        "key_geographies",
        "inventory_days",
        "material_criticality",
        "alert_contacts",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_len = a.len();
    let b_len = b.len();
    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist <= 3 {
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((k, dist)),
            }
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys — it only warns. Existing configs
/// always continue to work.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let found = walk_toml_keys(&value, "");
    let mut warnings = Vec::new();

    for key in &found {
        if !known.contains(key.as_str()) {
            let suggestion = suggest_correction(key, &known);
            let message = format!("Unknown config key '{key}'");
            warnings.push(ValidationWarning {
                field: key.clone(),
                message,
                suggestion,
            });
        }
    }

    warnings
}

// ============================================================================
// Field Range Validation
// ============================================================================

/// Validate field ranges on a parsed `CompanyProfile`.
///
/// Returns `(errors, warnings)` — errors are impossible values that must
/// prevent startup; warnings are suspicious but not fatal.
pub fn validate_profile(profile: &CompanyProfile) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if profile.company_id.trim().is_empty() {
        errors.push("company_id must not be empty".to_string());
    }
    if profile.name.trim().is_empty() {
        errors.push("name must not be empty".to_string());
    }

    for (material, criticality) in &profile.material_criticality {
        if *criticality < 1 || *criticality > 10 {
            errors.push(format!(
                "material_criticality[{material}] = {criticality} is outside range 1-10"
            ));
        }
    }

    if profile.raw_materials.is_empty() {
        warnings.push(ValidationWarning {
            field: "raw_materials".to_string(),
            message: "no raw_materials declared — relevance filtering will match nothing"
                .to_string(),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn levenshtein_identical() {
        assert_eq!(levenshtein("hello", "hello"), 0);
    }

    #[test]
    fn levenshtein_one_edit() {
        assert_eq!(levenshtein("compnay_id", "company_id"), 2);
    }

    #[test]
    fn walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [inventory_days]
            steel = 30
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"inventory_days".to_string()));
        assert!(keys.contains(&"inventory_days.steel".to_string()));
    }

    #[test]
    fn typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
compnay_id = "acme"
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].suggestion.as_deref(), Some("company_id"));
    }

    #[test]
    fn all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
company_id = "acme"
name = "Acme Corp"
raw_materials = ["steel"]
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "expected 0 warnings, got {warnings:?}");
    }

    #[test]
    fn profile_missing_ids_is_an_error() {
        let profile = CompanyProfile {
            company_id: "".to_string(),
            name: "".to_string(),
            ..CompanyProfile::default()
        };
        let (errors, _) = validate_profile(&profile);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn profile_criticality_out_of_range_is_an_error() {
        let mut criticality = HashMap::new();
        criticality.insert("steel".to_string(), 11);
        let profile = CompanyProfile {
            material_criticality: criticality,
            ..CompanyProfile::default()
        };
        let (errors, _) = validate_profile(&profile);
        assert!(errors.iter().any(|e| e.contains("material_criticality")));
    }

    #[test]
    fn profile_defaults_report_empty_materials_warning() {
        let profile = CompanyProfile::default();
        let (errors, warnings) = validate_profile(&profile);
        assert!(errors.is_empty());
        assert!(warnings.iter().any(|w| w.field == "raw_materials"));
    }
}
