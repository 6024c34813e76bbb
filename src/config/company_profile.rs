//! Company profile loading: TOML file, standard search order.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::CompanyProfile;
use crate::errors::PipelineError;

/// Load the company profile using the standard search order:
///
/// 1. `$RISK_CONFIG` environment variable
/// 2. `./company_profile.toml`
/// 3. Built-in defaults
pub fn load_company_profile() -> CompanyProfile {
    if let Ok(path) = std::env::var("RISK_CONFIG") {
        let p = PathBuf::from(&path);
        if p.exists() {
            match load_from_file(&p) {
                Ok(profile) => {
                    info!(path = %p.display(), company = %profile.name, "loaded company profile from RISK_CONFIG");
                    return profile;
                }
                Err(e) => {
                    warn!(path = %p.display(), error = %e, "failed to load config from RISK_CONFIG, falling back");
                }
            }
        } else {
            warn!(path = %path, "RISK_CONFIG points to a non-existent file, falling back");
        }
    }

    let local = PathBuf::from("company_profile.toml");
    if local.exists() {
        match load_from_file(&local) {
            Ok(profile) => {
                info!(company = %profile.name, "loaded company profile from ./company_profile.toml");
                return profile;
            }
            Err(e) => {
                warn!(error = %e, "failed to load ./company_profile.toml, using defaults");
            }
        }
    }

    info!("no company_profile.toml found — using built-in defaults");
    default_profile()
}

/// Load from a specific TOML file path, validating unknown keys and field
/// ranges before returning.
pub fn load_from_file(path: &Path) -> Result<CompanyProfile, PipelineError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::Config(format!("reading {}: {e}", path.display())))?;

    for w in super::validation::validate_unknown_keys(&contents) {
        warn!("{}", w);
    }

    let profile: CompanyProfile = toml::from_str(&contents)
        .map_err(|e| PipelineError::Config(format!("parsing {}: {e}", path.display())))?;

    let (errors, warnings) = super::validation::validate_profile(&profile);
    for w in &warnings {
        warn!("{}", w);
    }
    if !errors.is_empty() {
        return Err(PipelineError::Config(errors.join("; ")));
    }

    Ok(profile)
}

fn default_profile() -> CompanyProfile {
    CompanyProfile {
        company_id: "default".to_string(),
        name: "Default Company".to_string(),
        raw_materials: Vec::new(),
        key_geographies: Vec::new(),
        inventory_days: Default::default(),
        material_criticality: Default::default(),
        alert_contacts: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_valid_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
company_id = "acme"
name = "Acme Corp"
raw_materials = ["steel", "aluminum"]
"#
        )
        .unwrap();
        let profile = load_from_file(f.path()).unwrap();
        assert_eq!(profile.company_id, "acme");
        assert_eq!(profile.raw_materials, vec!["steel", "aluminum"]);
    }

    #[test]
    fn rejects_invalid_criticality() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
company_id = "acme"
name = "Acme Corp"
[material_criticality]
steel = 99
"#
        )
        .unwrap();
        assert!(load_from_file(f.path()).is_err());
    }
}
