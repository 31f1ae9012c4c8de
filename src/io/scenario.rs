use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::models::{Locale, PolicyParams, SiteConfig};

/// A site preset with optional horizon and inflation overrides.
///
/// Any other key is rejected rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresetSite {
    pub preset: Locale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<f64>,
}

impl PresetSite {
    fn resolve(&self) -> SiteConfig {
        let mut config = self.preset.config();
        if let Some(years) = self.horizon_years {
            config.horizon_years = years;
        }
        if let Some(rate) = self.inflation_rate {
            config.inflation_rate = rate;
        }
        config
    }
}

/// Site section of a scenario file: either a preset with a few overrides or
/// a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SiteSpec {
    Preset(PresetSite),
    Full(SiteConfig),
}

impl SiteSpec {
    /// Expand into a full configuration.
    pub fn resolve(&self) -> SiteConfig {
        match self {
            SiteSpec::Preset(preset) => preset.resolve(),
            SiteSpec::Full(config) => config.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScenarioFile {
    site: SiteSpec,
    #[serde(default)]
    policy: PolicyParams,
}

/// A validated site configuration with the policy parameters to run it with.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub site: SiteConfig,
    pub params: PolicyParams,
}

impl Scenario {
    fn from_file(file: ScenarioFile) -> Result<Self, SimulationError> {
        let site = file.site.resolve();
        site.validate()?;
        Ok(Self {
            site,
            params: file.policy,
        })
    }
}

/// Parse a TOML scenario.
pub fn parse_scenario_toml(content: &str) -> Result<Scenario, SimulationError> {
    let file: ScenarioFile = toml::from_str(content)?;
    Scenario::from_file(file)
}

/// Parse a JSON scenario.
pub fn parse_scenario_json(content: &str) -> Result<Scenario, SimulationError> {
    let file: ScenarioFile = serde_json::from_str(content)?;
    Scenario::from_file(file)
}

/// Load a scenario, choosing the format from the file extension.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<Scenario, SimulationError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    let content = std::fs::read_to_string(path)?;
    match ext.as_str() {
        "toml" => parse_scenario_toml(&content),
        "json" => parse_scenario_json(&content),
        _ => Err(SimulationError::ParseError(format!(
            "Unsupported scenario format: '{}'. Use .toml or .json",
            path.display()
        ))),
    }
}

/// Render a site configuration as a TOML scenario section.
pub fn site_to_toml(site: &SiteConfig) -> Result<String, SimulationError> {
    let file = ScenarioFile {
        site: SiteSpec::Full(site.clone()),
        policy: PolicyParams::default(),
    };
    toml::to_string_pretty(&file).map_err(|e| SimulationError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_with_overrides() {
        let scenario = parse_scenario_toml(
            r#"
            [site]
            preset = "park"
            horizon_years = 30
            inflation_rate = 0.0

            [policy]
            removal_rate = 100
            "#,
        )
        .unwrap();
        assert_eq!(scenario.site.legacy_count, 356);
        assert_eq!(scenario.site.horizon_years, 30);
        assert_eq!(scenario.site.inflation_rate, 0.0);
        assert_eq!(scenario.params.removal_rate, 100);
        assert_eq!(scenario.params.planting_rate, 400);
    }

    #[test]
    fn test_policy_section_optional() {
        let scenario = parse_scenario_toml("[site]\npreset = \"street\"\n").unwrap();
        assert_eq!(scenario.params, PolicyParams::default());
        assert_eq!(scenario.site.horizon_years, 20);
    }

    #[test]
    fn test_full_site_roundtrip() {
        let mut site = Locale::Generic.config();
        site.name = "Riverside".to_string();
        site.legacy_count = 42;
        let text = site_to_toml(&site).unwrap();
        let scenario = parse_scenario_toml(&text).unwrap();
        assert_eq!(scenario.site, site);
    }

    #[test]
    fn test_json_scenario() {
        let scenario = parse_scenario_json(
            r#"{"site": {"preset": "generic"}, "policy": {"injection_years": 8}}"#,
        )
        .unwrap();
        assert_eq!(scenario.site.legacy_count, 1490);
        assert_eq!(scenario.params.injection_years, 8);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let err = parse_scenario_toml("[site]\npreset = \"park\"\nhorizon_years = 0\n").unwrap_err();
        assert!(matches!(err, SimulationError::ValidationError(_)));
    }

    #[test]
    fn test_preset_rejects_other_site_keys() {
        let result = parse_scenario_toml(
            "[site]\npreset = \"park\"\nlegacy_count = 10\nuntreated_mortality = 0.0\n",
        );
        assert!(result.is_err());

        let result = parse_scenario_json(r#"{"site": {"preset": "park", "legacy_cout": 10}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_preset_rejected() {
        assert!(parse_scenario_toml("[site]\npreset = \"forest\"\n").is_err());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("s.toml");
        std::fs::write(&toml_path, "[site]\npreset = \"street\"\n").unwrap();
        assert_eq!(load_scenario(&toml_path).unwrap().site.legacy_count, 1134);

        let yaml_path = dir.path().join("s.yaml");
        std::fs::write(&yaml_path, "site: {}").unwrap();
        assert!(matches!(
            load_scenario(&yaml_path),
            Err(SimulationError::ParseError(_))
        ));
    }
}
