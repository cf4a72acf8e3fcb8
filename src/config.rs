use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::common::constants::CONFIG_ENV_VAR;
use crate::domain::Field;
use crate::error::{PipelineError, Result};

/// Immutable run configuration, built once and passed by reference into the
/// pipeline and the classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub columns: ColumnConfig,
    pub classifier: ClassifierConfig,
}

/// Header aliases keyed by canonical field key (`full_name`, `website`, ...).
/// Fields not listed fall back to their canonical header spelling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnConfig {
    pub aliases: BTreeMap<String, Vec<String>>,
}

impl ColumnConfig {
    /// Accepted header spellings for `field`, canonical spelling first.
    pub fn aliases_for(&self, field: Field) -> Vec<String> {
        let mut names = vec![field.header().to_string()];
        if let Some(extra) = self.aliases.get(field.key()) {
            for alias in extra {
                if !names.iter().any(|n| n == alias) {
                    names.push(alias.clone());
                }
            }
        }
        names
    }
}

/// A weighted keyword used by the no-description branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub phrase: String,
    pub weight: f64,
}

impl KeywordRule {
    pub fn new(phrase: &str, weight: f64) -> Self {
        Self {
            phrase: phrase.to_string(),
            weight,
        }
    }
}

/// Non-target trade keyword families, checked in declaration order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionSets {
    pub plumbing: Vec<String>,
    pub electrical: Vec<String>,
    pub other_trades: Vec<String>,
}

impl Default for ExclusionSets {
    fn default() -> Self {
        Self {
            plumbing: strings(&[
                "plumbing contractor",
                "plumbing",
                "plumber",
                "drain cleaning",
                "sewer",
                "septic",
                "backflow",
                "rooter",
            ]),
            electrical: strings(&[
                "electrical contractor",
                "electrician",
                "electrical",
                "wiring",
                "panel upgrade",
                "generator installation",
            ]),
            other_trades: strings(&[
                "roofing",
                "roofer",
                "landscaping",
                "lawn care",
                "painting",
                "flooring",
                "general contractor",
                "remodeling",
                "carpentry",
                "masonry",
                "concrete",
                "fencing",
                "siding",
                "gutter",
                "pest control",
                "tree service",
                "excavation",
            ]),
        }
    }
}

/// Classifier thresholds and keyword rule sets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Descriptions shorter than this (in characters, after trimming) take the
    /// no-description branch
    pub min_description_length: usize,
    pub no_description_threshold: f64,
    pub high_confidence_score: f64,
    pub medium_confidence_score: f64,
    pub generic_keyword_weight: f64,
    pub generic_fallback_min: f64,
    /// Accepted for compatibility with existing config files. Keyword matching
    /// is a fixed variant test and does not read this value.
    pub fuzzy_threshold: f64,
    /// How many matched phrases the HVAC reason lists
    pub reason_keyword_limit: usize,
    pub no_description_rules: Vec<KeywordRule>,
    pub exclusions: ExclusionSets,
    pub hvac_keywords: Vec<String>,
    pub generic_keywords: Vec<String>,
    pub tld_suffixes: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_description_length: 5,
            no_description_threshold: 3.0,
            high_confidence_score: 5.0,
            medium_confidence_score: 2.0,
            generic_keyword_weight: 0.5,
            generic_fallback_min: 1.0,
            fuzzy_threshold: 0.8,
            reason_keyword_limit: 3,
            no_description_rules: vec![
                KeywordRule::new("hvac", 5.0),
                KeywordRule::new("heating", 3.5),
                KeywordRule::new("cooling", 3.5),
                KeywordRule::new("air conditioning", 3.5),
                KeywordRule::new("furnace", 3.0),
                KeywordRule::new("heat pump", 3.0),
                KeywordRule::new("refrigeration", 3.0),
                KeywordRule::new("mechanical", 2.0),
                KeywordRule::new("climate", 2.0),
                KeywordRule::new("comfort", 1.5),
                KeywordRule::new("duct", 1.5),
            ],
            exclusions: ExclusionSets::default(),
            hvac_keywords: strings(&[
                "hvac",
                "hvac contractor",
                "hvac services",
                "heating and cooling",
                "heating and air conditioning",
                "heating & air",
                "air conditioning",
                "air conditioning repair",
                "heat pump",
                "furnace",
                "boiler",
                "ductwork",
                "duct cleaning",
                "ductless mini split",
                "mini-split",
                "refrigeration",
                "geothermal",
                "heating",
                "cooling",
                "indoor air quality",
            ]),
            generic_keywords: strings(&[
                "service",
                "repair",
                "installation",
                "maintenance",
                "contractor",
                "company",
                "residential",
                "commercial",
                "emergency",
            ]),
            tld_suffixes: strings(&[".com", ".net", ".org", ".co", ".io", ".biz", ".info", ".us"]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl AppConfig {
    /// Load configuration from `path`, from the file named by
    /// `LEAD_CLEANER_CONFIG`, or fall back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_ENV_VAR)
            .ok()
            .filter(|p| !p.trim().is_empty());

        let config = match (path, env_path) {
            (Some(p), _) => Self::from_file(p)?,
            (None, Some(p)) => Self::from_file(Path::new(&p))?,
            (None, None) => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Reject configurations the classifier cannot apply meaningfully.
    pub fn validate(&self) -> Result<()> {
        let cls = &self.classifier;

        for rule in &cls.no_description_rules {
            check_phrase(&rule.phrase, "no_description_rules")?;
            if !rule.weight.is_finite() || rule.weight < 0.0 {
                return Err(PipelineError::Config(format!(
                    "Keyword '{}' has invalid weight {}",
                    rule.phrase, rule.weight
                )));
            }
        }

        let lists = [
            ("exclusions.plumbing", &cls.exclusions.plumbing),
            ("exclusions.electrical", &cls.exclusions.electrical),
            ("exclusions.other_trades", &cls.exclusions.other_trades),
            ("hvac_keywords", &cls.hvac_keywords),
            ("generic_keywords", &cls.generic_keywords),
            ("tld_suffixes", &cls.tld_suffixes),
        ];
        for (name, list) in lists {
            for phrase in list.iter() {
                check_phrase(phrase, name)?;
            }
        }

        let thresholds = [
            ("no_description_threshold", cls.no_description_threshold),
            ("high_confidence_score", cls.high_confidence_score),
            ("medium_confidence_score", cls.medium_confidence_score),
            ("generic_keyword_weight", cls.generic_keyword_weight),
            ("generic_fallback_min", cls.generic_fallback_min),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(PipelineError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if cls.medium_confidence_score > cls.high_confidence_score {
            return Err(PipelineError::Config(format!(
                "medium_confidence_score ({}) exceeds high_confidence_score ({})",
                cls.medium_confidence_score, cls.high_confidence_score
            )));
        }

        for (key, aliases) in &self.columns.aliases {
            let field = Field::from_key(key).ok_or_else(|| {
                PipelineError::Config(format!("Unknown column key '{}' in [columns]", key))
            })?;
            if aliases.iter().any(|a| a.trim().is_empty()) {
                return Err(PipelineError::Config(format!(
                    "Empty header alias configured for '{}'",
                    field
                )));
            }
        }

        Ok(())
    }
}

fn check_phrase(phrase: &str, list: &str) -> Result<()> {
    if phrase.trim().is_empty() {
        return Err(PipelineError::Config(format!("Empty phrase in {}", list)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.classifier.min_description_length, 5);
        assert_eq!(config.classifier.tld_suffixes.len(), 8);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [classifier]
            no_description_threshold = 4.5

            [columns]
            full_name = ["Name"]
            "#,
        )
        .unwrap();

        assert_eq!(config.classifier.no_description_threshold, 4.5);
        assert_eq!(config.classifier.high_confidence_score, 5.0);
        assert!(!config.classifier.hvac_keywords.is_empty());
        assert_eq!(
            config.columns.aliases_for(Field::FullName),
            vec!["Contact Full Name".to_string(), "Name".to_string()]
        );
        assert_eq!(
            config.columns.aliases_for(Field::Website),
            vec!["Website".to_string()]
        );
    }

    #[test]
    fn test_rule_sets_can_be_replaced() {
        let config = AppConfig::from_toml_str(
            r#"
            [[classifier.no_description_rules]]
            phrase = "boiler"
            weight = 4.0
            "#,
        )
        .unwrap();

        assert_eq!(
            config.classifier.no_description_rules,
            vec![KeywordRule::new("boiler", 4.0)]
        );
    }

    #[test]
    fn test_validate_rejects_empty_phrase() {
        let mut config = AppConfig::default();
        config.classifier.hvac_keywords.push("  ".to_string());
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = AppConfig::default();
        config.classifier.medium_confidence_score = 6.0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        let mut config = AppConfig::default();
        config
            .classifier
            .no_description_rules
            .push(KeywordRule::new("chiller", -1.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_column_key() {
        let config = AppConfig::from_toml_str(
            r#"
            [columns]
            fax = ["Fax Number"]
            "#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = AppConfig::from_toml_str("[classifier\n").unwrap_err();
        assert!(matches!(err, PipelineError::Toml(_)));
    }
}
