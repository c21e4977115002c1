//! YAML configuration for the assessment recommender.
//!
//! One file describes every stage: where the catalog lives and how it is
//! cleaned, which embedder to use, the index kind, the engine knobs and
//! optional keyword overrides for intent detection. Every field has a
//! default, so an empty file (or just `version: "1.0"`) is a valid config.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "local"
//!
//! catalog:
//!   path: "data/catalog.csv"
//!   dedupe_names: true
//!   dedupe_urls: true
//!
//! semantic:
//!   mode: "fast"
//!   dimension: 384
//!
//! index:
//!   kind: "flat"
//!
//! recommender:
//!   oversample_factor: 3.0
//!   min_candidates: 30
//!   max_k: 10
//!
//! intents:
//!   language: ["english", "verbal", "writing", "spanish"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use index::IndexConfig;
use ingest::CatalogConfig;
use matcher::{Intent, KeywordIntentClassifier, RecommendConfig};
use semantic::SemanticConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for the recommender pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    /// Configuration format version
    #[serde(default = "default_config_version")]
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub catalog: CatalogYamlConfig,

    #[serde(default)]
    pub semantic: SemanticYamlConfig,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub recommender: RecommendConfig,

    #[serde(default)]
    pub intents: IntentYamlConfig,
}

impl AppConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.resolve_relative_paths(path.parent());
        Ok(config)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.catalog.validate()?;
        self.semantic.validate()?;
        self.index
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("index: {err}")))?;
        self.recommender
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("recommender: {err}")))?;
        Ok(())
    }

    /// A relative catalog path that does not resolve from the working
    /// directory is taken relative to the config file's directory.
    fn resolve_relative_paths(&mut self, base: Option<&Path>) {
        let Some(base) = base else { return };
        if self.catalog.path.is_relative() && !self.catalog.path.exists() {
            self.catalog.path = base.join(&self.catalog.path);
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            name: None,
            catalog: CatalogYamlConfig::default(),
            semantic: SemanticYamlConfig::default(),
            index: IndexConfig::default(),
            recommender: RecommendConfig::default(),
            intents: IntentYamlConfig::default(),
        }
    }
}

/// Catalog location and cleaning rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogYamlConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,

    #[serde(default = "true_value")]
    pub dedupe_names: bool,

    #[serde(default = "true_value")]
    pub dedupe_urls: bool,

    #[serde(default)]
    pub max_description_chars: Option<usize>,

    #[serde(default)]
    pub infer_missing_categories: bool,
}

impl CatalogYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigLoadError::Validation(
                "catalog.path must not be empty".to_string(),
            ));
        }
        self.to_catalog_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("catalog: {err}")))
    }

    pub fn to_catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            dedupe_names: self.dedupe_names,
            dedupe_urls: self.dedupe_urls,
            max_description_chars: self.max_description_chars,
            infer_missing_categories: self.infer_missing_categories,
        }
    }
}

impl Default for CatalogYamlConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            dedupe_names: true,
            dedupe_urls: true,
            max_description_chars: None,
            infer_missing_categories: false,
        }
    }
}

/// Semantic embedding YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticYamlConfig {
    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default = "default_model_name")]
    pub model_name: String,

    #[serde(default = "default_dimension")]
    pub dimension: usize,

    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub api_auth_header: Option<String>,

    #[serde(default)]
    pub api_provider: Option<String>,

    #[serde(default = "default_timeout")]
    pub api_timeout_secs: Option<u64>,

    #[serde(default = "true_value")]
    pub normalize: bool,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl SemanticYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_modes = ["fast", "api"];
        if !valid_modes.contains(&self.mode.as_str()) {
            return Err(ConfigLoadError::Validation(format!(
                "semantic.mode must be one of: {valid_modes:?}"
            )));
        }
        self.to_semantic_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("semantic: {err}")))
    }

    pub fn to_semantic_config(&self) -> SemanticConfig {
        SemanticConfig {
            mode: self.mode.clone(),
            model_name: self.model_name.clone(),
            dimension: self.dimension,
            api_url: self.api_url.clone(),
            api_auth_header: self.api_auth_header.clone(),
            api_provider: self.api_provider.clone(),
            api_timeout_secs: self.api_timeout_secs,
            normalize: self.normalize,
            batch_size: self.batch_size,
        }
    }
}

impl Default for SemanticYamlConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            model_name: default_model_name(),
            dimension: default_dimension(),
            api_url: None,
            api_auth_header: None,
            api_provider: None,
            api_timeout_secs: default_timeout(),
            normalize: true,
            batch_size: default_batch_size(),
        }
    }
}

/// Per-intent keyword overrides. A missing entry keeps the built-in list;
/// an empty list switches that intent off.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentYamlConfig {
    #[serde(default)]
    pub technical: Option<Vec<String>>,
    #[serde(default)]
    pub behavioral: Option<Vec<String>>,
    #[serde(default)]
    pub cognitive: Option<Vec<String>>,
    #[serde(default)]
    pub language: Option<Vec<String>>,
    #[serde(default)]
    pub domain: Option<Vec<String>>,
}

impl IntentYamlConfig {
    fn overrides(&self) -> [(Intent, Option<&Vec<String>>); 5] {
        [
            (Intent::Technical, self.technical.as_ref()),
            (Intent::Behavioral, self.behavioral.as_ref()),
            (Intent::Cognitive, self.cognitive.as_ref()),
            (Intent::Language, self.language.as_ref()),
            (Intent::Domain, self.domain.as_ref()),
        ]
    }

    pub fn to_classifier(&self) -> KeywordIntentClassifier {
        self.overrides()
            .into_iter()
            .fold(KeywordIntentClassifier::default(), |classifier, (intent, words)| {
                match words {
                    Some(words) => classifier.with_keywords(intent, words),
                    None => classifier,
                }
            })
    }
}

// Helper functions for serde defaults
fn default_config_version() -> String {
    "1.0".to_string()
}
fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/catalog.csv")
}
fn true_value() -> bool {
    true
}
fn default_mode() -> String {
    "fast".to_string()
}
fn default_model_name() -> String {
    "feature-hash-v1".to_string()
}
fn default_dimension() -> usize {
    384
}
fn default_timeout() -> Option<u64> {
    Some(30)
}
fn default_batch_size() -> usize {
    32
}
