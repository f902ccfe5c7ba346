//! YAML configuration for the detail library.
//!
//! One file describes where the catalog lives and how context matches are
//! weighted. `LibraryConfig::build` turns it into a ready [`Matcher`].
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "site office"
//!
//! catalog:
//!   backend: "redb"
//!   path: "/var/lib/details/catalog.redb"
//!   seed: true
//!
//! matcher:
//!   weights:
//!     host: 3
//!     adjacent: 3
//!     exposure: 2
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use catalog::{BackendConfig, Catalog, CatalogConfig, CatalogError};
use matcher::{Matcher, MatcherConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or applying a library configuration.
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

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("failed to open catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Top-level library configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LibraryConfig {
    /// Configuration format version.
    #[serde(default = "default_config_version")]
    pub version: String,

    /// Optional configuration name/description.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub catalog: CatalogYamlConfig,

    #[serde(default)]
    pub matcher: MatcherConfig,
}

impl LibraryConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: LibraryConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.catalog.validate()?;
        self.matcher
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        Ok(())
    }

    /// Catalog settings in the form the catalog crate expects.
    pub fn catalog_config(&self) -> Result<CatalogConfig, ConfigLoadError> {
        self.catalog.validate()?;
        let backend = match (&self.catalog.backend, &self.catalog.path) {
            (CatalogBackendKind::InMemory, _) => BackendConfig::in_memory(),
            (CatalogBackendKind::Redb, Some(path)) => BackendConfig::redb(path.clone()),
            (CatalogBackendKind::Redb, None) => {
                return Err(ConfigLoadError::MissingField("catalog.path".into()));
            }
        };
        Ok(CatalogConfig::new()
            .with_backend(backend)
            .with_seed(self.catalog.seed))
    }

    /// Open the catalog, seed it when asked, and wire a matcher over it.
    pub fn build(&self) -> Result<Matcher, ConfigLoadError> {
        self.validate()?;
        let catalog = Arc::new(Catalog::open(self.catalog_config()?)?);
        tracing::info!(
            backend = self.catalog.backend.as_str(),
            seed = self.catalog.seed,
            "catalog opened"
        );
        Matcher::with_catalog_arc(catalog, self.matcher)
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            name: None,
            catalog: CatalogYamlConfig::default(),
            matcher: MatcherConfig::default(),
        }
    }
}

/// Which storage engine holds the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogBackendKind {
    #[default]
    InMemory,
    Redb,
}

impl CatalogBackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogBackendKind::InMemory => "in_memory",
            CatalogBackendKind::Redb => "redb",
        }
    }
}

/// Catalog YAML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogYamlConfig {
    #[serde(default)]
    pub backend: CatalogBackendKind,

    /// Database file; required for the redb backend.
    #[serde(default)]
    pub path: Option<String>,

    /// Insert the reference details on open.
    #[serde(default = "true_value")]
    pub seed: bool,
}

impl CatalogYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.backend == CatalogBackendKind::Redb {
            match self.path.as_deref() {
                None => return Err(ConfigLoadError::MissingField("catalog.path".into())),
                Some(path) if path.trim().is_empty() => {
                    return Err(ConfigLoadError::Validation(
                        "catalog.path must not be empty when backend is 'redb'".into(),
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

impl Default for CatalogYamlConfig {
    fn default() -> Self {
        Self {
            backend: CatalogBackendKind::InMemory,
            path: None,
            seed: true,
        }
    }
}

fn default_config_version() -> String {
    "1.0".to_string()
}
fn true_value() -> bool {
    true
}
