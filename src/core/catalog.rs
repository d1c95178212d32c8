//! The dependency catalog shipped with the buildpack.
//!
//! ```toml
//! [[default_versions]]
//! name = "go"
//! version = "1.7.5"
//!
//! [[dependencies]]
//! name = "go"
//! version = "1.7.5"
//! uri = "https://buildpacks.example.com/go/go1.7.5.linux-amd64.tar.gz"
//! sha256 = "2e4dd6c44f0693bef4e7b46cc701513d74c3cc44f2419bf519d7868b12931ac3"
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// File name of the catalog inside a buildpack.
pub const CATALOG_FILE: &str = "manifest.toml";

/// One installable dependency version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub version: String,
    pub uri: String,
    pub sha256: String,
}

/// Default version for a dependency name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultVersion {
    pub name: String,
    pub version: String,
}

/// Catalog of installable dependency versions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub default_versions: Vec<DefaultVersion>,
    pub dependencies: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load a catalog from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dependency catalog: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse dependency catalog: {}", path.display()))
    }

    /// Parse catalog contents.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Every catalog version of `name`, in catalog order.
    pub fn all_versions(&self, name: &str) -> Vec<String> {
        self.dependencies
            .iter()
            .filter(|d| d.name == name)
            .map(|d| d.version.clone())
            .collect()
    }

    /// The entry for an exact version.
    pub fn find(&self, name: &str, version: &str) -> Result<&CatalogEntry> {
        self.dependencies
            .iter()
            .find(|d| d.name == name && d.version == version)
            .with_context(|| format!("dependency {} {} not found in catalog", name, version))
    }

    /// The entry for the configured default version of `name`.
    pub fn default_version(&self, name: &str) -> Result<&CatalogEntry> {
        let defaults: Vec<_> = self
            .default_versions
            .iter()
            .filter(|d| d.name == name)
            .collect();

        match defaults.as_slice() {
            [default] => self.find(name, &default.version),
            [] => bail!("no default version set for {} in catalog", name),
            _ => bail!("found {} default versions for {}", defaults.len(), name),
        }
    }

    /// The single entry for `name`; tools are pinned to exactly one version.
    pub fn only_version(&self, name: &str) -> Result<&CatalogEntry> {
        let entries: Vec<_> = self.dependencies.iter().filter(|d| d.name == name).collect();

        match entries.as_slice() {
            [entry] => Ok(entry),
            [] => bail!("dependency {} not found in catalog", name),
            _ => bail!(
                "expected exactly one version of {} in catalog, found {}",
                name,
                entries.len()
            ),
        }
    }
}
