//! Loading of build-step side inputs and resolution of the dependency table.
//!
//! Two JSON inputs feed the manifest: the third-party inventory, shared by
//! every crate in the build, and one dependency descriptor per direct
//! dependency of the crate being generated.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GenerateError;
use crate::in_tree::InTreePackages;

/// Registry metadata for every third-party package used across the build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThirdPartyInventory {
    pub crates: BTreeMap<String, ThirdPartyCrate>,
    pub patches: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThirdPartyCrate {
    /// Pre-formatted `[dependencies]` value, copied into the manifest as-is.
    pub cargo_dependency_toml: serde_json::Value,
}

impl ThirdPartyInventory {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read third-party dependency data from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse third-party dependency data from {}", path.display()))
    }

    pub fn dependency_for(&self, package_name: &str) -> Option<&serde_json::Value> {
        self.crates.get(package_name).map(|c| &c.cargo_dependency_toml)
    }
}

/// Metadata describing one dependency, written by the step that generated
/// that dependency's own manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDescriptor {
    pub third_party: bool,
    pub package_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cargo_toml_dir: Option<String>,
}

impl DependencyDescriptor {
    pub fn in_tree(package_name: &str, version: &str, cargo_toml_dir: &Path) -> Self {
        Self {
            third_party: false,
            package_name: package_name.to_string(),
            version: Some(version.to_string()),
            cargo_toml_dir: Some(cargo_toml_dir.to_string_lossy().into_owned()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dependency data from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse dependency data from {}", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize dependency data to JSON")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write dependency data to {}", path.display()))
    }
}

/// Resolved value of one `[dependencies]` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DependencyCoordinate {
    /// Inventory fragment for a registry package.
    ThirdParty(serde_json::Value),
    /// In-tree package that unifies with its registry name via patching.
    Patched { version: String },
    Path { path: String, version: String },
}

impl DependencyCoordinate {
    pub fn patched() -> Self {
        DependencyCoordinate::Patched {
            version: "*".to_string(),
        }
    }
}

pub type DependencyTable = BTreeMap<String, DependencyCoordinate>;

/// Turns dependency descriptors into `[dependencies]` entries.
pub struct DependencyResolver<'a> {
    inventory: &'a ThirdPartyInventory,
    inventory_path: PathBuf,
    in_tree: InTreePackages,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(inventory: &'a ThirdPartyInventory, inventory_path: impl AsRef<Path>) -> Self {
        Self {
            inventory,
            inventory_path: inventory_path.as_ref().to_path_buf(),
            in_tree: InTreePackages::new(),
        }
    }

    pub fn in_tree_packages(mut self, in_tree: InTreePackages) -> Self {
        self.in_tree = in_tree;
        self
    }

    /// Resolves every descriptor path for `crate_name`.
    ///
    /// Stops at the first missing descriptor or unknown third-party package.
    /// When two descriptors name the same package the later one wins.
    pub fn resolve(&self, crate_name: &str, dep_data: &[PathBuf]) -> Result<DependencyTable> {
        let mut deps = DependencyTable::new();

        for data_path in dep_data {
            if !data_path.is_file() {
                return Err(GenerateError::MissingDepData {
                    path: data_path.clone(),
                }
                .into());
            }

            let descriptor = DependencyDescriptor::load(data_path)?;
            let coordinate = self.resolve_descriptor(crate_name, data_path, &descriptor)?;

            tracing::debug!(
                package = %descriptor.package_name,
                third_party = descriptor.third_party,
                "resolved dependency"
            );

            if deps
                .get(&descriptor.package_name)
                .is_some_and(|previous| previous != &coordinate)
            {
                tracing::warn!(
                    package = %descriptor.package_name,
                    source = %data_path.display(),
                    "dependency declared more than once, keeping the last declaration"
                );
            }
            deps.insert(descriptor.package_name, coordinate);
        }

        Ok(deps)
    }

    fn resolve_descriptor(
        &self,
        crate_name: &str,
        data_path: &Path,
        descriptor: &DependencyDescriptor,
    ) -> Result<DependencyCoordinate> {
        let package_name = &descriptor.package_name;

        if descriptor.third_party {
            let dependency = self.inventory.dependency_for(package_name).ok_or_else(|| {
                GenerateError::MissingThirdPartyCrate {
                    package_name: package_name.clone(),
                    dep_data: data_path.to_path_buf(),
                    inventory: self.inventory_path.clone(),
                    crate_name: crate_name.to_string(),
                }
            })?;
            return Ok(DependencyCoordinate::ThirdParty(dependency.clone()));
        }

        if self.in_tree.contains(package_name) {
            return Ok(DependencyCoordinate::patched());
        }

        let path = descriptor.cargo_toml_dir.clone().ok_or_else(|| {
            anyhow!("In-tree dependency data {} has no cargo_toml_dir", data_path.display())
        })?;
        let version = descriptor.version.clone().ok_or_else(|| {
            anyhow!("In-tree dependency data {} has no version", data_path.display())
        })?;

        Ok(DependencyCoordinate::Path { path, version })
    }
}
