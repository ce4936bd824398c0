use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::crate_kind::{CrateType, LtoMode};
use crate::dep_data::DependencyTable;

pub const MANIFEST_FILE_NAME: &str = "Cargo.toml";

/// Identity of the crate whose manifest is generated.
#[derive(Debug, Clone)]
pub struct CrateDescriptor {
    pub package_name: String,
    pub crate_name: String,
    pub source_root: String,
    pub version: String,
    pub edition: String,
    pub crate_type: CrateType,
    pub lto: Option<LtoMode>,
}

/// Fixed `[package]` fields shared by every generated manifest.
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    pub copyright_holder: String,
    pub license_file: String,
    pub authors: Vec<String>,
    pub description: String,
    pub repository: String,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            copyright_holder: "The Fuchsia Authors".to_string(),
            license_file: "LICENSE".to_string(),
            authors: vec!["rust-fuchsia@fuchsia.com".to_string()],
            description: "Rust crate for Fuchsia OS".to_string(),
            repository: "https://fuchsia.googlesource.com".to_string(),
        }
    }
}

#[derive(Serialize)]
struct DependencySections<'a> {
    dependencies: &'a DependencyTable,
    patch: PatchSection<'a>,
}

#[derive(Serialize)]
struct PatchSection<'a> {
    #[serde(rename = "crates-io")]
    crates_io: &'a BTreeMap<String, serde_json::Value>,
}

#[derive(Serialize)]
struct ProfileSection {
    profile: Profiles,
}

#[derive(Serialize)]
struct Profiles {
    release: ReleaseProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReleaseProfile {
    pub panic: String,
    #[serde(rename = "opt-level")]
    pub opt_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lto: Option<LtoMode>,
}

impl ReleaseProfile {
    pub fn new(lto: Option<LtoMode>) -> Self {
        Self {
            panic: "abort".to_string(),
            opt_level: "z".to_string(),
            lto: lto.filter(LtoMode::is_enabled),
        }
    }
}

pub struct ManifestGenerator {
    metadata: PackageMetadata,
    year: i32,
}

impl ManifestGenerator {
    pub fn new(metadata: PackageMetadata) -> Self {
        Self {
            metadata,
            year: Local::now().year(),
        }
    }

    /// Pins the year written in the copyright header.
    pub fn year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn generate_manifest(
        &self,
        krate: &CrateDescriptor,
        dependencies: &DependencyTable,
        patches: &BTreeMap<String, serde_json::Value>,
    ) -> Result<String> {
        let mut manifest = self.render_package(krate);

        let sections = DependencySections {
            dependencies,
            patch: PatchSection { crates_io: patches },
        };
        manifest.push('\n');
        manifest.push_str(
            &toml::to_string(&sections).context("Failed to serialize dependencies to TOML")?,
        );

        let profile = ProfileSection {
            profile: Profiles {
                release: ReleaseProfile::new(krate.lto),
            },
        };
        manifest.push('\n');
        manifest.push_str(
            &toml::to_string(&profile).context("Failed to serialize release profile to TOML")?,
        );

        Ok(manifest)
    }

    fn render_package(&self, krate: &CrateDescriptor) -> String {
        let metadata = &self.metadata;
        let mut out = format!(
            "# Copyright {year} {holder}. All rights reserved.\n\
             # Use of this source code is governed by a BSD-style license that can be\n\
             # found in the LICENSE file.\n\
             \n\
             [package]\n\
             name = {name}\n\
             version = {version}\n\
             edition = {edition}\n\
             license-file = {license_file}\n\
             authors = {authors}\n\
             description = {description}\n\
             repository = {repository}\n\
             \n\
             {section}\n",
            year = self.year,
            holder = metadata.copyright_holder,
            name = quoted(&krate.package_name),
            version = quoted(&krate.version),
            edition = quoted(&krate.edition),
            license_file = quoted(&metadata.license_file),
            authors = quoted_list(&metadata.authors),
            description = quoted(&metadata.description),
            repository = quoted(&metadata.repository),
            section = krate.crate_type.target_section(),
        );

        if krate.crate_type.is_proc_macro() {
            out.push_str("proc-macro = true\n");
        }
        out.push_str(&format!("name = {}\n", quoted(&krate.crate_name)));
        if !krate.crate_type.is_bin() {
            out.push_str(&format!(
                "crate_type = {}\n",
                quoted_list(&[krate.crate_type.as_str().to_string()])
            ));
        }
        out.push_str(&format!("path = {}\n", quoted(&krate.source_root)));

        out
    }

    /// Writes the manifest into `out_dir`, replacing any previous one.
    pub fn write_manifest(&self, manifest: &str, out_dir: &Path) -> Result<PathBuf> {
        let manifest_path = out_dir.join(MANIFEST_FILE_NAME);

        fs::write(&manifest_path, manifest)
            .with_context(|| format!("Failed to write manifest to {}", manifest_path.display()))?;

        tracing::info!(path = %manifest_path.display(), "generated manifest");

        Ok(manifest_path)
    }
}

fn quoted(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

fn quoted_list(values: &[String]) -> String {
    let array = values.iter().cloned().map(toml::Value::String).collect();
    toml::Value::Array(array).to_string()
}
