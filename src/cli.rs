use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::crate_kind::{CrateType, LtoMode};
use crate::dep_data::{DependencyDescriptor, DependencyResolver, ThirdPartyInventory};
use crate::logging::init_logging;
use crate::manifest::{CrateDescriptor, ManifestGenerator, PackageMetadata};

// `--version` names the crate version, so clap's own version flag is off.
#[derive(Parser, Debug)]
#[command(name = "write-cargo-toml")]
#[command(about = "Writes a Cargo.toml for a Rust crate")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Name of the package
    #[arg(long)]
    pub package_name: String,

    /// Name of the crate
    #[arg(long)]
    pub crate_name: String,

    /// Root lib.rs or main.rs for the crate
    #[arg(long)]
    pub source_root: String,

    /// Version of crate
    #[arg(long)]
    pub version: String,

    /// Edition of rust to use when compiling the crate
    #[arg(long)]
    pub edition: String,

    /// Path to directory where Cargo.toml should be written
    #[arg(long)]
    pub out_dir: PathBuf,

    /// Type of crate to build
    #[arg(long, value_enum)]
    pub crate_type: CrateType,

    /// Add lto options to crate
    #[arg(long, value_enum)]
    pub lto: Option<LtoMode>,

    /// Path to output of the third-party crate inventory step
    #[arg(long)]
    pub third_party_deps_data: PathBuf,

    /// Path to metadata from a previous invocation of this tool
    #[arg(long = "dep-data")]
    pub dep_data: Vec<PathBuf>,

    /// Also write this crate's own dependency metadata to the given path
    #[arg(long)]
    pub emit_dep_data: Option<PathBuf>,

    /// Holder named in the copyright header
    #[arg(long, default_value = "The Fuchsia Authors")]
    pub copyright_holder: String,

    /// Value of `package.license-file`
    #[arg(long, default_value = "LICENSE")]
    pub license_file: String,

    /// Entry of `package.authors` (repeatable)
    #[arg(long = "author", default_value = "rust-fuchsia@fuchsia.com")]
    pub authors: Vec<String>,

    /// Value of `package.description`
    #[arg(long, default_value = "Rust crate for Fuchsia OS")]
    pub description: String,

    /// Value of `package.repository`
    #[arg(long, default_value = "https://fuchsia.googlesource.com")]
    pub repository: String,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    fn crate_descriptor(&self) -> CrateDescriptor {
        CrateDescriptor {
            package_name: self.package_name.clone(),
            crate_name: self.crate_name.clone(),
            source_root: self.source_root.clone(),
            version: self.version.clone(),
            edition: self.edition.clone(),
            crate_type: self.crate_type,
            lto: self.lto,
        }
    }

    fn package_metadata(&self) -> PackageMetadata {
        PackageMetadata {
            copyright_holder: self.copyright_holder.clone(),
            license_file: self.license_file.clone(),
            authors: self.authors.clone(),
            description: self.description.clone(),
            repository: self.repository.clone(),
        }
    }
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    generate(&cli)?;
    Ok(())
}

/// Resolves dependencies and writes the manifest, returning its path.
///
/// Nothing is written unless every dependency resolves.
pub fn generate(cli: &Cli) -> Result<PathBuf> {
    let inventory = ThirdPartyInventory::load(&cli.third_party_deps_data)?;

    let deps = DependencyResolver::new(&inventory, &cli.third_party_deps_data)
        .resolve(&cli.crate_name, &cli.dep_data)?;

    tracing::debug!(
        crate_name = %cli.crate_name,
        dependencies = deps.len(),
        patches = inventory.patches.len(),
        "resolved dependency table"
    );

    let generator = ManifestGenerator::new(cli.package_metadata());
    let manifest = generator
        .generate_manifest(&cli.crate_descriptor(), &deps, &inventory.patches)
        .with_context(|| format!("Failed to generate manifest for {}", cli.package_name))?;

    let manifest_path = generator.write_manifest(&manifest, &cli.out_dir)?;

    if let Some(ref emit_path) = cli.emit_dep_data {
        DependencyDescriptor::in_tree(&cli.package_name, &cli.version, &cli.out_dir).write(emit_path)?;
    }

    Ok(manifest_path)
}
