pub mod cli;
pub mod crate_kind;
pub mod dep_data;
pub mod error;
pub mod in_tree;
pub mod logging;
pub mod manifest;

pub use error::GenerateError;
pub use manifest::ManifestGenerator;
