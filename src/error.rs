use std::path::PathBuf;
use thiserror::Error;

pub const TERM_COLOR_RED: &str = "\x1b[91m";
pub const TERM_COLOR_END: &str = "\x1b[0m";

/// Configuration errors that stop manifest generation.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(
        "Missing Rust target data for dependency {}\nDid you accidentally depend on a non-Rust target?",
        .path.display()
    )]
    MissingDepData { path: PathBuf },

    #[error(
        "Missing Rust target dependency: {}\n\
         Package '{package_name}' is present in the third_party/ but is absent from dependency data: {}\n\
         Maybe this package is conditionally disabled for the current configuration of '{crate_name}'?",
        .dep_data.display(),
        .inventory.display()
    )]
    MissingThirdPartyCrate {
        package_name: String,
        dep_data: PathBuf,
        inventory: PathBuf,
        crate_name: String,
    },
}

/// Wraps a message in terminal color codes so it stands out in build logs.
pub fn paint_red(message: &str) -> String {
    format!("{TERM_COLOR_RED}{message}{TERM_COLOR_END}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_third_party_message() {
        let err = GenerateError::MissingThirdPartyCrate {
            package_name: "serde".to_string(),
            dep_data: PathBuf::from("out/serde.json"),
            inventory: PathBuf::from("out/third_party.json"),
            crate_name: "my_crate".to_string(),
        };
        let message = err.to_string();

        assert!(message.contains("out/serde.json"));
        assert!(message.contains("out/third_party.json"));
        assert!(message.contains("'my_crate'"));
        assert!(message.contains("'serde'"));
    }

    #[test]
    fn test_paint_red() {
        let painted = paint_red("boom");
        assert!(painted.starts_with(TERM_COLOR_RED));
        assert!(painted.ends_with(TERM_COLOR_END));
        assert!(painted.contains("boom"));
    }
}
