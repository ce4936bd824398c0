use clap::ValueEnum;
use serde::Serialize;

/// Kind of crate target the manifest declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CrateType {
    #[value(name = "bin", alias = "executable")]
    Bin,
    #[value(name = "rlib", alias = "relocatable-library")]
    Rlib,
    #[value(name = "staticlib", alias = "static-library")]
    StaticLib,
    #[value(name = "proc-macro", alias = "compiler-plugin")]
    ProcMacro,
}

impl CrateType {
    pub fn as_str(&self) -> &str {
        match self {
            CrateType::Bin => "bin",
            CrateType::Rlib => "rlib",
            CrateType::StaticLib => "staticlib",
            CrateType::ProcMacro => "proc-macro",
        }
    }

    pub fn is_bin(&self) -> bool {
        matches!(self, CrateType::Bin)
    }

    pub fn is_proc_macro(&self) -> bool {
        matches!(self, CrateType::ProcMacro)
    }

    /// Section header for the crate target: `[[bin]]` or `[lib]`.
    pub fn target_section(&self) -> &str {
        if self.is_bin() { "[[bin]]" } else { "[lib]" }
    }
}

/// Link-time optimization mode for the release profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LtoMode {
    None,
    Thin,
    Fat,
}

impl LtoMode {
    /// Whether the mode adds an `lto` key to the profile.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, LtoMode::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_type_sections() {
        assert_eq!(CrateType::Bin.target_section(), "[[bin]]");
        assert_eq!(CrateType::Rlib.target_section(), "[lib]");
        assert_eq!(CrateType::StaticLib.target_section(), "[lib]");
        assert_eq!(CrateType::ProcMacro.target_section(), "[lib]");

        assert!(CrateType::ProcMacro.is_proc_macro());
        assert!(!CrateType::Rlib.is_proc_macro());
    }

    #[test]
    fn test_crate_type_aliases() {
        let parse = |s| CrateType::from_str(s, false).unwrap();

        assert_eq!(parse("bin"), CrateType::Bin);
        assert_eq!(parse("executable"), CrateType::Bin);
        assert_eq!(parse("relocatable-library"), CrateType::Rlib);
        assert_eq!(parse("static-library"), CrateType::StaticLib);
        assert_eq!(parse("compiler-plugin"), CrateType::ProcMacro);
        assert_eq!(parse("proc-macro").as_str(), "proc-macro");
        assert!(CrateType::from_str("dylib", false).is_err());
    }

    #[test]
    fn test_lto_mode() {
        assert!(!LtoMode::None.is_enabled());
        assert!(LtoMode::Thin.is_enabled());
        assert!(LtoMode::Fat.is_enabled());
        assert_eq!(LtoMode::from_str("thin", false).unwrap(), LtoMode::Thin);
    }
}
