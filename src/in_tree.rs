use std::collections::HashSet;

// Packages from the third-party set that also live in-tree. Listing one here
// makes in-tree dependents use `version = "*"` so both copies unify through
// the `[patch.crates-io]` table.
const IN_TREE_THIRD_PARTY_PACKAGES: &[&str] = &[];

/// Set of in-tree packages that resolve through registry patching.
#[derive(Debug, Clone)]
pub struct InTreePackages {
    packages: HashSet<String>,
}

impl InTreePackages {
    pub fn new() -> Self {
        Self::with_packages(IN_TREE_THIRD_PARTY_PACKAGES.iter().copied())
    }

    pub fn with_packages<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            packages: packages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, package_name: &str) -> bool {
        self.packages.contains(package_name)
    }
}

impl Default for InTreePackages {
    fn default() -> Self {
        Self::new()
    }
}
