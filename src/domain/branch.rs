use std::sync::OnceLock;

use regex::Regex;

/// Branch that receives release builds without a prerelease seed
pub const RELEASE_BRANCH: &str = "master";

/// Name reported for a detached HEAD once normalized
pub const DETACHED_HEAD: &str = "head";

fn separator_run() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new("[^0-9A-Za-z-]+").expect("static regex is valid"))
}

/// Normalize a branch name into a prerelease-safe form.
///
/// The name is lowercased, then every maximal run of characters outside
/// `[0-9A-Za-z-]` is collapsed into a single `.`.
///
/// ```
/// use helm_release::domain::normalize_branch;
/// assert_eq!(normalize_branch("weird/branch$$other"), "weird.branch.other");
/// assert_eq!(normalize_branch("PR-2"), "pr-2");
/// ```
pub fn normalize_branch(name: &str) -> String {
    let lowered = name.to_lowercase();
    separator_run().replace_all(&lowered, ".").into_owned()
}

/// Represents a git branch with its normalized name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub normalized: String,
}

impl BranchContext {
    /// Create a new branch context
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let normalized = normalize_branch(&name);

        BranchContext { name, normalized }
    }

    /// Check if this is the release branch
    pub fn is_release_branch(&self) -> bool {
        self.normalized == RELEASE_BRANCH
    }

    /// Check if HEAD was detached when the branch was read
    pub fn is_detached(&self) -> bool {
        self.normalized == DETACHED_HEAD
    }
}
