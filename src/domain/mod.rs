//! Domain logic - pure business rules independent of git operations

pub mod branch;
pub mod repo_state;
pub mod version;

pub use branch::{normalize_branch, BranchContext};
pub use repo_state::RepoState;
pub use version::{BumpKind, SemanticVersion, VersionError};
